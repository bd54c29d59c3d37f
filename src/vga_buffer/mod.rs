// src/vga_buffer/mod.rs

//! VGA text mode console with interrupt-safe Mutex protection
//!
//! This module provides the console the kernel prints to:
//! - Fixed 80x25 grid with a single white-on-black attribute
//! - Cursor pinned to the bottom row, auto-wrap and auto-scroll
//! - Bounds carried by `Row`/`Column`/`CellIndex` instead of raw offsets
//! - Interrupt-safe locking around the global instance
//! - fmt::Write implementation for print!/println! macros

pub mod backend;
pub mod color;
pub mod constants;
mod error;
pub mod position;
mod writer;

pub use backend::{StubBuffer, TextModeBuffer, VgaBufferAccess};
pub use color::{ColorCode, VgaColor};
pub use error::VgaError;
pub use position::{CellIndex, Column, Row};
pub use writer::{Console, HexDigits};

use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};
use spin::Mutex;

/// Set once the accessibility probe passed
static BUFFER_ACCESSIBLE: AtomicBool = AtomicBool::new(false);

/// Buffer behind the global console.
#[cfg(all(target_arch = "x86_64", target_os = "none"))]
pub type DefaultBuffer = TextModeBuffer;

/// Buffer behind the global console.
///
/// Hosted builds have no text-mode memory, so the global console renders
/// into memory instead.
#[cfg(not(all(target_arch = "x86_64", target_os = "none")))]
pub type DefaultBuffer = StubBuffer;

#[cfg(all(target_arch = "x86_64", target_os = "none"))]
const fn default_buffer() -> DefaultBuffer {
    // SAFETY: the loader maps the text buffer at VGA_BUFFER_ADDR and the
    // global console holds the only handle to it.
    unsafe { TextModeBuffer::new() }
}

#[cfg(not(all(target_arch = "x86_64", target_os = "none")))]
const fn default_buffer() -> DefaultBuffer {
    StubBuffer::new()
}

/// Global console
///
/// # Locking Order
///
/// CRITICAL: To prevent deadlocks, follow this locking order:
/// 1. SERIAL1 (in serial/mod.rs)
/// 2. CONSOLE (this mutex)
static CONSOLE: Mutex<Console<DefaultBuffer>> = Mutex::new(Console::new(default_buffer()));

/// Execute a function with the console, protected from interrupts
pub fn with_console<F, R>(f: F) -> R
where
    F: FnOnce(&mut Console<DefaultBuffer>) -> R,
{
    crate::arch::without_interrupts(|| f(&mut CONSOLE.lock()))
}

/// Like [`with_console`], but gives up instead of spinning when the lock is
/// held. Used on the panic path.
pub fn try_with_console<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut Console<DefaultBuffer>) -> R,
{
    crate::arch::without_interrupts(|| CONSOLE.try_lock().map(|mut console| f(&mut console)))
}

/// Print function called by macros
#[doc(hidden)]
pub fn _print(args: fmt::Arguments<'_>) {
    with_console(|console| {
        use core::fmt::Write;
        let _ = console.write_fmt(args);
    });
}

/// Probe the text buffer and clear it.
///
/// Should be called once during kernel initialization.
///
/// # Errors
///
/// Returns [`VgaError::BufferNotAccessible`] if the buffer does not hold
/// written values.
pub fn init() -> Result<(), VgaError> {
    with_console(|console| {
        console.buffer_mut().verify_accessible()?;
        console.clear();
        BUFFER_ACCESSIBLE.store(true, Ordering::Release);
        Ok(())
    })
}

/// Check if the VGA buffer passed the accessibility probe
pub fn is_accessible() -> bool {
    BUFFER_ACCESSIBLE.load(Ordering::Acquire)
}

/// Clear the screen
pub fn clear() {
    with_console(Console::clear);
}

/// Write one byte to the global console
pub fn emit_char(byte: u8) {
    with_console(|console| console.emit_char(byte));
}

/// Write bytes up to the first `\0` to the global console
pub fn emit(text: &[u8]) {
    with_console(|console| console.emit(text));
}

/// Write `value` in hex to the global console
pub fn emit_hex(value: u64) {
    with_console(|console| console.emit_hex(value));
}
