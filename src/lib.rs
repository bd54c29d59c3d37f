// src/lib.rs
//! tiny_console - a minimal kernel that owns the VGA text console
//!
//! The crate is `no_std` on the bare-metal target. Host test builds link
//! `std` so the console logic can be exercised against [`vga_buffer::StubBuffer`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![allow(missing_docs)]

pub mod arch;
pub mod constants;
pub mod errors;
pub mod init;
pub mod loader;
pub mod logger;
pub mod panic;
pub mod qemu;
pub mod serial;
pub mod vga_buffer;

use crate::arch::{ArchCpu, Cpu};

pub use qemu::{QemuExitCode, exit_qemu};

/// Prints to the VGA text console.
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => ($crate::vga_buffer::_print(format_args!($($arg)*)));
}

/// Prints to the VGA text console, appending a newline.
#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($($arg:tt)*) => ($crate::print!("{}\n", format_args!($($arg)*)));
}

/// Halt loop
#[inline]
pub fn hlt_loop() -> ! {
    loop {
        ArchCpu::halt();
    }
}
