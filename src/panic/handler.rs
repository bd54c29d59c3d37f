// src/panic/handler.rs

//! Central panic handling utilities.
//!
//! The handler coordinates panic state tracking and multi-channel output:
//! - Nested panic detection backed by [`crate::panic::state`]
//! - Best-effort serial + console output with automatic fallback to the QEMU
//!   debug port (0xE9)
//!
//! Locks are only ever tried, never waited on, so a panic raised while the
//! console or the serial port is held still reaches the halt loop.

use crate::{
    arch::{ArchCpu, Cpu, write_debug_byte},
    init,
    panic::state::{PanicLevel, enter_panic},
    serial, vga_buffer,
};
use core::fmt::Write;
use core::panic::PanicInfo;

/// Tracks whether we managed to emit panic information anywhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicOutputStatus {
    /// Serial output succeeded
    pub serial: bool,
    /// Console output succeeded
    pub vga: bool,
    /// Emergency debug port output was attempted
    pub emergency: bool,
}

impl PanicOutputStatus {
    #[inline]
    #[must_use]
    pub const fn any_success(&self) -> bool {
        self.serial || self.vga || self.emergency
    }
}

/// Entry point invoked by the binary's `#[panic_handler]`.
pub fn handle_panic(info: &PanicInfo<'_>) -> ! {
    // Interrupts can trigger nested panics, so shut them off immediately.
    ArchCpu::disable_interrupts();

    let outputs = match enter_panic() {
        PanicLevel::Primary => PanicOutputStatus {
            serial: try_serial_output(info),
            vga: try_console_output(info),
            emergency: false,
        },
        PanicLevel::Nested => PanicOutputStatus {
            emergency: emergency_output(b"\n!!! NESTED PANIC DETECTED !!!\n", info),
            ..PanicOutputStatus::default()
        },
        PanicLevel::Critical => PanicOutputStatus {
            emergency: emergency_output(b"\n!!! CRITICAL PANIC FAILURE !!!\n", info),
            ..PanicOutputStatus::default()
        },
    };

    if !outputs.any_success() {
        emergency_output(b"!!! KERNEL PANIC - OUTPUT FAILED !!!\n", info);
    }

    init::halt_forever()
}

fn try_serial_output(info: &PanicInfo<'_>) -> bool {
    serial::try_print_impl(format_args!(
        "\n[KERNEL PANIC] {}\n[STATE] init phase: {}\n",
        info,
        init::status_string()
    ))
}

fn try_console_output(info: &PanicInfo<'_>) -> bool {
    if !vga_buffer::is_accessible() {
        return false;
    }
    vga_buffer::try_with_console(|console| {
        console.emit_str("\nKERNEL PANIC\n");
        let _ = writeln!(console, "{}", info);
    })
    .is_some()
}

fn emergency_output(header: &[u8], info: &PanicInfo<'_>) -> bool {
    write_bytes_to_debug(header);

    if let Some(location) = info.location() {
        write_bytes_to_debug(b"Location: ");
        for &byte in location.file().as_bytes().iter().take(128) {
            write_debug_byte(byte);
        }
        write_debug_byte(b':');
        write_decimal_to_debug(location.line());
        write_debug_byte(b'\n');
    }

    true
}

fn write_decimal_to_debug(num: u32) {
    let mut digits = [0u8; 10];
    for byte in decimal_digits(num, &mut digits) {
        write_debug_byte(*byte);
    }
}

/// Render `num` in decimal into `buf`, returning the used tail.
fn decimal_digits(mut num: u32, buf: &mut [u8; 10]) -> &[u8] {
    let mut idx = buf.len();
    loop {
        idx -= 1;
        buf[idx] = b'0' + (num % 10) as u8;
        num /= 10;
        if num == 0 {
            break;
        }
    }
    &buf[idx..]
}

fn write_bytes_to_debug(bytes: &[u8]) {
    for &byte in bytes {
        write_debug_byte(byte);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_status_success_detection() {
        let mut status = PanicOutputStatus::default();
        assert!(!status.any_success());

        status.serial = true;
        assert!(status.any_success());

        status.serial = false;
        status.vga = true;
        assert!(status.any_success());

        status.vga = false;
        status.emergency = true;
        assert!(status.any_success());
    }

    #[test]
    fn decimal_rendering() {
        let mut buf = [0u8; 10];
        assert_eq!(decimal_digits(0, &mut buf), b"0");
        assert_eq!(decimal_digits(42, &mut buf), b"42");
        assert_eq!(decimal_digits(u32::MAX, &mut buf), b"4294967295");
    }
}
