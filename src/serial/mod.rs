// src/serial/mod.rs

//! Serial port driver (COM1) for debugging output
//!
//! Provides UART communication on COM1 (0x3F8) with:
//! - 38400 baud rate
//! - 8 data bits, no parity, 1 stop bit (8N1)
//! - FIFO buffer support
//! - Loopback self-test during initialization
//! - Bounded transmit polling so a dead UART cannot hang the kernel
//!
//! Output is silently skipped until [`init`] has detected the hardware, which
//! keeps logging harmless on machines without COM1.

pub mod backend;
pub(crate) mod constants;
mod error;
mod port;

pub use backend::{DefaultBackend, Register as SerialRegister, SerialHardware, StubSerialBackend};
pub use error::SerialError;
pub use port::SerialPort;

use core::sync::atomic::{AtomicBool, Ordering};
use spin::Mutex;

/// Serial port state tracking: `SERIAL_INITIALIZED` is held while a
/// configured port is claimed, `SERIAL_PORT_AVAILABLE` gates output.
static SERIAL_INITIALIZED: AtomicBool = AtomicBool::new(false);
static SERIAL_PORT_AVAILABLE: AtomicBool = AtomicBool::new(false);

/// Global serial port protected by Mutex
///
/// # Locking Order
///
/// CRITICAL: To prevent deadlocks, always acquire locks in this order:
/// 1. SERIAL1 (this mutex)
/// 2. CONSOLE (in vga_buffer/mod.rs)
static SERIAL1: Mutex<SerialPort<DefaultBackend>> =
    Mutex::new(SerialPort::new(DefaultBackend::new()));

pub(crate) fn with_serial_port<F, R>(f: F) -> R
where
    F: FnOnce(&mut SerialPort<DefaultBackend>) -> R,
{
    crate::arch::without_interrupts(|| f(&mut SERIAL1.lock()))
}

/// Initialize COM1.
///
/// # Errors
///
/// - `SerialError::AlreadyInitialized` on the second call
/// - `SerialError::PortNotPresent` if the loopback self-test fails
pub fn init() -> Result<(), SerialError> {
    with_serial_port(|port| claim_and_configure(&SERIAL_INITIALIZED, port))?;

    SERIAL_PORT_AVAILABLE.store(true, Ordering::Release);
    Ok(())
}

/// Set `claimed` and configure `port`. The flag is released again when the
/// port does not answer, so it only ever marks a configured UART.
fn claim_and_configure<H: SerialHardware>(
    claimed: &AtomicBool,
    port: &mut SerialPort<H>,
) -> Result<(), SerialError> {
    if claimed
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return Err(SerialError::AlreadyInitialized);
    }

    if let Err(err) = port.configure() {
        claimed.store(false, Ordering::Release);
        return Err(err);
    }
    Ok(())
}

/// Check if serial port hardware is available
#[inline]
#[must_use = "serial availability should be checked to avoid I/O failures"]
pub fn is_available() -> bool {
    SERIAL_PORT_AVAILABLE.load(Ordering::Acquire)
}

/// Log a sequence of lines to the serial port
pub fn log_lines<I>(lines: I)
where
    I: IntoIterator,
    I::Item: core::fmt::Display,
{
    for line in lines {
        crate::serial_println!("{}", line);
    }
}

#[doc(hidden)]
pub fn print_impl(args: ::core::fmt::Arguments<'_>) {
    use core::fmt::Write;
    if !is_available() {
        return;
    }
    with_serial_port(|port| {
        let _ = port.write_fmt(args);
    });
}

/// Like [`print_impl`] but never spins on the lock. Used on the panic path.
#[doc(hidden)]
pub fn try_print_impl(args: ::core::fmt::Arguments<'_>) -> bool {
    use core::fmt::Write;
    if !is_available() {
        return false;
    }
    crate::arch::without_interrupts(|| match SERIAL1.try_lock() {
        Some(mut port) => port.write_fmt(args).is_ok(),
        None => false,
    })
}

/// Prints to the host through the serial interface.
#[macro_export]
macro_rules! serial_print {
    ($($arg:tt)*) => {
        $crate::serial::print_impl(format_args!($($arg)*));
    };
}

/// Prints to the host through the serial interface, appending a newline.
#[macro_export]
macro_rules! serial_println {
    () => ($crate::serial_print!("\n"));
    ($fmt:expr) => ($crate::serial_print!(concat!($fmt, "\n")));
    ($fmt:expr, $($arg:tt)*) => ($crate::serial_print!(concat!($fmt, "\n"), $($arg)*));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_skipped_before_init() {
        // Nothing in the test binary initializes COM1.
        assert!(!is_available());
        crate::serial_println!("dropped {}", 1);
        assert!(!try_print_impl(format_args!("dropped")));
    }

    #[test]
    fn test_failed_configure_leaves_port_unclaimed() {
        let claimed = AtomicBool::new(false);

        let mut absent = SerialPort::new(StubSerialBackend::absent());
        assert_eq!(
            claim_and_configure(&claimed, &mut absent),
            Err(SerialError::PortNotPresent)
        );
        assert!(!claimed.load(Ordering::SeqCst));

        let mut present = SerialPort::new(StubSerialBackend::new());
        assert_eq!(claim_and_configure(&claimed, &mut present), Ok(()));
        assert!(claimed.load(Ordering::SeqCst));

        assert_eq!(
            claim_and_configure(&claimed, &mut present),
            Err(SerialError::AlreadyInitialized)
        );
    }
}
