// src/serial/port.rs

//! 16550 UART driver over a [`SerialHardware`] backend

use super::backend::{Register, SerialHardware};
use super::constants::*;
use super::error::SerialError;
use core::fmt;

/// A UART with a known register backend
#[derive(Debug)]
pub struct SerialPort<H> {
    hw: H,
}

impl<H: SerialHardware> SerialPort<H> {
    /// Wrap a backend. Nothing is written until [`SerialPort::configure`].
    pub const fn new(hw: H) -> Self {
        Self { hw }
    }

    /// Program 38400 8N1 with FIFOs, then run the loopback self-test.
    ///
    /// # Errors
    ///
    /// [`SerialError::PortNotPresent`] when the test byte is not echoed.
    pub fn configure(&mut self) -> Result<(), SerialError> {
        let [divisor_lo, divisor_hi] = BAUD_DIVISOR.to_le_bytes();

        self.hw.write(Register::InterruptEnable, 0x00);
        self.hw.write(Register::LineControl, LCR_DLAB);
        self.hw.write(Register::Data, divisor_lo);
        self.hw.write(Register::InterruptEnable, divisor_hi);
        self.hw.write(Register::LineControl, LCR_8N1);
        self.hw.write(Register::FifoControl, FCR_ENABLE_CLEAR_14);
        self.hw.write(Register::ModemControl, MCR_NORMAL_IRQ);

        self.hw.write(Register::ModemControl, MCR_LOOPBACK);
        self.hw.write(Register::Data, LOOPBACK_TEST_BYTE);
        if self.hw.read(Register::Data) != LOOPBACK_TEST_BYTE {
            return Err(SerialError::PortNotPresent);
        }

        self.hw.write(Register::ModemControl, MCR_OPERATIONAL);
        Ok(())
    }

    /// Transmit one byte once the holding register is empty.
    ///
    /// # Errors
    ///
    /// [`SerialError::Timeout`] when the transmitter stays busy; the byte is
    /// dropped.
    pub fn send(&mut self, byte: u8) -> Result<(), SerialError> {
        for _ in 0..TRANSMIT_SPIN_LIMIT {
            if self.hw.read(Register::LineStatus) & LSR_THR_EMPTY != 0 {
                self.hw.write(Register::Data, byte);
                return Ok(());
            }
            core::hint::spin_loop();
        }
        Err(SerialError::Timeout)
    }

    /// The register backend
    pub fn hardware(&self) -> &H {
        &self.hw
    }
}

impl<H: SerialHardware> fmt::Write for SerialPort<H> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            // A stuck transmitter only loses log output.
            let _ = self.send(byte);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serial::backend::StubSerialBackend;
    use core::fmt::Write;

    #[test]
    fn test_configure_programs_uart() {
        let mut port = SerialPort::new(StubSerialBackend::new());
        assert_eq!(port.configure(), Ok(()));

        let hw = port.hardware();
        assert_eq!(hw.register(Register::LineControl), LCR_8N1);
        assert_eq!(hw.register(Register::FifoControl), FCR_ENABLE_CLEAR_14);
        assert_eq!(hw.register(Register::ModemControl), MCR_OPERATIONAL);
        // Only the divisor latch write reaches the data register; the test
        // byte stays in loopback.
        assert_eq!(hw.captured(), &[BAUD_DIVISOR as u8][..]);
    }

    #[test]
    fn test_configure_detects_missing_port() {
        let mut port = SerialPort::new(StubSerialBackend::absent());
        assert_eq!(port.configure(), Err(SerialError::PortNotPresent));
    }

    #[test]
    fn test_write_transmits_bytes() {
        let mut port = SerialPort::new(StubSerialBackend::new());
        port.configure().unwrap();
        write!(port, "ok {}", 7).unwrap();

        let captured = port.hardware().captured();
        assert!(captured.ends_with(b"ok 7"));
    }

    #[test]
    fn test_send_times_out_without_transmitter() {
        struct Busy;
        impl SerialHardware for Busy {
            fn write(&mut self, _register: Register, _value: u8) {}
            fn read(&mut self, _register: Register) -> u8 {
                0
            }
        }

        let mut port = SerialPort::new(Busy);
        assert_eq!(port.send(b'x'), Err(SerialError::Timeout));
    }
}
