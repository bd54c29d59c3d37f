// src/serial/backend.rs

//! Hardware abstraction for the serial driver.
//!
//! The UART logic only talks to a [`SerialHardware`] implementation, so the
//! same driver runs against x86 port I/O on the bare-metal target and against
//! [`StubSerialBackend`] everywhere else.

use super::constants::{LSR_THR_EMPTY, register_offset};

/// Registers that the UART driver interacts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Data,
    InterruptEnable,
    FifoControl,
    LineControl,
    ModemControl,
    LineStatus,
    ModemStatus,
    Scratch,
}

impl Register {
    /// Offset from the UART base port
    pub const fn offset(self) -> u16 {
        match self {
            Register::Data => register_offset::DATA,
            Register::InterruptEnable => register_offset::INTERRUPT_ENABLE,
            Register::FifoControl => register_offset::FIFO_CONTROL,
            Register::LineControl => register_offset::LINE_CONTROL,
            Register::ModemControl => register_offset::MODEM_CONTROL,
            Register::LineStatus => register_offset::LINE_STATUS,
            Register::ModemStatus => register_offset::MODEM_STATUS,
            Register::Scratch => register_offset::SCRATCH,
        }
    }
}

/// Minimal abstraction over UART register access.
pub trait SerialHardware {
    /// Write a value to a UART register.
    fn write(&mut self, register: Register, value: u8);
    /// Read the current value of a UART register.
    fn read(&mut self, register: Register) -> u8;
}

const STUB_CAPTURE_LEN: usize = 256;
const MCR_LOOP_BIT: u8 = 0x10;

/// Software UART used off-target and in tests.
///
/// In loopback mode, data writes are echoed back on the next data read
/// (unless built with [`StubSerialBackend::absent`]). Outside loopback mode
/// data writes are captured.
#[derive(Debug, Clone)]
pub struct StubSerialBackend {
    registers: [u8; 8],
    echo: Option<u8>,
    present: bool,
    captured: [u8; STUB_CAPTURE_LEN],
    captured_len: usize,
}

impl StubSerialBackend {
    /// A responsive UART
    pub const fn new() -> Self {
        Self {
            registers: [0; 8],
            echo: None,
            present: true,
            captured: [0; STUB_CAPTURE_LEN],
            captured_len: 0,
        }
    }

    /// A UART that never answers (floating bus)
    pub const fn absent() -> Self {
        let mut stub = Self::new();
        stub.present = false;
        stub
    }

    /// Bytes transmitted outside loopback mode
    pub fn captured(&self) -> &[u8] {
        &self.captured[..self.captured_len]
    }

    /// Last value written to `register`
    pub fn register(&self, register: Register) -> u8 {
        self.registers[register.offset() as usize]
    }

    fn loopback(&self) -> bool {
        self.register(Register::ModemControl) & MCR_LOOP_BIT != 0
    }
}

impl Default for StubSerialBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialHardware for StubSerialBackend {
    fn write(&mut self, register: Register, value: u8) {
        if register == Register::Data && self.present {
            if self.loopback() {
                self.echo = Some(value);
            } else if self.captured_len < STUB_CAPTURE_LEN {
                self.captured[self.captured_len] = value;
                self.captured_len += 1;
            }
        }
        self.registers[register.offset() as usize] = value;
    }

    fn read(&mut self, register: Register) -> u8 {
        if !self.present {
            return 0xFF;
        }
        match register {
            Register::Data => self.echo.take().unwrap_or(0),
            Register::LineStatus => LSR_THR_EMPTY,
            other => self.register(other),
        }
    }
}

/// Backend used by the global port.
#[cfg(all(target_arch = "x86_64", target_os = "none"))]
pub type DefaultBackend = crate::arch::x86_64::serial::PortIoBackend;

/// Backend used by the global port.
#[cfg(not(all(target_arch = "x86_64", target_os = "none")))]
pub type DefaultBackend = StubSerialBackend;
