// src/arch/x86_64/serial.rs

use crate::constants::SERIAL_IO_PORT;
use crate::serial::{SerialHardware, SerialRegister as Register};
use x86_64::instructions::port::Port;

/// x86 specific implementation backed by port I/O instructions.
pub struct PortIoBackend {
    data: Port<u8>,
    interrupt_enable: Port<u8>,
    fifo: Port<u8>,
    line_control: Port<u8>,
    modem_control: Port<u8>,
    line_status: Port<u8>,
    modem_status: Port<u8>,
    scratch: Port<u8>,
}

impl PortIoBackend {
    /// Create a new backend backed by the standard COM1 base address.
    pub const fn new() -> Self {
        Self::with_base(SERIAL_IO_PORT)
    }

    /// Create a backend using a custom I/O base address.
    pub const fn with_base(base: u16) -> Self {
        Self {
            data: Port::new(base + Register::Data.offset()),
            interrupt_enable: Port::new(base + Register::InterruptEnable.offset()),
            fifo: Port::new(base + Register::FifoControl.offset()),
            line_control: Port::new(base + Register::LineControl.offset()),
            modem_control: Port::new(base + Register::ModemControl.offset()),
            line_status: Port::new(base + Register::LineStatus.offset()),
            modem_status: Port::new(base + Register::ModemStatus.offset()),
            scratch: Port::new(base + Register::Scratch.offset()),
        }
    }

    fn port(&mut self, register: Register) -> &mut Port<u8> {
        match register {
            Register::Data => &mut self.data,
            Register::InterruptEnable => &mut self.interrupt_enable,
            Register::FifoControl => &mut self.fifo,
            Register::LineControl => &mut self.line_control,
            Register::ModemControl => &mut self.modem_control,
            Register::LineStatus => &mut self.line_status,
            Register::ModemStatus => &mut self.modem_status,
            Register::Scratch => &mut self.scratch,
        }
    }
}

impl Default for PortIoBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for PortIoBackend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PortIoBackend").finish_non_exhaustive()
    }
}

impl SerialHardware for PortIoBackend {
    #[inline]
    fn write(&mut self, register: Register, value: u8) {
        // SAFETY: the ports belong to the UART this backend was built for,
        // and access is serialized by the SERIAL1 mutex.
        unsafe { self.port(register).write(value) }
    }

    #[inline]
    fn read(&mut self, register: Register) -> u8 {
        // SAFETY: as above.
        unsafe { self.port(register).read() }
    }
}
