// src/serial/constants.rs

//! Constants and register definitions for serial port operations

/// Register offsets from base port
pub mod register_offset {
    pub const DATA: u16 = 0;
    pub const INTERRUPT_ENABLE: u16 = 1;
    pub const FIFO_CONTROL: u16 = 2;
    pub const LINE_CONTROL: u16 = 3;
    pub const MODEM_CONTROL: u16 = 4;
    pub const LINE_STATUS: u16 = 5;
    pub const MODEM_STATUS: u16 = 6;
    pub const SCRATCH: u16 = 7;
}

/// Line control: divisor latch access bit
pub const LCR_DLAB: u8 = 0x80;
/// Line control: 8 data bits, no parity, one stop bit
pub const LCR_8N1: u8 = 0x03;
/// Divisor for 38400 baud (115200 / 3)
pub const BAUD_DIVISOR: u16 = 3;
/// FIFO control: enable, clear both queues, 14-byte threshold
pub const FCR_ENABLE_CLEAR_14: u8 = 0xC7;
/// Modem control: DTR, RTS, OUT2 (IRQs enabled)
pub const MCR_NORMAL_IRQ: u8 = 0x0B;
/// Modem control: loopback with RTS, OUT1, OUT2
pub const MCR_LOOPBACK: u8 = 0x1E;
/// Modem control: DTR, RTS, OUT1, OUT2
pub const MCR_OPERATIONAL: u8 = 0x0F;
/// Byte sent during the loopback self-test
pub const LOOPBACK_TEST_BYTE: u8 = 0xAE;
/// Line status: transmit holding register empty
pub const LSR_THR_EMPTY: u8 = 0x20;

/// Polls of the line status register before a byte is dropped
pub const TRANSMIT_SPIN_LIMIT: u32 = 100_000;
