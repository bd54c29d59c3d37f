// src/arch/x86_64/qemu.rs

use x86_64::instructions::port::{Port, PortWriteOnly};

const ISA_DEBUG_EXIT: u16 = 0xF4;
const DEBUG_CONSOLE: u16 = 0xE9;

/// Write the exit code to QEMU's debug exit port.
pub fn exit_qemu(code: u32) {
    // SAFETY: 0xF4 is only wired to QEMU's isa-debug-exit device.
    unsafe {
        let mut port = Port::<u32>::new(ISA_DEBUG_EXIT);
        port.write(code);
    }
}

/// Write one byte to QEMU/Bochs' debug console.
pub fn write_debug_byte(byte: u8) {
    // SAFETY: writes to 0xE9 are ignored on hardware without the device.
    unsafe {
        let mut port = PortWriteOnly::<u8>::new(DEBUG_CONSOLE);
        port.write(byte);
    }
}
