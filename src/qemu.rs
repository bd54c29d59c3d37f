//! Exit codes for QEMU's ISA debug exit device.

use crate::hlt_loop;

/// Exit codes understood by QEMU's ISA debug exit device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum QemuExitCode {
    /// The kernel finished its boot sequence.
    Success = 0x10,
    /// The kernel gave up during boot.
    Failed = 0x11,
}

/// Write the exit code to QEMU's debug exit port and halt the CPU.
///
/// Without the device (real hardware, or a hosted build) the write is a no-op
/// and the CPU simply parks in the halt loop.
#[inline]
pub fn exit_qemu(code: QemuExitCode) -> ! {
    crate::arch::exit_qemu(code as u32);
    hlt_loop()
}
