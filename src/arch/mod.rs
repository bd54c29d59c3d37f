// src/arch/mod.rs

//! Architecture-specific abstractions.
//!
//! Privileged instructions (`hlt`, `cli`, port I/O) are only used when the
//! crate is built for the bare-metal target. Hosted builds, the test binaries
//! and the preview runner, get [`HostedCpu`] instead.

#[cfg(target_arch = "x86_64")]
pub mod x86_64;

/// Trait for CPU-specific operations.
pub trait Cpu {
    /// Halt the CPU until the next interrupt.
    fn halt();

    /// Disable interrupts.
    fn disable_interrupts();
}

/// CPU used on the bare-metal target
#[cfg(all(target_arch = "x86_64", target_os = "none"))]
pub type ArchCpu = self::x86_64::X86Cpu;

/// CPU used on hosted builds
#[cfg(not(all(target_arch = "x86_64", target_os = "none")))]
pub type ArchCpu = HostedCpu;

/// Stand-in for hosted builds: idles with a spin hint and never touches the
/// interrupt flag.
#[derive(Debug, Clone, Copy)]
pub struct HostedCpu;

impl Cpu for HostedCpu {
    fn halt() {
        core::hint::spin_loop();
    }

    fn disable_interrupts() {}
}

/// Run `f` with interrupts masked, restoring the previous state afterwards.
#[inline]
pub fn without_interrupts<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    #[cfg(all(target_arch = "x86_64", target_os = "none"))]
    {
        ::x86_64::instructions::interrupts::without_interrupts(f)
    }
    #[cfg(not(all(target_arch = "x86_64", target_os = "none")))]
    {
        f()
    }
}

/// Write one byte to the emulator debug console (port 0xE9).
#[inline]
pub fn write_debug_byte(byte: u8) {
    #[cfg(all(target_arch = "x86_64", target_os = "none"))]
    self::x86_64::qemu::write_debug_byte(byte);
    #[cfg(not(all(target_arch = "x86_64", target_os = "none")))]
    let _ = byte;
}

/// Signal the emulator's ISA debug-exit device.
#[inline]
pub fn exit_qemu(code: u32) {
    #[cfg(all(target_arch = "x86_64", target_os = "none"))]
    self::x86_64::qemu::exit_qemu(code);
    #[cfg(not(all(target_arch = "x86_64", target_os = "none")))]
    let _ = code;
}
