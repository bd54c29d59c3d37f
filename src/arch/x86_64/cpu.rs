// src/arch/x86_64/cpu.rs

use crate::arch::Cpu;
use x86_64::instructions::{hlt, interrupts};

/// The bare-metal CPU: idles with `hlt`, masks interrupts with `cli`.
///
/// Interrupts are never re-enabled; the console kernel services none.
#[derive(Debug, Clone, Copy)]
pub struct X86Cpu;

impl Cpu for X86Cpu {
    #[inline]
    fn halt() {
        hlt();
    }

    #[inline]
    fn disable_interrupts() {
        interrupts::disable();
    }
}
