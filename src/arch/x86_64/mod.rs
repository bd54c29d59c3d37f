// src/arch/x86_64/mod.rs

pub mod cpu;
pub mod qemu;
pub mod serial;

pub use cpu::X86Cpu;
