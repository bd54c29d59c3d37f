// src/errors/mod.rs

//! Unified error handling module
//!
//! Subsystem errors stay where they are raised (`vga_buffer::VgaError`,
//! `serial::SerialError`, `loader::LoaderError`); this module re-exports the
//! kernel-wide wrapper.

pub mod unified;

pub use unified::{ErrorContext, InitError, KernelError, Result};
