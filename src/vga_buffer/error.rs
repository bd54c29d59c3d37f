// src/vga_buffer/error.rs

//! Error type for the VGA subsystem

use core::fmt;

/// Errors that can occur when setting up the VGA text buffer.
///
/// Rendering itself cannot fail; these only come out of backend
/// construction and the accessibility probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VgaError {
    /// The buffer did not read back what was written to it.
    BufferNotAccessible,
    /// The base address is null or not aligned for 16-bit cells.
    InvalidBase,
}

impl VgaError {
    /// Convert the error into a human-readable static message.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BufferNotAccessible => "buffer not accessible",
            Self::InvalidBase => "invalid buffer base address",
        }
    }
}

impl fmt::Display for VgaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
