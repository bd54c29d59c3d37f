// src/errors/unified.rs

//! Unified error types for the kernel
//!
//! Each subsystem keeps its own error enum; this module gathers them under
//! [`KernelError`] so boot code can propagate any of them with `?`.

use crate::loader::LoaderError;
use crate::serial::SerialError;
use crate::vga_buffer::VgaError;
use core::fmt;

/// Top-level kernel error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    /// VGA subsystem error
    Vga(VgaError),
    /// Serial subsystem error
    Serial(SerialError),
    /// Loader control block error
    Loader(LoaderError),
    /// Initialization error
    Init(InitError),
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::Vga(e) => write!(f, "VGA error: {}", e),
            KernelError::Serial(e) => write!(f, "Serial error: {}", e),
            KernelError::Loader(e) => write!(f, "Loader error: {}", e),
            KernelError::Init(e) => write!(f, "Init error: {}", e),
        }
    }
}

impl From<VgaError> for KernelError {
    fn from(err: VgaError) -> Self {
        KernelError::Vga(err)
    }
}

impl From<SerialError> for KernelError {
    fn from(err: SerialError) -> Self {
        KernelError::Serial(err)
    }
}

impl From<LoaderError> for KernelError {
    fn from(err: LoaderError) -> Self {
        KernelError::Loader(err)
    }
}

/// Initialization errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// VGA initialization failed
    VgaFailed(VgaError),
    /// Already initialized
    AlreadyInitialized,
    /// Phases were run out of order
    InvalidPhaseTransition,
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::VgaFailed(e) => write!(f, "VGA init failed: {}", e),
            InitError::AlreadyInitialized => write!(f, "already initialized"),
            InitError::InvalidPhaseTransition => write!(f, "invalid phase transition"),
        }
    }
}

impl From<InitError> for KernelError {
    fn from(err: InitError) -> Self {
        KernelError::Init(err)
    }
}

impl From<VgaError> for InitError {
    fn from(err: VgaError) -> Self {
        InitError::VgaFailed(err)
    }
}

/// Result type alias for kernel operations
pub type Result<T> = core::result::Result<T, KernelError>;

/// Helper trait for error context
pub trait ErrorContext {
    /// Get a detailed description of the error
    fn context(&self) -> &'static str;
}

impl ErrorContext for KernelError {
    fn context(&self) -> &'static str {
        match self {
            KernelError::Vga(e) => e.context(),
            KernelError::Serial(e) => e.context(),
            KernelError::Loader(e) => e.context(),
            KernelError::Init(e) => e.context(),
        }
    }
}

impl ErrorContext for VgaError {
    fn context(&self) -> &'static str {
        match self {
            VgaError::BufferNotAccessible => "VGA buffer memory could not be accessed",
            VgaError::InvalidBase => "VGA buffer base address is null or misaligned",
        }
    }
}

impl ErrorContext for SerialError {
    fn context(&self) -> &'static str {
        match self {
            SerialError::AlreadyInitialized => "Serial port cannot be initialized twice",
            SerialError::PortNotPresent => "Serial port hardware is not available",
            SerialError::Timeout => "Serial operation timed out waiting for hardware",
        }
    }
}

impl ErrorContext for LoaderError {
    fn context(&self) -> &'static str {
        match self {
            LoaderError::NullPointer => "Loader did not hand over a control block",
            LoaderError::OutOfRange { .. } => "Control block pointer lies outside readable memory",
        }
    }
}

impl ErrorContext for InitError {
    fn context(&self) -> &'static str {
        match self {
            InitError::VgaFailed(_) => "VGA subsystem initialization failed",
            InitError::AlreadyInitialized => "Kernel subsystems are already initialized",
            InitError::InvalidPhaseTransition => "Initialization phases ran out of order",
        }
    }
}
