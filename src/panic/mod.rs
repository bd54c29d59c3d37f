// src/panic/mod.rs

//! Panic handling utilities
//!
//! This module provides panic state tracking, nested panic detection and the
//! routine the binary's `#[panic_handler]` delegates to.

pub mod handler;
pub mod state;

// Re-export commonly used types
pub use handler::{PanicOutputStatus, handle_panic};
pub use state::{PanicLevel, enter_panic};
