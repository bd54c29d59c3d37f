// src/panic/state.rs

//! Panic state tracking for nested panic detection
//!
//! Provides atomic state management to detect and handle nested panics safely.

use core::sync::atomic::{AtomicU8, Ordering};

/// Panic state levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PanicLevel {
    /// First panic being handled
    Primary = 1,
    /// Nested panic detected (panic during panic handling)
    Nested = 2,
    /// Critical failure (multiple nested panics)
    Critical = 3,
}

impl PanicLevel {
    const fn from_depth(depth: u8) -> Option<Self> {
        match depth {
            0 => None,
            1 => Some(Self::Primary),
            2 => Some(Self::Nested),
            _ => Some(Self::Critical),
        }
    }
}

/// Escalate `state` by one level and report the new level.
///
/// Saturates at `Critical`, so repeated panics never wrap back to `Primary`.
pub fn escalate(state: &AtomicU8) -> PanicLevel {
    let prev = state
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |depth| {
            Some(depth.saturating_add(1).min(PanicLevel::Critical as u8))
        })
        .unwrap_or(PanicLevel::Critical as u8);

    PanicLevel::from_depth(prev.saturating_add(1)).unwrap_or(PanicLevel::Critical)
}

/// Global panic state tracker (0 = no panic, matches no variant)
static PANIC_LEVEL: AtomicU8 = AtomicU8::new(0);

/// Enter panic handling and return the level of this panic
pub fn enter_panic() -> PanicLevel {
    escalate(&PANIC_LEVEL)
}
