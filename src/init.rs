// src/init.rs

//! Kernel initialization
//!
//! Brings up the serial log channel and the text console in a fixed order,
//! tracked by an atomic phase so a second call is rejected instead of
//! re-probing hardware.

use crate::arch::{ArchCpu, Cpu};
use crate::errors::{self, InitError};
use crate::{logger, serial, vga_buffer};
use core::sync::atomic::{AtomicU8, Ordering};

/// Initialization phases with explicit state machine
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitPhase {
    NotStarted = 0,
    Serial = 1,
    Console = 2,
    Complete = 3,
    Failed = 255,
}

impl InitPhase {
    /// Check if this phase can transition to the next phase
    pub const fn can_transition_to(self, next: Self) -> bool {
        if matches!(next, Self::Failed) {
            return !matches!(self, Self::Failed | Self::Complete);
        }

        matches!(self.next(), Some(expected) if (expected as u8) == (next as u8))
    }

    const fn next(self) -> Option<Self> {
        match self {
            Self::NotStarted => Some(Self::Serial),
            Self::Serial => Some(Self::Console),
            Self::Console => Some(Self::Complete),
            Self::Complete | Self::Failed => None,
        }
    }

    /// Human-readable name of the phase
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::Serial => "Serial Init",
            Self::Console => "Console Init",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }
}

impl From<u8> for InitPhase {
    fn from(value: u8) -> Self {
        match value {
            1 => Self::Serial,
            2 => Self::Console,
            3 => Self::Complete,
            255 => Self::Failed,
            _ => Self::NotStarted,
        }
    }
}

static CURRENT_PHASE: AtomicU8 = AtomicU8::new(InitPhase::NotStarted as u8);

/// Current initialization phase
pub fn current_phase() -> InitPhase {
    InitPhase::from(CURRENT_PHASE.load(Ordering::Acquire))
}

/// Atomically move `state` from `from` to `to`.
fn advance(state: &AtomicU8, from: InitPhase, to: InitPhase) -> Result<(), InitError> {
    if !from.can_transition_to(to) {
        return Err(InitError::InvalidPhaseTransition);
    }
    state
        .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
        .map(|_| ())
        .map_err(|_| InitError::InvalidPhaseTransition)
}

/// Get a human-readable status string for the current initialization phase
pub fn status_string() -> &'static str {
    current_phase().as_str()
}

/// Bring up serial logging and the text console.
///
/// A missing UART is tolerated: the console is the only device the kernel
/// cannot run without.
///
/// # Errors
///
/// - `InitError::AlreadyInitialized` if called more than once
/// - `InitError::VgaFailed` if the text buffer does not hold written values
pub fn initialize_all() -> errors::Result<()> {
    if advance(&CURRENT_PHASE, InitPhase::NotStarted, InitPhase::Serial).is_err() {
        return Err(InitError::AlreadyInitialized.into());
    }

    match serial::init() {
        Ok(()) => {
            // Only the first installer wins; a second logger is not an error here.
            let _ = logger::init();
            log::info!("serial: COM1 ready");
        }
        Err(_) => {
            // No serial channel: nothing to log to, carry on with the console.
        }
    }

    advance(&CURRENT_PHASE, InitPhase::Serial, InitPhase::Console)?;

    if let Err(err) = vga_buffer::init() {
        CURRENT_PHASE.store(InitPhase::Failed as u8, Ordering::Release);
        log::error!("console: {}", err);
        return Err(InitError::VgaFailed(err).into());
    }
    log::debug!("console: text buffer verified and cleared");

    advance(&CURRENT_PHASE, InitPhase::Console, InitPhase::Complete)?;
    Ok(())
}

/// Halt the CPU forever
pub fn halt_forever() -> ! {
    loop {
        ArchCpu::halt();
    }
}
