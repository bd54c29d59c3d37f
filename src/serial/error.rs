// src/serial/error.rs

//! Error types for serial port operations

use core::fmt;

/// Serial port errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialError {
    /// Port already initialized (not an error, just informational)
    AlreadyInitialized,
    /// The loopback self-test did not echo the test byte
    PortNotPresent,
    /// The transmitter never reported an empty holding register
    Timeout,
}

impl fmt::Display for SerialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerialError::AlreadyInitialized => write!(f, "already initialized"),
            SerialError::PortNotPresent => write!(f, "hardware not present"),
            SerialError::Timeout => write!(f, "operation timeout"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_error_display() {
        assert_eq!(
            format!("{}", SerialError::PortNotPresent),
            "hardware not present"
        );
    }
}
