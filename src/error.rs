//! # Error Types
//!
//! The printer protocol itself is fire-and-forget over an unacknowledged
//! link, so the only failures the driver can observe are transport-level:
//! the serial port vanished, a write failed, a read errored. Out-of-range
//! command parameters are clamped, not rejected, and an unanswered status
//! request yields `None`, not an error.

use thiserror::Error;

/// Main error type for driver operations
#[derive(Debug, Error)]
pub enum BrasaError {
    /// Transport-level errors (open, configuration, link loss)
    #[error("Transport error: {0}")]
    Transport(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serialport::Error> for BrasaError {
    fn from(err: serialport::Error) -> Self {
        BrasaError::Transport(err.to_string())
    }
}
