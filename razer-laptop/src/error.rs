//! Device-level error types

use razer_transport::{ProtocolError, TransactionError, TransportError};
use thiserror::Error;

/// Errors from resolving or executing device operations
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Firmware rejected command (status 0x{status:02X})")]
    Rejected { status: u8 },

    #[error("Command not supported by this firmware")]
    Unsupported,

    #[error("Unsupported action: {0}")]
    UnsupportedAction(String),

    #[error("Invalid {what} value: 0x{value:02X}")]
    InvalidValue { what: &'static str, value: u8 },

    #[error("Inconsistent device reply: {0}")]
    InconsistentReply(String),

    #[error("Session closed")]
    SessionClosed,
}

impl From<TransactionError> for DeviceError {
    fn from(e: TransactionError) -> Self {
        match e {
            TransactionError::Transport(t) => DeviceError::Transport(t),
            TransactionError::Protocol(p) => DeviceError::Protocol(p),
            TransactionError::Rejected { status } => DeviceError::Rejected { status },
            TransactionError::Unsupported => DeviceError::Unsupported,
        }
    }
}

/// An action sequence aborted part-way through.
///
/// `completed` counts commands that took effect before the failure, so the
/// caller knows the physical state may be inconsistent (e.g. one fan zone
/// updated, the other not).
#[derive(Error, Debug)]
#[error("Action aborted after {completed}/{total} commands: {source}")]
pub struct ApplyError {
    pub completed: usize,
    pub total: usize,
    #[source]
    pub source: DeviceError,
}

impl ApplyError {
    pub(crate) fn before_any(source: DeviceError) -> Self {
        Self {
            completed: 0,
            total: 0,
            source,
        }
    }
}
