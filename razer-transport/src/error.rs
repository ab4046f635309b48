//! Transport and codec error types

use thiserror::Error;

/// Errors from the transport boundary (enumeration, open, raw I/O)
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Device busy")]
    DeviceBusy,

    #[error("Communication timeout")]
    Timeout,

    #[error("Device disconnected")]
    Disconnected,

    #[error("HID error: {0}")]
    Hid(String),
}

impl From<hidapi::HidError> for TransportError {
    fn from(e: hidapi::HidError) -> Self {
        let msg = e.to_string();
        if msg.contains("Permission denied") || msg.contains("EPERM") {
            TransportError::PermissionDenied(msg)
        } else if msg.contains("busy") || msg.contains("EBUSY") {
            TransportError::DeviceBusy
        } else {
            TransportError::Hid(msg)
        }
    }
}

/// Errors from the report codec.
///
/// `ChecksumMismatch` on a response is a transient transport fault and is
/// retried by the transaction layer; the other variants indicate a defect in
/// the data that produced the report and fail immediately.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Response checksum mismatch")]
    ChecksumMismatch,

    #[error("Malformed report: {len} bytes")]
    MalformedReport { len: usize },

    #[error("Argument overflow: {len} bytes exceeds report capacity")]
    ArgumentOverflow { len: usize },
}
