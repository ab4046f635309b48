//! Wire protocol and HID transport for Razer laptop EC control
//!
//! This crate owns everything below device semantics:
//!
//! - the 90-byte feature-report codec with its XOR checksum ([`report`])
//! - status-byte and timing configuration types ([`types`])
//! - the transaction engine: encode → transmit → poll → decode → classify,
//!   with bounded retries ([`transaction`])
//! - enumeration and the hidapi-backed wired transport ([`discovery`],
//!   [`hid_wired`])
//!
//! What the bytes *mean* (command catalog, action resolution, device
//! profiles) lives in the `razer-laptop` crate on top of this one.

pub mod discovery;
pub mod error;
pub mod hid_wired;
pub mod report;
pub mod transaction;
pub mod types;

pub use discovery::{enumerate, open_path, open_pid, RAZER_VID};
pub use error::{ProtocolError, TransportError};
pub use hid_wired::HidWiredTransport;
pub use report::{Command, DecodedReport, ARG_CAPACITY, REPORT_LEN};
pub use transaction::{TransactionError, TransactionManager};
pub use types::{DeviceIdentity, Status, StatusCodes, Timing};

use async_trait::async_trait;

/// Raw feature-report transport.
///
/// Implementations move codec frames opaquely and unmodified; the HID
/// report-id prefix is a transport detail handled below this trait.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transmit one encoded request frame
    async fn write_report(&self, frame: &[u8]) -> Result<(), TransportError>;

    /// Fetch the device's current response buffer.
    ///
    /// The EC answers in place; an unprocessed buffer comes back with the
    /// request's own status byte, which the transaction layer treats as
    /// "keep polling".
    async fn read_report(&self) -> Result<Vec<u8>, TransportError>;

    /// Identity of the opened device
    fn identity(&self) -> &DeviceIdentity;
}
