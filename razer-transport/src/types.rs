//! Common types for the transport layer

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identity of an enumerated HID device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// USB Vendor ID
    pub vendor_id: u16,
    /// USB Product ID
    pub product_id: u16,
    /// Platform device path of the opened interface
    pub path: String,
    /// Serial number if available
    pub serial: Option<String>,
    /// Product name if available
    pub product: Option<String>,
}

/// Outcome reported by the firmware in the status byte of a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Command executed
    Accepted,
    /// EC is processing an earlier command; retry later
    Busy,
    /// Firmware refused the command
    Failed,
    /// Firmware does not implement the command
    Unsupported,
    /// Status byte not present in the configured table
    Unknown(u8),
}

/// Firmware status-byte values.
///
/// These are per-model constants established from captures, not protocol
/// logic: porting to a different EC firmware means editing the profile that
/// carries this table, never the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCodes {
    /// Written into outgoing requests; also seen while a response is pending
    pub new: u8,
    pub busy: u8,
    pub accepted: u8,
    pub failed: u8,
    pub unsupported: u8,
}

impl Default for StatusCodes {
    fn default() -> Self {
        Self {
            new: 0x00,
            busy: 0x01,
            accepted: 0x02,
            failed: 0x03,
            unsupported: 0x05,
        }
    }
}

impl StatusCodes {
    /// Map a raw status byte to its meaning under this table.
    ///
    /// The `new` code is not a response status; callers treat it as
    /// "response not ready yet" and keep polling.
    pub fn classify(&self, code: u8) -> Status {
        if code == self.accepted {
            Status::Accepted
        } else if code == self.busy {
            Status::Busy
        } else if code == self.failed {
            Status::Failed
        } else if code == self.unsupported {
            Status::Unsupported
        } else {
            Status::Unknown(code)
        }
    }
}

/// Transaction timing and retry bounds, per device model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    /// Deadline for a response to one transmitted command (ms)
    pub response_timeout_ms: u64,
    /// Pause between response polls (ms)
    pub poll_interval_ms: u64,
    /// Bounded retries for Busy / response-checksum faults
    pub busy_retries: u32,
    /// Pause before re-sending after a transient fault (ms)
    pub backoff_ms: u64,
    /// Settle time after writing a feature report (µs)
    pub post_write_delay_us: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            response_timeout_ms: 200,
            poll_interval_ms: 5,
            busy_retries: 3,
            backoff_ms: 20,
            post_write_delay_us: 2000,
        }
    }
}

impl Timing {
    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    pub fn post_write_delay(&self) -> Duration {
        Duration::from_micros(self.post_write_delay_us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_codes_match_captures() {
        let codes = StatusCodes::default();
        assert_eq!(codes.classify(0x02), Status::Accepted);
        assert_eq!(codes.classify(0x01), Status::Busy);
        assert_eq!(codes.classify(0x03), Status::Failed);
        assert_eq!(codes.classify(0x05), Status::Unsupported);
        assert_eq!(codes.classify(0x7f), Status::Unknown(0x7f));
    }

    #[test]
    fn remapped_codes_change_classification_without_codec_changes() {
        let codes = StatusCodes {
            new: 0x10,
            busy: 0x20,
            accepted: 0x30,
            failed: 0x40,
            unsupported: 0x50,
        };
        assert_eq!(codes.classify(0x30), Status::Accepted);
        assert_eq!(codes.classify(0x20), Status::Busy);
        // The stock "accepted" value means nothing under the remapped table
        assert_eq!(codes.classify(0x02), Status::Unknown(0x02));
    }
}
