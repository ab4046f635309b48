//! hidapi-backed transport for the EC's feature-report interface

use std::time::Duration;

use async_trait::async_trait;
use hidapi::HidDevice;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::TransportError;
use crate::report::REPORT_LEN;
use crate::types::DeviceIdentity;
use crate::Transport;

/// HID report id carried in front of every frame on this interface
const REPORT_ID: u8 = 0;

/// Feature-report transport over a directly attached USB device.
///
/// Owns the handle exclusively; dropping the transport releases it.
pub struct HidWiredTransport {
    device: Mutex<HidDevice>,
    identity: DeviceIdentity,
    /// Settle time after a write before the EC can be polled
    post_write_delay: Duration,
}

impl HidWiredTransport {
    pub fn new(device: HidDevice, identity: DeviceIdentity) -> Self {
        Self {
            device: Mutex::new(device),
            identity,
            post_write_delay: Duration::from_micros(2000),
        }
    }

    /// Override the post-write settle delay (profile timing)
    pub fn set_post_write_delay(&mut self, delay: Duration) {
        self.post_write_delay = delay;
    }
}

#[async_trait]
impl Transport for HidWiredTransport {
    async fn write_report(&self, frame: &[u8]) -> Result<(), TransportError> {
        let mut buf = Vec::with_capacity(frame.len() + 1);
        buf.push(REPORT_ID);
        buf.extend_from_slice(frame);

        debug!(
            "Sending feature report: {:02X?}…",
            &buf[..10.min(buf.len())]
        );
        {
            let device = self.device.lock();
            device.send_feature_report(&buf)?;
        }
        std::thread::sleep(self.post_write_delay);
        Ok(())
    }

    async fn read_report(&self) -> Result<Vec<u8>, TransportError> {
        let mut buf = vec![0u8; REPORT_LEN + 1];
        buf[0] = REPORT_ID;
        let read = {
            let device = self.device.lock();
            device.get_feature_report(&mut buf)?
        };
        if read != buf.len() {
            return Err(TransportError::Hid(format!(
                "short feature report: {read} of {} bytes",
                buf.len()
            )));
        }
        // Strip the report-id byte
        buf.remove(0);
        Ok(buf)
    }

    fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }
}
