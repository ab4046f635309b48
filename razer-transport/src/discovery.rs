//! Device discovery and opening
//!
//! Laptops expose several HID interfaces under the same VID/PID; only one of
//! them accepts EC feature reports. Opening probes each candidate with a
//! minimal feature report and keeps the first interface that answers.

use hidapi::HidApi;
use tracing::{debug, info};

use crate::error::TransportError;
use crate::hid_wired::HidWiredTransport;
use crate::types::DeviceIdentity;

/// Razer USB vendor id
pub const RAZER_VID: u16 = 0x1532;

fn identity_of(info: &hidapi::DeviceInfo) -> DeviceIdentity {
    DeviceIdentity {
        vendor_id: info.vendor_id(),
        product_id: info.product_id(),
        path: info.path().to_string_lossy().into_owned(),
        serial: info.serial_number().map(str::to_owned),
        product: info.product_string().map(str::to_owned),
    }
}

/// List every Razer HID interface currently attached.
pub fn enumerate() -> Result<Vec<DeviceIdentity>, TransportError> {
    let api = HidApi::new().map_err(TransportError::from)?;
    let devices: Vec<DeviceIdentity> = api
        .device_list()
        .filter(|d| d.vendor_id() == RAZER_VID)
        .map(identity_of)
        .collect();
    info!("Found {} Razer interfaces", devices.len());
    Ok(devices)
}

/// Open the EC feature interface of the device with the given product id.
///
/// Probes each same-PID interface with an empty feature report and returns
/// the first that accepts one. A handle already claimed elsewhere surfaces
/// `DeviceBusy`; missing udev permissions surface `PermissionDenied`.
pub fn open_pid(pid: u16) -> Result<HidWiredTransport, TransportError> {
    let api = HidApi::new().map_err(TransportError::from)?;
    let mut last_error: Option<TransportError> = None;

    for info in api
        .device_list()
        .filter(|d| (d.vendor_id(), d.product_id()) == (RAZER_VID, pid))
    {
        let device = match info.open_device(&api) {
            Ok(device) => device,
            Err(e) => {
                debug!("Skipping {:?}: {}", info.path(), e);
                last_error = Some(e.into());
                continue;
            }
        };
        // Not every interface under this PID talks the EC protocol
        if device.send_feature_report(&[0, 0]).is_ok() {
            let identity = identity_of(info);
            debug!("Opened EC interface at {}", identity.path);
            return Ok(HidWiredTransport::new(device, identity));
        }
    }

    Err(last_error.unwrap_or_else(|| {
        TransportError::DeviceNotFound(format!("no EC feature interface for PID 0x{pid:04x}"))
    }))
}

/// Open a specific interface by platform path.
pub fn open_path(path: &str) -> Result<HidWiredTransport, TransportError> {
    let api = HidApi::new().map_err(TransportError::from)?;
    let info = api
        .device_list()
        .find(|d| d.path().to_string_lossy() == path)
        .ok_or_else(|| TransportError::DeviceNotFound(path.to_owned()))?;
    let device = info.open_device(&api)?;
    Ok(HidWiredTransport::new(device, identity_of(info)))
}
