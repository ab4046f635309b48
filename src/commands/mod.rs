//! Command handlers for the CLI application.
//!
//! - `query`: read-only commands (enumerate, info)
//! - `set`: everything that changes EC state

pub mod query;
pub mod set;

use anyhow::{bail, Context};
use razer_laptop::DeviceSession;
use razer_transport::discovery;

/// Result type for command handlers
pub type CommandResult = anyhow::Result<()>;

/// Open a session against the requested PID, or the first Razer device
/// found when none was given.
pub fn open_session(pid: Option<u16>) -> anyhow::Result<DeviceSession> {
    let pid = match pid {
        Some(pid) => pid,
        None => {
            let devices = discovery::enumerate().context("device enumeration failed")?;
            match devices.first() {
                Some(device) => device.product_id,
                None => bail!("no Razer devices found"),
            }
        }
    };
    DeviceSession::open(pid)
        .with_context(|| format!("failed to open device with PID 0x{pid:04x}"))
}
