//! High-level EC control for Razer laptops
//!
//! Sits on top of `razer-transport` and owns the device semantics:
//!
//! - [`catalog`]: the static table of command families and selectors
//! - [`actions`] / [`resolver`]: user intents and their exact ordered
//!   command sequences
//! - [`probes`]: read-back queries and their decoders
//! - [`profile`]: per-model configuration (features, status codes, timing)
//! - [`session`]: the serialized worker that owns one device handle

pub mod actions;
pub mod catalog;
pub mod error;
pub mod probes;
pub mod profile;
pub mod resolver;
pub mod session;
pub mod types;

pub use actions::{Action, FanSetting};
pub use error::{ApplyError, DeviceError};
pub use probes::{Probe, Reading};
pub use profile::{profile_for, DeviceProfile, Feature};
pub use resolver::{resolve, FAN_RPM_RANGE};
pub use session::DeviceSession;
pub use types::{CpuBoost, FanMode, FanZone, GpuBoost, LogoMode, PerfMode, Toggle};
