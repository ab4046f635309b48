//! User-facing intents
//!
//! An [`Action`] is a named semantic operation plus its parameters. It only
//! exists as a call argument: the resolver turns it into an ordered command
//! sequence immediately, and the session applies that sequence atomically
//! with respect to other callers.

use std::fmt;

use crate::profile::Feature;
use crate::types::{CpuBoost, GpuBoost, LogoMode, PerfMode, Toggle};

/// Fan control intent: firmware regulation or a fixed target speed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanSetting {
    Auto,
    /// Fixed speed; valid targets are 2000..=5000 rpm
    Manual {
        rpm: u16,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Select the performance profile (fans back to auto regulation)
    Perf(PerfMode),
    /// Fan regulation within the balanced profile
    Fan(FanSetting),
    /// CPU boost level (implies the custom profile)
    CpuBoost(CpuBoost),
    /// GPU boost level (implies the custom profile)
    GpuBoost(GpuBoost),
    /// Max-fan-speed override (implies the custom profile)
    MaxFanSpeed(Toggle),
    /// Lid-logo lighting
    Logo(LogoMode),
    /// Keyboard backlight brightness, absolute 0..=255
    KbdBrightness(u8),
    /// Keep chassis lights on while the lid is closed
    LightsAlwaysOn(Toggle),
    /// Battery charge limiter
    BatteryCare(Toggle),
}

impl Action {
    /// The device feature this action depends on
    pub fn feature(&self) -> Feature {
        match self {
            Action::Perf(_) | Action::CpuBoost(_) | Action::GpuBoost(_) => Feature::Perf,
            Action::Fan(_) | Action::MaxFanSpeed(_) => Feature::Fan,
            Action::Logo(_) => Feature::LidLogo,
            Action::KbdBrightness(_) => Feature::KbdBacklight,
            Action::LightsAlwaysOn(_) => Feature::LightsAlwaysOn,
            Action::BatteryCare(_) => Feature::BatteryCare,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Perf(mode) => write!(f, "perf {mode}"),
            Action::Fan(FanSetting::Auto) => write!(f, "fan auto"),
            Action::Fan(FanSetting::Manual { rpm }) => write!(f, "fan {rpm} rpm"),
            Action::CpuBoost(level) => write!(f, "cpu boost {level}"),
            Action::GpuBoost(level) => write!(f, "gpu boost {level}"),
            Action::MaxFanSpeed(state) => write!(f, "max fan speed {state}"),
            Action::Logo(mode) => write!(f, "logo {mode}"),
            Action::KbdBrightness(level) => write!(f, "keyboard brightness {level}"),
            Action::LightsAlwaysOn(state) => write!(f, "lights always on {state}"),
            Action::BatteryCare(state) => write!(f, "battery care {state}"),
        }
    }
}
