//! Typed EC values and their wire encodings
//!
//! Wire values come from capture analysis; conversions fail loudly on bytes
//! the firmware should never produce.

use std::fmt;
use std::str::FromStr;

use crate::error::DeviceError;

/// Overall performance profile of the EC
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerfMode {
    Balanced = 0,
    Custom = 4,
    Silent = 5,
}

impl TryFrom<u8> for PerfMode {
    type Error = DeviceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Balanced),
            4 => Ok(Self::Custom),
            5 => Ok(Self::Silent),
            _ => Err(DeviceError::InvalidValue {
                what: "performance mode",
                value,
            }),
        }
    }
}

impl FromStr for PerfMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "balanced" => Ok(Self::Balanced),
            "custom" => Ok(Self::Custom),
            "silent" => Ok(Self::Silent),
            _ => Err(format!(
                "unknown performance mode: \"{s}\". Use balanced, silent or custom"
            )),
        }
    }
}

impl fmt::Display for PerfMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Balanced => "balanced",
            Self::Custom => "custom",
            Self::Silent => "silent",
        })
    }
}

/// Fan regulation mode within the balanced profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanMode {
    Auto = 0,
    Manual = 1,
}

impl TryFrom<u8> for FanMode {
    type Error = DeviceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Auto),
            1 => Ok(Self::Manual),
            _ => Err(DeviceError::InvalidValue {
                what: "fan mode",
                value,
            }),
        }
    }
}

impl fmt::Display for FanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Manual => "manual",
        })
    }
}

/// Independently controlled fan channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanZone {
    Zone1 = 1,
    Zone2 = 2,
}

impl FanZone {
    /// Both channels, in the order the firmware expects them addressed
    pub const ALL: [FanZone; 2] = [FanZone::Zone1, FanZone::Zone2];
}

/// Boost cluster selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cluster {
    Cpu = 1,
    Gpu = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuBoost {
    Low = 0,
    Medium = 1,
    High = 2,
    Boost = 3,
    Overclock = 4,
}

impl TryFrom<u8> for CpuBoost {
    type Error = DeviceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Low),
            1 => Ok(Self::Medium),
            2 => Ok(Self::High),
            3 => Ok(Self::Boost),
            4 => Ok(Self::Overclock),
            _ => Err(DeviceError::InvalidValue {
                what: "CPU boost",
                value,
            }),
        }
    }
}

impl FromStr for CpuBoost {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "boost" => Ok(Self::Boost),
            "overclock" => Ok(Self::Overclock),
            _ => Err(format!(
                "unknown CPU boost: \"{s}\". Use low, medium, high, boost or overclock"
            )),
        }
    }
}

impl fmt::Display for CpuBoost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Boost => "boost",
            Self::Overclock => "overclock",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuBoost {
    Low = 0,
    Medium = 1,
    High = 2,
}

impl TryFrom<u8> for GpuBoost {
    type Error = DeviceError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Low),
            1 => Ok(Self::Medium),
            2 => Ok(Self::High),
            _ => Err(DeviceError::InvalidValue {
                what: "GPU boost",
                value,
            }),
        }
    }
}

impl FromStr for GpuBoost {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!(
                "unknown GPU boost: \"{s}\". Use low, medium or high"
            )),
        }
    }
}

impl fmt::Display for GpuBoost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

/// Lid-logo lighting mode.
///
/// On the wire this is two knobs: a power bit and an effect selector
/// (static=0, breathing=2). The resolver folds both into one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoMode {
    Off,
    Static,
    Breathing,
}

impl LogoMode {
    /// Effect selector for the lighting-mode command
    pub fn effect_value(self) -> Option<u8> {
        match self {
            LogoMode::Off => None,
            LogoMode::Static => Some(0),
            LogoMode::Breathing => Some(2),
        }
    }
}

impl FromStr for LogoMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "static" => Ok(Self::Static),
            "breathing" => Ok(Self::Breathing),
            _ => Err(format!(
                "unknown logo mode: \"{s}\". Use off, static or breathing"
            )),
        }
    }
}

impl fmt::Display for LogoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Off => "off",
            Self::Static => "static",
            Self::Breathing => "breathing",
        })
    }
}

/// On/off argument shared by the toggle-style actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Off,
    On,
}

impl Toggle {
    pub fn is_on(self) -> bool {
        matches!(self, Toggle::On)
    }
}

impl FromStr for Toggle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "on" | "enable" | "enabled" | "true" | "1" => Ok(Self::On),
            "off" | "disable" | "disabled" | "false" | "0" => Ok(Self::Off),
            _ => Err(format!("expected on/off, got \"{s}\"")),
        }
    }
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_on() { "on" } else { "off" })
    }
}

/// Wire values for the lights-always-on switch
pub mod lights_always_on {
    pub const ENABLE: u8 = 0x03;
    pub const DISABLE: u8 = 0x00;
}

/// Wire values for the battery-care charge limiter
pub mod battery_care {
    pub const ENABLE: u8 = 0xd0;
    pub const DISABLE: u8 = 0x50;
}

/// Wire values for the max-fan-speed override
pub mod max_fan_speed {
    pub const ENABLE: u8 = 0x02;
    pub const DISABLE: u8 = 0x00;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perf_mode_round_trips_wire_values() {
        for mode in [PerfMode::Balanced, PerfMode::Custom, PerfMode::Silent] {
            assert_eq!(PerfMode::try_from(mode as u8).unwrap(), mode);
        }
        assert!(PerfMode::try_from(1).is_err());
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Silent".parse::<PerfMode>().unwrap(), PerfMode::Silent);
        assert_eq!("BREATHING".parse::<LogoMode>().unwrap(), LogoMode::Breathing);
        assert_eq!("Enable".parse::<Toggle>().unwrap(), Toggle::On);
    }
}
