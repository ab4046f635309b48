//! Read-back probes
//!
//! Probes are the query side of the protocol: single getter commands (or a
//! short fixed series of them) whose answers come back in the response's
//! argument region. Decoding is kept here so the session worker only drives
//! command traffic.

use std::fmt;

use crate::error::DeviceError;
use crate::profile::Feature;
use crate::types::{
    battery_care, lights_always_on, CpuBoost, FanMode, FanZone, GpuBoost, LogoMode, PerfMode,
    Toggle,
};

/// A read-back request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// Performance and fan mode, cross-checked across both fan zones
    PerfMode,
    /// Current fan speed of one zone
    FanRpm(FanZone),
    CpuBoost,
    GpuBoost,
    /// Lid-logo state (power plus effect)
    Logo,
    KbdBrightness,
    LightsAlwaysOn,
    BatteryCare,
}

impl Probe {
    pub fn feature(&self) -> Feature {
        match self {
            Probe::PerfMode | Probe::CpuBoost | Probe::GpuBoost => Feature::Perf,
            Probe::FanRpm(_) => Feature::Fan,
            Probe::Logo => Feature::LidLogo,
            Probe::KbdBrightness => Feature::KbdBacklight,
            Probe::LightsAlwaysOn => Feature::LightsAlwaysOn,
            Probe::BatteryCare => Feature::BatteryCare,
        }
    }
}

/// A decoded probe answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    Perf { mode: PerfMode, fan: FanMode },
    FanRpm(u16),
    CpuBoost(CpuBoost),
    GpuBoost(GpuBoost),
    Logo(LogoMode),
    KbdBrightness(u8),
    LightsAlwaysOn(Toggle),
    BatteryCare(Toggle),
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Perf { mode, fan } => write!(f, "{mode} (fan {fan})"),
            Reading::FanRpm(rpm) => write!(f, "{rpm} rpm"),
            Reading::CpuBoost(level) => write!(f, "{level}"),
            Reading::GpuBoost(level) => write!(f, "{level}"),
            Reading::Logo(mode) => write!(f, "{mode}"),
            Reading::KbdBrightness(level) => write!(f, "{level}/255"),
            Reading::LightsAlwaysOn(state) => write!(f, "{state}"),
            Reading::BatteryCare(state) => write!(f, "{state}"),
        }
    }
}

fn arg(args: &[u8], index: usize) -> Result<u8, DeviceError> {
    args.get(index).copied().ok_or_else(|| {
        DeviceError::InconsistentReply(format!("response carries only {} args", args.len()))
    })
}

pub(crate) fn perf_from_args(args: &[u8]) -> Result<(PerfMode, FanMode), DeviceError> {
    Ok((
        PerfMode::try_from(arg(args, 2)?)?,
        FanMode::try_from(arg(args, 3)?)?,
    ))
}

pub(crate) fn rpm_from_args(args: &[u8], zone: FanZone) -> Result<u16, DeviceError> {
    if arg(args, 1)? != zone as u8 {
        return Err(DeviceError::InconsistentReply(format!(
            "fan zone echo mismatch: asked {}, got {}",
            zone as u8,
            args[1]
        )));
    }
    Ok(arg(args, 2)? as u16 * 100)
}

pub(crate) fn boost_from_args(args: &[u8], cluster: u8) -> Result<u8, DeviceError> {
    if arg(args, 1)? != cluster {
        return Err(DeviceError::InconsistentReply(format!(
            "cluster echo mismatch: asked {cluster}, got {}",
            args[1]
        )));
    }
    arg(args, 2)
}

pub(crate) fn logo_power_from_args(args: &[u8]) -> Result<bool, DeviceError> {
    match arg(args, 2)? {
        0 => Ok(false),
        1 => Ok(true),
        value => Err(DeviceError::InvalidValue {
            what: "logo power",
            value,
        }),
    }
}

pub(crate) fn logo_effect_from_args(args: &[u8]) -> Result<LogoMode, DeviceError> {
    match arg(args, 2)? {
        0 => Ok(LogoMode::Static),
        2 => Ok(LogoMode::Breathing),
        value => Err(DeviceError::InvalidValue {
            what: "logo effect",
            value,
        }),
    }
}

pub(crate) fn lights_always_on_from_args(args: &[u8]) -> Result<Toggle, DeviceError> {
    match arg(args, 0)? {
        lights_always_on::ENABLE => Ok(Toggle::On),
        lights_always_on::DISABLE => Ok(Toggle::Off),
        value => Err(DeviceError::InvalidValue {
            what: "lights-always-on",
            value,
        }),
    }
}

pub(crate) fn battery_care_from_args(args: &[u8]) -> Result<Toggle, DeviceError> {
    match arg(args, 0)? {
        battery_care::ENABLE => Ok(Toggle::On),
        battery_care::DISABLE => Ok(Toggle::Off),
        value => Err(DeviceError::InvalidValue {
            what: "battery care",
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perf_decodes_mode_and_fan() {
        let (mode, fan) = perf_from_args(&[0, 1, 5, 0]).unwrap();
        assert_eq!(mode, PerfMode::Silent);
        assert_eq!(fan, FanMode::Auto);
    }

    #[test]
    fn rpm_checks_zone_echo() {
        assert_eq!(rpm_from_args(&[0, 1, 35], FanZone::Zone1).unwrap(), 3500);
        assert!(rpm_from_args(&[0, 2, 35], FanZone::Zone1).is_err());
    }

    #[test]
    fn short_reply_is_inconsistent_not_a_panic() {
        assert!(matches!(
            perf_from_args(&[0]),
            Err(DeviceError::InconsistentReply(_))
        ));
    }

    #[test]
    fn unknown_logo_effect_is_invalid_value() {
        assert!(matches!(
            logo_effect_from_args(&[1, 4, 9]),
            Err(DeviceError::InvalidValue { .. })
        ));
    }
}
