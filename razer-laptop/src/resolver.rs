//! Action resolver: intent → ordered command sequence
//!
//! Resolution is pure and deterministic: the same action against the same
//! profile always yields byte-identical sequences, and nothing is read from
//! the device. Two rules are load-bearing and tested:
//!
//! - intents that touch the fans are duplicated per zone, because the EC
//!   models the two fan channels independently;
//! - where the firmware separates "set parameter" from "activate", the
//!   sequence carries both in the required order (profile mode before fan
//!   rpm, lighting effect before lighting power, custom profile before
//!   boost levels). Reordering breaks the physical effect silently, so the
//!   order is part of the contract, not an implementation detail.

use razer_transport::Command;

use crate::actions::{Action, FanSetting};
use crate::catalog::{spec, Family};
use crate::error::DeviceError;
use crate::profile::DeviceProfile;
use crate::types::{
    battery_care, lights_always_on, max_fan_speed, Cluster, FanMode, FanZone, LogoMode, PerfMode,
    Toggle,
};

/// Valid manual fan targets, in rpm
pub const FAN_RPM_RANGE: std::ops::RangeInclusive<u16> = 2000..=5000;

/// Resolve an action into the exact ordered command sequence for this
/// profile, or fail with `UnsupportedAction` before anything is sent.
pub fn resolve(action: &Action, profile: &DeviceProfile) -> Result<Vec<Command>, DeviceError> {
    if !profile.supports(action.feature()) {
        return Err(DeviceError::UnsupportedAction(format!(
            "{action} is not available on {}",
            profile.model
        )));
    }

    let sequence = match *action {
        Action::Perf(mode) => perf_mode_per_zone(mode, FanMode::Auto),

        Action::Fan(FanSetting::Auto) => perf_mode_per_zone(PerfMode::Balanced, FanMode::Auto),

        Action::Fan(FanSetting::Manual { rpm }) => {
            if !FAN_RPM_RANGE.contains(&rpm) {
                return Err(DeviceError::UnsupportedAction(format!(
                    "fan target {rpm} rpm outside {}..={}",
                    FAN_RPM_RANGE.start(),
                    FAN_RPM_RANGE.end()
                )));
            }
            // Manual mode first, then the per-zone target speed
            let mut sequence = perf_mode_per_zone(PerfMode::Balanced, FanMode::Manual);
            sequence.extend(FanZone::ALL.iter().map(|&zone| {
                spec(Family::SetFanRpm).command(&[0x00, zone as u8, (rpm / 100) as u8])
            }));
            sequence
        }

        Action::CpuBoost(level) => boost_sequence(Cluster::Cpu, level as u8),
        Action::GpuBoost(level) => boost_sequence(Cluster::Gpu, level as u8),

        Action::MaxFanSpeed(state) => {
            let value = match state {
                Toggle::On => max_fan_speed::ENABLE,
                Toggle::Off => max_fan_speed::DISABLE,
            };
            let mut sequence = perf_mode_per_zone(PerfMode::Custom, FanMode::Auto);
            sequence.push(spec(Family::SetMaxFanSpeed).command(&[value]));
            sequence
        }

        Action::Logo(mode) => {
            let mut sequence = Vec::with_capacity(2);
            // Effect before power: the power command latches whatever effect
            // is currently selected
            if let Some(effect) = mode.effect_value() {
                sequence.push(spec(Family::SetLogoMode).command(&[0x01, 0x04, effect]));
            }
            let power = u8::from(mode != LogoMode::Off);
            sequence.push(spec(Family::SetLogoPower).command(&[0x01, 0x04, power]));
            sequence
        }

        Action::KbdBrightness(level) => {
            vec![spec(Family::SetKbdBrightness).command(&[0x01, 0x05, level])]
        }

        Action::LightsAlwaysOn(state) => {
            let value = match state {
                Toggle::On => lights_always_on::ENABLE,
                Toggle::Off => lights_always_on::DISABLE,
            };
            vec![spec(Family::SetLightsAlwaysOn).command(&[value, 0x00])]
        }

        Action::BatteryCare(state) => {
            let value = match state {
                Toggle::On => battery_care::ENABLE,
                Toggle::Off => battery_care::DISABLE,
            };
            vec![spec(Family::SetBatteryCare).command(&[value])]
        }
    };

    debug_assert!(!sequence.is_empty());
    Ok(sequence)
}

/// The profile-mode command, once per fan zone in firmware order
fn perf_mode_per_zone(perf: PerfMode, fan: FanMode) -> Vec<Command> {
    FanZone::ALL
        .iter()
        .map(|&zone| {
            spec(Family::SetPerfMode).command(&[0x01, zone as u8, perf as u8, fan as u8])
        })
        .collect()
}

/// Boost requires the custom profile to be active; the sequence activates it
/// explicitly rather than assuming device state.
fn boost_sequence(cluster: Cluster, level: u8) -> Vec<Command> {
    let mut sequence = perf_mode_per_zone(PerfMode::Custom, FanMode::Auto);
    sequence.push(spec(Family::SetBoost).command(&[0x00, cluster as u8, level]));
    sequence
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::profile_for;
    use crate::types::CpuBoost;

    fn blade16() -> DeviceProfile {
        profile_for(0x029f)
    }

    fn as_tuples(sequence: &[Command]) -> Vec<(u8, u8, Vec<u8>)> {
        sequence
            .iter()
            .map(|c| (c.class, c.id, c.args.clone()))
            .collect()
    }

    #[test]
    fn fan_auto_matches_captured_ground_truth() {
        let sequence = resolve(&Action::Fan(FanSetting::Auto), &blade16()).unwrap();
        assert_eq!(
            as_tuples(&sequence),
            vec![
                (0x0d, 0x02, vec![0x01, 0x01, 0x00, 0x00]),
                (0x0d, 0x02, vec![0x01, 0x02, 0x00, 0x00]),
            ]
        );
    }

    #[test]
    fn silent_mode_matches_captured_ground_truth() {
        let sequence = resolve(&Action::Perf(PerfMode::Silent), &blade16()).unwrap();
        assert_eq!(
            as_tuples(&sequence),
            vec![
                (0x0d, 0x02, vec![0x01, 0x01, 0x05, 0x00]),
                (0x0d, 0x02, vec![0x01, 0x02, 0x05, 0x00]),
            ]
        );
    }

    #[test]
    fn manual_fan_sets_mode_before_rpm_on_both_zones() {
        let sequence =
            resolve(&Action::Fan(FanSetting::Manual { rpm: 3500 }), &blade16()).unwrap();
        assert_eq!(
            as_tuples(&sequence),
            vec![
                (0x0d, 0x02, vec![0x01, 0x01, 0x00, 0x01]),
                (0x0d, 0x02, vec![0x01, 0x02, 0x00, 0x01]),
                (0x0d, 0x01, vec![0x00, 0x01, 35]),
                (0x0d, 0x01, vec![0x00, 0x02, 35]),
            ]
        );
    }

    #[test]
    fn fan_rpm_out_of_range_fails_before_transmission() {
        for rpm in [0, 1999, 5001] {
            let err = resolve(&Action::Fan(FanSetting::Manual { rpm }), &blade16()).unwrap_err();
            assert!(matches!(err, DeviceError::UnsupportedAction(_)));
        }
    }

    #[test]
    fn boost_activates_custom_profile_first() {
        let sequence = resolve(&Action::CpuBoost(CpuBoost::Overclock), &blade16()).unwrap();
        assert_eq!(
            as_tuples(&sequence),
            vec![
                (0x0d, 0x02, vec![0x01, 0x01, 0x04, 0x00]),
                (0x0d, 0x02, vec![0x01, 0x02, 0x04, 0x00]),
                (0x0d, 0x07, vec![0x00, 0x01, 0x04]),
            ]
        );
    }

    #[test]
    fn logo_effect_precedes_power() {
        let sequence = resolve(&Action::Logo(LogoMode::Breathing), &blade16()).unwrap();
        assert_eq!(
            as_tuples(&sequence),
            vec![
                (0x03, 0x02, vec![0x01, 0x04, 0x02]),
                (0x03, 0x00, vec![0x01, 0x04, 0x01]),
            ]
        );
    }

    #[test]
    fn logo_off_only_cuts_power() {
        let sequence = resolve(&Action::Logo(LogoMode::Off), &blade16()).unwrap();
        assert_eq!(as_tuples(&sequence), vec![(0x03, 0x00, vec![0x01, 0x04, 0x00])]);
    }

    #[test]
    fn resolution_is_deterministic() {
        let profile = blade16();
        for action in [
            Action::Perf(PerfMode::Balanced),
            Action::Fan(FanSetting::Manual { rpm: 4200 }),
            Action::Logo(LogoMode::Static),
            Action::BatteryCare(Toggle::On),
        ] {
            assert_eq!(
                resolve(&action, &profile).unwrap(),
                resolve(&action, &profile).unwrap()
            );
        }
    }

    #[test]
    fn missing_feature_is_rejected_up_front() {
        let blade14 = profile_for(0x029d);
        let err = resolve(&Action::Logo(LogoMode::Static), &blade14).unwrap_err();
        assert!(matches!(err, DeviceError::UnsupportedAction(_)));
    }

    #[test]
    fn every_supported_action_resolves_non_empty() {
        let profile = blade16();
        let actions = [
            Action::Perf(PerfMode::Silent),
            Action::Fan(FanSetting::Auto),
            Action::Fan(FanSetting::Manual { rpm: 2000 }),
            Action::CpuBoost(CpuBoost::Low),
            Action::GpuBoost(crate::types::GpuBoost::High),
            Action::MaxFanSpeed(Toggle::On),
            Action::Logo(LogoMode::Off),
            Action::KbdBrightness(128),
            Action::LightsAlwaysOn(Toggle::Off),
            Action::BatteryCare(Toggle::Off),
        ];
        for action in actions {
            assert!(!resolve(&action, &profile).unwrap().is_empty());
        }
    }
}
