//! Per-model device profiles
//!
//! Everything expected to change between laptop models lives here as data:
//! which features the EC exposes, its status-byte table and its timing.
//! Profiles are serde types so alternative tables can be loaded from JSON
//! instead of recompiling.

use serde::{Deserialize, Serialize};

use razer_transport::{StatusCodes, Timing};

/// A controllable EC feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    Perf,
    Fan,
    LidLogo,
    KbdBacklight,
    LightsAlwaysOn,
    BatteryCare,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::Perf,
        Feature::Fan,
        Feature::LidLogo,
        Feature::KbdBacklight,
        Feature::LightsAlwaysOn,
        Feature::BatteryCare,
    ];
}

/// Configuration for one laptop model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub model: String,
    pub pid: u16,
    pub features: Vec<Feature>,
    pub status_codes: StatusCodes,
    pub timing: Timing,
}

impl DeviceProfile {
    pub fn supports(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    /// Permissive profile for models not in the registry: every feature
    /// enabled, stock status codes and timing. Some actions may simply be
    /// refused by the firmware.
    pub fn fallback(pid: u16) -> Self {
        Self {
            model: "Unknown Razer laptop".into(),
            pid,
            features: Feature::ALL.to_vec(),
            status_codes: StatusCodes::default(),
            timing: Timing::default(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Built-in registry, keyed by USB product id
pub fn profile_for(pid: u16) -> DeviceProfile {
    match pid {
        0x029f => DeviceProfile {
            model: "Razer Blade 16 (2023)".into(),
            pid,
            features: Feature::ALL.to_vec(),
            status_codes: StatusCodes::default(),
            timing: Timing::default(),
        },
        0x029d => DeviceProfile {
            model: "Razer Blade 14 (2023)".into(),
            pid,
            // No lid logo on this chassis
            features: vec![
                Feature::Perf,
                Feature::Fan,
                Feature::KbdBacklight,
                Feature::LightsAlwaysOn,
                Feature::BatteryCare,
            ],
            status_codes: StatusCodes::default(),
            timing: Timing::default(),
        },
        _ => DeviceProfile::fallback(pid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_knows_the_blade_16() {
        let profile = profile_for(0x029f);
        assert!(profile.supports(Feature::LidLogo));
        assert_eq!(profile.model, "Razer Blade 16 (2023)");
    }

    #[test]
    fn blade_14_has_no_lid_logo() {
        let profile = profile_for(0x029d);
        assert!(!profile.supports(Feature::LidLogo));
        assert!(profile.supports(Feature::Fan));
    }

    #[test]
    fn unlisted_pid_gets_permissive_fallback() {
        let profile = profile_for(0x1234);
        assert_eq!(profile.features.len(), Feature::ALL.len());
    }

    #[test]
    fn profile_round_trips_through_json() {
        let profile = profile_for(0x029f);
        let json = profile.to_json().unwrap();
        let back = DeviceProfile::from_json(&json).unwrap();
        assert_eq!(back.model, profile.model);
        assert_eq!(back.features, profile.features);
        assert_eq!(back.status_codes, profile.status_codes);
        assert_eq!(back.timing, profile.timing);
    }
}
