//! Static command catalog
//!
//! The single place that knows which `(class, id)` selector drives which EC
//! subsystem, how many argument bytes each command takes and what each
//! position means. Pure data: nothing here touches a transport. Porting to
//! another model starts (and usually ends) in this table.

use razer_transport::Command;

/// Command classes observed on the EC
pub mod class {
    /// System switches (lights-always-on)
    pub const SYSTEM: u8 = 0x00;
    /// Chassis lighting (lid logo, keyboard backlight)
    pub const LIGHTING: u8 = 0x03;
    /// Power management (max fan override, battery care)
    pub const POWER: u8 = 0x07;
    /// Performance and fan control
    pub const PERF: u8 = 0x0d;
}

/// Semantic command family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    SetPerfMode,
    GetPerfMode,
    SetFanRpm,
    GetFanRpm,
    SetBoost,
    GetBoost,
    SetLogoPower,
    GetLogoPower,
    SetLogoMode,
    GetLogoMode,
    SetKbdBrightness,
    GetKbdBrightness,
    SetLightsAlwaysOn,
    GetLightsAlwaysOn,
    SetMaxFanSpeed,
    SetBatteryCare,
    GetBatteryCare,
}

/// Meaning of one argument position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgRole {
    /// Fixed byte required by the firmware at this position
    Literal(u8),
    /// Fan channel selector (1 or 2)
    Zone,
    /// CPU/GPU cluster selector
    Cluster,
    /// Performance-profile selector
    PerfMode,
    /// Auto/manual fan selector
    FanMode,
    /// Intensity or mode value (brightness level, effect, on/off, toggle)
    Level,
    /// Target rpm divided by 100
    RpmCentis,
    /// Zero in requests; carries the answer in responses
    Answer,
}

/// One catalog entry
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub family: Family,
    pub class: u8,
    pub id: u8,
    pub args: &'static [ArgRole],
}

impl CommandSpec {
    pub const fn arity(&self) -> usize {
        self.args.len()
    }

    /// Build a concrete command. The argument count is fixed by the catalog;
    /// a mismatch is a programming error in the resolver.
    pub fn command(&self, args: &[u8]) -> Command {
        debug_assert_eq!(
            args.len(),
            self.arity(),
            "argument count for {:?}",
            self.family
        );
        Command::new(self.class, self.id, args)
    }
}

use ArgRole::{Answer, Cluster, FanMode, Level, Literal, PerfMode, RpmCentis, Zone};

pub const CATALOG: &[CommandSpec] = &[
    CommandSpec {
        family: Family::SetPerfMode,
        class: class::PERF,
        id: 0x02,
        args: &[Literal(0x01), Zone, PerfMode, FanMode],
    },
    CommandSpec {
        family: Family::GetPerfMode,
        class: class::PERF,
        id: 0x82,
        args: &[Literal(0x00), Zone, Answer, Answer],
    },
    CommandSpec {
        family: Family::SetFanRpm,
        class: class::PERF,
        id: 0x01,
        args: &[Literal(0x00), Zone, RpmCentis],
    },
    CommandSpec {
        family: Family::GetFanRpm,
        class: class::PERF,
        id: 0x81,
        args: &[Literal(0x00), Zone, Answer],
    },
    CommandSpec {
        family: Family::SetBoost,
        class: class::PERF,
        id: 0x07,
        args: &[Literal(0x00), Cluster, Level],
    },
    CommandSpec {
        family: Family::GetBoost,
        class: class::PERF,
        id: 0x87,
        args: &[Literal(0x00), Cluster, Answer],
    },
    CommandSpec {
        family: Family::SetLogoPower,
        class: class::LIGHTING,
        id: 0x00,
        args: &[Literal(0x01), Literal(0x04), Level],
    },
    CommandSpec {
        family: Family::GetLogoPower,
        class: class::LIGHTING,
        id: 0x80,
        args: &[Literal(0x01), Literal(0x04), Answer],
    },
    CommandSpec {
        family: Family::SetLogoMode,
        class: class::LIGHTING,
        id: 0x02,
        args: &[Literal(0x01), Literal(0x04), Level],
    },
    CommandSpec {
        family: Family::GetLogoMode,
        class: class::LIGHTING,
        id: 0x82,
        args: &[Literal(0x01), Literal(0x04), Answer],
    },
    CommandSpec {
        family: Family::SetKbdBrightness,
        class: class::LIGHTING,
        id: 0x03,
        args: &[Literal(0x01), Literal(0x05), Level],
    },
    CommandSpec {
        family: Family::GetKbdBrightness,
        class: class::LIGHTING,
        id: 0x83,
        args: &[Literal(0x01), Literal(0x05), Answer],
    },
    CommandSpec {
        family: Family::SetLightsAlwaysOn,
        class: class::SYSTEM,
        id: 0x04,
        args: &[Level, Literal(0x00)],
    },
    CommandSpec {
        family: Family::GetLightsAlwaysOn,
        class: class::SYSTEM,
        id: 0x84,
        args: &[Answer, Literal(0x00)],
    },
    CommandSpec {
        family: Family::SetMaxFanSpeed,
        class: class::POWER,
        id: 0x0f,
        args: &[Level],
    },
    CommandSpec {
        family: Family::SetBatteryCare,
        class: class::POWER,
        id: 0x12,
        args: &[Level],
    },
    CommandSpec {
        family: Family::GetBatteryCare,
        class: class::POWER,
        id: 0x92,
        args: &[Answer],
    },
];

/// Look up a family's entry. The catalog is total over `Family`.
pub fn spec(family: Family) -> &'static CommandSpec {
    CATALOG
        .iter()
        .find(|s| s.family == family)
        .expect("catalog covers every command family")
}

/// Human-readable name for a selector, for logs and the raw CLI path
pub fn name(class: u8, id: u8) -> &'static str {
    match CATALOG.iter().find(|s| (s.class, s.id) == (class, id)) {
        Some(spec) => match spec.family {
            Family::SetPerfMode => "SET_PERF_MODE",
            Family::GetPerfMode => "GET_PERF_MODE",
            Family::SetFanRpm => "SET_FAN_RPM",
            Family::GetFanRpm => "GET_FAN_RPM",
            Family::SetBoost => "SET_BOOST",
            Family::GetBoost => "GET_BOOST",
            Family::SetLogoPower => "SET_LOGO_POWER",
            Family::GetLogoPower => "GET_LOGO_POWER",
            Family::SetLogoMode => "SET_LOGO_MODE",
            Family::GetLogoMode => "GET_LOGO_MODE",
            Family::SetKbdBrightness => "SET_KBD_BRIGHTNESS",
            Family::GetKbdBrightness => "GET_KBD_BRIGHTNESS",
            Family::SetLightsAlwaysOn => "SET_LIGHTS_ALWAYS_ON",
            Family::GetLightsAlwaysOn => "GET_LIGHTS_ALWAYS_ON",
            Family::SetMaxFanSpeed => "SET_MAX_FAN_SPEED",
            Family::SetBatteryCare => "SET_BATTERY_CARE",
            Family::GetBatteryCare => "GET_BATTERY_CARE",
        },
        None => "UNKNOWN",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_total_and_unambiguous() {
        for entry in CATALOG {
            // spec() finds exactly this entry for its family
            assert_eq!(spec(entry.family).id, entry.id);
        }
        // no duplicate selectors
        for (i, a) in CATALOG.iter().enumerate() {
            for b in &CATALOG[i + 1..] {
                assert!(
                    (a.class, a.id) != (b.class, b.id),
                    "duplicate selector {:02x}{:02x}",
                    a.class,
                    a.id
                );
            }
        }
    }

    #[test]
    fn builder_emits_declared_selector() {
        let command = spec(Family::SetFanRpm).command(&[0, 1, 35]);
        assert_eq!((command.class, command.id), (0x0d, 0x01));
        assert_eq!(command.args, vec![0, 1, 35]);
    }

    #[test]
    fn name_resolves_known_selectors() {
        assert_eq!(name(0x0d, 0x02), "SET_PERF_MODE");
        assert_eq!(name(0x42, 0x42), "UNKNOWN");
    }
}
