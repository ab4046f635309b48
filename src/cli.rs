// CLI definitions using clap

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "razerctl")]
#[command(author, version, about = "Razer laptop EC control (fans, performance, lighting)")]
#[command(propagate_version = true)]
pub struct Cli {
    /// USB product id of the device to address (hex like 0x029f or decimal).
    /// Defaults to the first Razer device found.
    #[arg(short = 'p', long, global = true, value_parser = parse_u16)]
    pub pid: Option<u16>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List attached Razer HID interfaces
    #[command(visible_alias = "list")]
    Enumerate,

    /// Show device identity, profile and current EC state
    #[command(visible_alias = "i")]
    Info,

    /// Set the performance mode (balanced, silent, custom)
    Perf {
        /// Performance mode
        mode: String,
    },

    /// Fan control
    Fan {
        #[command(subcommand)]
        command: FanCommands,
    },

    /// CPU/GPU boost levels (switches to the custom profile)
    Boost {
        #[command(subcommand)]
        command: BoostCommands,
    },

    /// Lid-logo lighting (off, static, breathing)
    Logo {
        /// Lighting mode
        mode: String,
    },

    /// Keyboard backlight brightness
    #[command(visible_alias = "kbd")]
    Brightness {
        /// Absolute level
        #[arg(value_parser = clap::value_parser!(u8))]
        level: u8,
    },

    /// Keep chassis lights on while the lid is closed
    LightsAlwaysOn {
        /// on or off
        state: String,
    },

    /// Battery charge limiter
    BatteryCare {
        /// on or off
        state: String,
    },

    /// Send a raw command [WARNING: use at your own risk]
    Cmd {
        /// Command selector as a 16-bit hex word, e.g. 0x0d82
        #[arg(value_parser = parse_u16)]
        command: u16,
        /// Argument bytes, e.g. 0 1 0 0 (hex accepted with 0x prefix)
        #[arg(value_parser = parse_u8)]
        args: Vec<u8>,
    },
}

#[derive(Subcommand)]
pub enum FanCommands {
    /// Hand fan regulation back to the firmware
    Auto,
    /// Fix both fan zones to a target speed
    Rpm {
        /// Fan speed in rpm
        #[arg(value_parser = clap::value_parser!(u16).range(2000..=5000))]
        rpm: u16,
    },
    /// Max-fan-speed override (switches to the custom profile)
    Max {
        /// on or off
        state: String,
    },
}

#[derive(Subcommand)]
pub enum BoostCommands {
    /// CPU boost (low, medium, high, boost, overclock)
    Cpu {
        /// Boost level
        level: String,
    },
    /// GPU boost (low, medium, high)
    Gpu {
        /// Boost level
        level: String,
    },
}

/// Parse a decimal or 0x-prefixed hex u16
pub fn parse_u16(s: &str) -> Result<u16, String> {
    parse_radix(s).map_err(|_| format!("invalid number: \"{s}\""))
}

/// Parse a decimal or 0x-prefixed hex u8
pub fn parse_u8(s: &str) -> Result<u8, String> {
    let value = parse_radix(s).map_err(|_| format!("invalid number: \"{s}\""))?;
    u8::try_from(value).map_err(|_| format!("\"{s}\" does not fit in a byte"))
}

fn parse_radix(s: &str) -> Result<u16, std::num::ParseIntError> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_parse_in_both_radixes() {
        assert_eq!(parse_u16("0x029f").unwrap(), 0x029f);
        assert_eq!(parse_u16("671").unwrap(), 671);
        assert_eq!(parse_u8("0xd0").unwrap(), 0xd0);
        assert!(parse_u8("0x1d0").is_err());
        assert!(parse_u16("fan").is_err());
    }
}
