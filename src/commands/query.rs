//! Read-only command handlers.

use super::CommandResult;
use razer_laptop::{DeviceSession, Feature, Probe, Reading};
use razer_transport::discovery;

/// List attached Razer interfaces
pub fn enumerate() -> CommandResult {
    let devices = discovery::enumerate()?;
    if devices.is_empty() {
        println!("No Razer devices found");
        return Ok(());
    }
    for device in devices {
        println!(
            "{:04x}:{:04x}  {}  {}",
            device.vendor_id,
            device.product_id,
            device.product.as_deref().unwrap_or("-"),
            device.path
        );
    }
    Ok(())
}

/// Show identity, active profile and current EC state
pub async fn info(session: &DeviceSession) -> CommandResult {
    let identity = session.identify();
    let profile = session.profile();

    println!("Device:  {}", profile.model);
    println!(
        "USB:     {:04x}:{:04x} at {}",
        identity.vendor_id, identity.product_id, identity.path
    );
    if let Some(product) = &identity.product {
        println!("Product: {product}");
    }
    println!("Profile: {}", profile.to_json()?);

    // One probe per supported feature; a refused probe is reported inline
    // rather than aborting the rest of the readout
    let probes: &[(Feature, &str, Probe)] = &[
        (Feature::Perf, "Performance", Probe::PerfMode),
        (Feature::Perf, "CPU boost", Probe::CpuBoost),
        (Feature::Perf, "GPU boost", Probe::GpuBoost),
        (Feature::LidLogo, "Lid logo", Probe::Logo),
        (Feature::KbdBacklight, "Keyboard backlight", Probe::KbdBrightness),
        (Feature::LightsAlwaysOn, "Lights always on", Probe::LightsAlwaysOn),
        (Feature::BatteryCare, "Battery care", Probe::BatteryCare),
    ];

    for (feature, label, probe) in probes {
        if !profile.supports(*feature) {
            continue;
        }
        match session.read(*probe).await {
            Ok(reading) => {
                println!("{label:<20} {reading}");
                // Manual fan regulation implies a meaningful rpm readout
                if let Reading::Perf {
                    fan: razer_laptop::FanMode::Manual,
                    ..
                } = reading
                {
                    for zone in razer_laptop::FanZone::ALL {
                        match session.read(Probe::FanRpm(zone)).await {
                            Ok(rpm) => println!("{:<20} {rpm}", format!("Fan zone {}", zone as u8)),
                            Err(e) => println!("{:<20} {e}", format!("Fan zone {}", zone as u8)),
                        }
                    }
                }
            }
            Err(e) => println!("{label:<20} {e}"),
        }
    }

    Ok(())
}
