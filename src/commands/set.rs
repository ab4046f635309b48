//! State-changing command handlers.
//!
//! Each handler parses its string arguments, builds one `Action` and hands
//! it to the session. No recovery logic lives here: a terminal error (with
//! its partial-application count) propagates straight to the exit code.

use anyhow::anyhow;
use razer_laptop::{
    Action, CpuBoost, DeviceSession, FanSetting, GpuBoost, LogoMode, PerfMode, Toggle,
};
use razer_transport::Command;

use super::CommandResult;

async fn apply(session: &DeviceSession, action: Action) -> CommandResult {
    session.apply(action).await?;
    println!("Applied: {action}");
    Ok(())
}

pub async fn perf(session: &DeviceSession, mode: &str) -> CommandResult {
    let mode: PerfMode = mode.parse().map_err(|e: String| anyhow!(e))?;
    apply(session, Action::Perf(mode)).await
}

pub async fn fan_auto(session: &DeviceSession) -> CommandResult {
    apply(session, Action::Fan(FanSetting::Auto)).await
}

pub async fn fan_rpm(session: &DeviceSession, rpm: u16) -> CommandResult {
    apply(session, Action::Fan(FanSetting::Manual { rpm })).await
}

pub async fn fan_max(session: &DeviceSession, state: &str) -> CommandResult {
    let state: Toggle = state.parse().map_err(|e: String| anyhow!(e))?;
    apply(session, Action::MaxFanSpeed(state)).await
}

pub async fn boost_cpu(session: &DeviceSession, level: &str) -> CommandResult {
    let level: CpuBoost = level.parse().map_err(|e: String| anyhow!(e))?;
    apply(session, Action::CpuBoost(level)).await
}

pub async fn boost_gpu(session: &DeviceSession, level: &str) -> CommandResult {
    let level: GpuBoost = level.parse().map_err(|e: String| anyhow!(e))?;
    apply(session, Action::GpuBoost(level)).await
}

pub async fn logo(session: &DeviceSession, mode: &str) -> CommandResult {
    let mode: LogoMode = mode.parse().map_err(|e: String| anyhow!(e))?;
    apply(session, Action::Logo(mode)).await
}

pub async fn brightness(session: &DeviceSession, level: u8) -> CommandResult {
    apply(session, Action::KbdBrightness(level)).await
}

pub async fn lights_always_on(session: &DeviceSession, state: &str) -> CommandResult {
    let state: Toggle = state.parse().map_err(|e: String| anyhow!(e))?;
    apply(session, Action::LightsAlwaysOn(state)).await
}

pub async fn battery_care(session: &DeviceSession, state: &str) -> CommandResult {
    let state: Toggle = state.parse().map_err(|e: String| anyhow!(e))?;
    apply(session, Action::BatteryCare(state)).await
}

/// Raw escape hatch: class/id from a 16-bit word, args verbatim
pub async fn raw(session: &DeviceSession, command: u16, args: &[u8]) -> CommandResult {
    let command = Command::new((command >> 8) as u8, (command & 0xff) as u8, args);
    println!(
        "Request  {:02x}{:02x} {:02X?}",
        command.class, command.id, command.args
    );
    let response = session.raw(command).await?;
    println!(
        "Response status 0x{:02X} args {:02X?}",
        response.status, response.args
    );
    Ok(())
}
