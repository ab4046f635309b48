//! Razer laptop EC control CLI
//!
//! Thin shell around `razer-laptop`: parses arguments, opens one device
//! session, renders results. All protocol and recovery logic lives in the
//! library crates.

use clap::Parser;

mod cli;
use cli::{BoostCommands, Cli, Commands, FanCommands};

mod commands;
use commands::open_session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Enumerate => commands::query::enumerate(),

        Commands::Info => {
            let session = open_session(cli.pid)?;
            commands::query::info(&session).await
        }

        Commands::Perf { mode } => {
            let session = open_session(cli.pid)?;
            commands::set::perf(&session, &mode).await
        }

        Commands::Fan { command } => {
            let session = open_session(cli.pid)?;
            match command {
                FanCommands::Auto => commands::set::fan_auto(&session).await,
                FanCommands::Rpm { rpm } => commands::set::fan_rpm(&session, rpm).await,
                FanCommands::Max { state } => commands::set::fan_max(&session, &state).await,
            }
        }

        Commands::Boost { command } => {
            let session = open_session(cli.pid)?;
            match command {
                BoostCommands::Cpu { level } => commands::set::boost_cpu(&session, &level).await,
                BoostCommands::Gpu { level } => commands::set::boost_gpu(&session, &level).await,
            }
        }

        Commands::Logo { mode } => {
            let session = open_session(cli.pid)?;
            commands::set::logo(&session, &mode).await
        }

        Commands::Brightness { level } => {
            let session = open_session(cli.pid)?;
            commands::set::brightness(&session, level).await
        }

        Commands::LightsAlwaysOn { state } => {
            let session = open_session(cli.pid)?;
            commands::set::lights_always_on(&session, &state).await
        }

        Commands::BatteryCare { state } => {
            let session = open_session(cli.pid)?;
            commands::set::battery_care(&session, &state).await
        }

        Commands::Cmd { command, args } => {
            let session = open_session(cli.pid)?;
            commands::set::raw(&session, command, &args).await
        }
    }
}
