use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stt_cli::commands::{days, fin, on, overtime, resume, status};
use stt_cli::{Cli, Commands, Config};
use stt_core::SystemClock;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Some(Commands::On { comment }) => {
            on::run(&mut out, &config.item_log(), comment, &SystemClock)?;
        }
        Some(Commands::Fin { when }) => {
            fin::run(&mut out, &config.item_log(), when, &SystemClock)?;
        }
        Some(Commands::Resume) => {
            resume::run(&mut out, &config.item_log(), &SystemClock)?;
        }
        Some(Commands::Status) => {
            status::run(&mut out, &config.item_log(), &SystemClock)?;
        }
        Some(Commands::Days { since }) => {
            days::run(&mut out, &config.item_log(), *since)?;
        }
        Some(Commands::Overtime { since, json }) => {
            overtime::run(&mut out, &config, *since, *json, &SystemClock)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
