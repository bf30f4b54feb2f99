use std::io::stdout;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use punch_cli::commands::{status, track, util};
use punch_cli::{Cli, Commands, Config};
use punch_core::Command;
use punch_store::JsonStore;

/// Load config and build the store for the configured data file.
fn open_store(config_path: Option<&Path>) -> Result<JsonStore> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(JsonStore::new(config.data_file))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Status output owns stdout, so logs go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let now = Utc::now();
    let mut out = stdout().lock();

    let command = match &cli.command {
        Some(Commands::CheckIn { args }) => util::check_in_command(args),
        Some(Commands::CheckOut { args }) => util::check_out_command(args),
        Some(Commands::Edit { args }) => util::edit_command(args),
        Some(Commands::Delete { index }) => Command::Delete {
            index: index.clone(),
        },
        Some(Commands::Status) => {
            let store = open_store(cli.config.as_deref())?;
            return status::run(&mut out, &store, now);
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
            return Ok(());
        }
    };

    let store = open_store(cli.config.as_deref())?;
    tracing::debug!(?command, path = %store.path().display(), "running command");
    track::run(&mut out, store, command, now)?;

    Ok(())
}
