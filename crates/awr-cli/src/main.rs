use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use awr_cli::commands::{categories, report};
use awr_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so the report on stdout stays clean
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut stdout = io::stdout().lock();

    match &cli.command {
        Some(Commands::Categories { json }) => {
            // Rule table is built in; no config needed
            categories::run(&mut stdout, *json)?;
        }
        Some(Commands::Report { json }) => {
            let config = load_config(&cli)?;
            report::run(&mut stdout, &config, *json)?;
        }
        None => {
            let config = load_config(&cli)?;
            report::run(&mut stdout, &config, false)?;
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config> {
    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}
