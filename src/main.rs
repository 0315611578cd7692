// src/main.rs

use anyhow::Result;
use clap::Parser;
use setup_oob::{Settings, DEFAULT_CONFIG_PATH};
use std::path::Path;
use tracing::debug;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (path, explicit) = match &cli.global.config {
        Some(path) => (path.as_path(), true),
        None => (Path::new(DEFAULT_CONFIG_PATH), false),
    };
    let loaded = Settings::read(path, explicit)?;
    let found = loaded.is_some();
    let settings = loaded.unwrap_or_default().merge(cli.global.overrides());

    // RUST_LOG wins over the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(settings.log_level())),
        )
        .init();

    if found {
        debug!("Loaded settings from {}", path.display());
    } else {
        debug!("No settings file at {}", path.display());
    }

    match cli.command {
        Commands::Check => {
            if !commands::cmd_check(&settings)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Apply { dry_run } => commands::cmd_apply(&settings, dry_run),
        Commands::Plan => commands::cmd_plan(&settings),
        Commands::License { mac } => commands::cmd_license(&settings, &mac),
    }
}
