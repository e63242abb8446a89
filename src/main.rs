// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! trendmind - trending AI models from the terminal
//!
//! Entry point for the trendmind CLI application.

use clap::Parser;

use trendmind::cli::{Cli, Commands};
use trendmind::config::Settings;
use trendmind::error::Result;

#[path = "main/cli_commands.rs"]
mod cli_commands;

use cli_commands::{
    run_compare, run_favorites_command, run_list, run_serve, run_settings_command, run_show,
    run_search,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());

    // `-v` shows tier fallbacks and cache hits, `-vv` everything.
    // `RUST_LOG` still applies on top.
    let directive = match cli.verbose {
        0 => None,
        1 => Some("trendmind=debug"),
        _ => Some("trendmind=trace"),
    };
    if let Some(directive) = directive {
        if let Ok(parsed) = directive.parse() {
            env_filter = env_filter.add_directive(parsed);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // Load settings
    let settings_path = cli.config.clone().unwrap_or_else(Settings::default_path);
    let mut settings = Settings::load_from(&settings_path)?;
    settings.apply_env_overrides();
    settings.validate()?;

    // Dispatch to appropriate command
    let format = cli.format;
    match cli.command {
        Commands::List(args) => run_list(args, &settings, &format).await?,
        Commands::Show(args) => run_show(args, &settings, &format).await?,
        Commands::Search(args) => run_search(args, &settings, &format).await?,
        Commands::Compare(args) => run_compare(args, &settings, &format).await?,
        Commands::Favorites(args) => run_favorites_command(args, &settings, &format).await?,
        Commands::Serve(args) => run_serve(args, &settings).await?,
        Commands::Settings(args) => run_settings_command(args, &settings, &settings_path)?,
    }

    Ok(())
}
