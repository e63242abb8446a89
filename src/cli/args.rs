// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI argument definitions using Clap
//!
//! Defines all command-line arguments and subcommands for trendmind.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// trendmind - trending AI models from the terminal
#[derive(Parser, Debug)]
#[command(name = "trendmind")]
#[command(version, about = "Browse trending AI models from the terminal")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List trending models
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show a single model
    Show(ShowArgs),

    /// Search models by name or description
    Search(SearchArgs),

    /// Compare models side by side
    Compare(CompareArgs),

    /// Manage favorite models
    #[command(alias = "fav")]
    Favorites(FavoritesArgs),

    /// Run the catalog backend server
    Serve(ServeArgs),

    /// Manage configuration
    #[command(alias = "config")]
    Settings(SettingsArgs),
}

/// Arguments for the list subcommand
#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Maximum number of models
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Sort order (trending, downloads, likes, modified)
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Only models carrying this tag
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Bypass the cache
    #[arg(short, long)]
    pub refresh: bool,
}

/// Arguments for the show subcommand
#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Model id (e.g. "microsoft/phi-2")
    pub id: String,

    /// Bypass the cache
    #[arg(short, long)]
    pub refresh: bool,
}

/// Arguments for the search subcommand
#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Search text
    pub query: String,

    /// Maximum number of results
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the compare subcommand
#[derive(clap::Args, Debug)]
pub struct CompareArgs {
    /// Model ids to compare
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<String>,
}

/// Arguments for the favorites subcommand
#[derive(clap::Args, Debug)]
pub struct FavoritesArgs {
    /// User whose favorites to manage
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: FavoritesCommands,
}

/// Favorites subcommands
#[derive(Subcommand, Debug)]
pub enum FavoritesCommands {
    /// List favorite models
    List,

    /// Add a favorite
    Add {
        /// Model id
        id: String,
    },

    /// Remove a favorite
    #[command(alias = "rm")]
    Remove {
        /// Model id
        id: String,
    },
}

/// Arguments for the serve subcommand
#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the settings subcommand
#[derive(clap::Args, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommands,
}

/// Settings subcommands
#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show current configuration
    Show,

    /// Print the settings file path
    Path,

    /// Reset to defaults
    Reset,
}

/// Output format options
#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Text,

    /// JSON output
    Json,
}
