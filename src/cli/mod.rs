//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for MDB using clap.

pub mod commands;

use crate::config::{load_config, load_config_or_default, MdbConfig};
use crate::domain::Result;
use clap::{Parser, Subcommand};
use std::path::Path;

/// Configuration file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "mdb.toml";

/// MDB - Multi-Database Postal Code API
#[derive(Parser, Debug)]
#[command(name = "mdb")]
#[command(version, about, long_about = None)]
#[command(author = "MDB Contributors")]
pub struct Cli {
    /// Path to configuration file (defaults to ./mdb.toml when present)
    #[arg(short, long, env = "MDB_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show connectivity and row counts for every backend
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Load configuration for a command
///
/// An explicit path must exist. Without one, `./mdb.toml` is used when present and
/// defaults plus environment otherwise.
///
/// # Errors
///
/// Returns a configuration error if the file cannot be read, parsed or validated.
pub fn resolve_config(config_path: Option<&str>) -> Result<MdbConfig> {
    match config_path {
        Some(path) => load_config(path),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            load_config_or_default(default.exists().then_some(default))
        }
    }
}
