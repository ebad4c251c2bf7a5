//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the registry
//! anonymizer using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Registry Anonymizer - pseudonymizes personal identifiers in BRRA filings
#[derive(Parser, Debug)]
#[command(name = "registry-anonymizer")]
#[command(version, about, long_about = None)]
#[command(author = "Registry Open Data Contributors")]
pub struct Cli {
    /// Path to configuration file (defaults apply when it does not exist)
    #[arg(short, long, default_value = "anonymizer.toml", env = "ANONYMIZER_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ANONYMIZER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize a partitioned corpus into a mirrored target tree
    Anonymize(commands::anonymize::AnonymizeArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show the salt table location and size
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
