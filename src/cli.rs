//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Before-send filter pipeline for crash reports
#[derive(Parser)]
#[command(
    name = "crashgate",
    version,
    about = "Before-send filter pipeline for crash reports",
    long_about = "Runs JSON-lines error reports through the configured before-send filters \
                  (unwrapping, exclusion, redaction, duplicate suppression) and writes the \
                  reports that survive to stdout."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Filter JSON-lines reports from stdin (alias: filter)
    #[command(alias = "filter")]
    Run,
    /// Generate default configuration file
    Init {
        /// Path where to create the configuration file
        #[arg(long, short = 'p')]
        path: Option<PathBuf>,
    },
    /// Validate configuration file and show the filter chains
    Check,
    /// Display version information
    Version,
}
