//! crashgate: before-send filter pipeline for crash reports
//!
//! Reads JSON-lines error reports from stdin, runs each through the
//! configured filter chains and writes the surviving reports to stdout.

mod cli;

use std::io;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use crashgate::config::ConfigService;
use crashgate::domain::logger;
use crashgate::service::{JsonLinesTransport, ReportService};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = ConfigService::load(cli.config.as_deref())?;

    // Initialize logging if debug mode
    if cli.debug || config.debug {
        logger::init(&config)?;
    }

    match cli.command {
        Commands::Run => {
            let transport = Arc::new(JsonLinesTransport::new(io::stdout()));
            let service = ReportService::new(&config, transport)?;
            let summary = service.run(io::stdin().lock())?;
            if !cli.quiet {
                eprintln!(
                    "received {}, delivered {}, failed {}, cancelled {}, malformed {}",
                    summary.received,
                    summary.delivered,
                    summary.failed,
                    summary.cancelled,
                    summary.malformed
                );
            }
        }
        Commands::Init { path } => {
            let config_path = if let Some(p) = path {
                ConfigService::generate_at(&p)?;
                p
            } else {
                ConfigService::generate_default()?;
                ConfigService::default_path()
            };
            if !cli.quiet {
                eprintln!("Configuration file created at: {}", config_path.display());
            }
        }
        Commands::Check => {
            // Validated on load; build the chains to show them
            let transport = Arc::new(JsonLinesTransport::new(io::sink()));
            let service = ReportService::new(&config, transport)?;
            if !cli.quiet {
                let factory = service.factory();
                eprintln!("Configuration is valid.");
                eprintln!(
                    "before-send: {}",
                    factory.before_send_chain().filter_names().join(" -> ")
                );
                eprintln!(
                    "after-send: {}",
                    factory.after_send_chain().observer_names().join(", ")
                );
            }
        }
        Commands::Version => {
            println!("crashgate {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
