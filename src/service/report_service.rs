//! Report processing service.

use std::io::BufRead;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, error, info};

use super::{ClientFactory, Transport};
use crate::config::Config;
use crate::domain::{Report, SendOutcome, SendStatus};

/// Counters for one processing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub received: usize,
    pub delivered: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub malformed: usize,
}

/// Service that feeds JSON-lines reports through a client factory.
pub struct ReportService {
    factory: ClientFactory,
}

impl ReportService {
    /// Create a new ReportService from configuration.
    pub fn new(config: &Config, transport: Arc<dyn Transport>) -> Result<Self> {
        let factory = ClientFactory::from_config(config, transport)
            .context("Failed to build filter chains")?;
        Ok(Self { factory })
    }

    pub fn factory(&self) -> &ClientFactory {
        &self.factory
    }

    /// Process every line of `input` as one report.
    ///
    /// Blank lines are skipped and malformed lines, invalid UTF-8 included,
    /// are counted. A report that needs request context it does not carry
    /// aborts the run.
    pub fn run<R: BufRead>(&self, input: R) -> Result<Summary> {
        let mut summary = Summary::default();

        // Raw bytes, so one bad line cannot end the run
        for (index, line) in input.split(b'\n').enumerate() {
            let line = line.context("Failed to read input")?;
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            summary.received += 1;

            let report: Report = match serde_json::from_slice(&line) {
                Ok(report) => report,
                Err(e) => {
                    error!("Skipping malformed report on line {}: {}", index + 1, e);
                    summary.malformed += 1;
                    continue;
                }
            };

            match self.process(report)? {
                SendStatus::Cancelled => summary.cancelled += 1,
                SendStatus::Attempted(SendOutcome::Delivered { .. }) => summary.delivered += 1,
                SendStatus::Attempted(SendOutcome::Failed { .. }) => summary.failed += 1,
            }
        }

        info!("Processed reports: {:?}", summary);
        Ok(summary)
    }

    /// Send one report through a client bound to its request, if any.
    pub fn process(&self, report: Report) -> Result<SendStatus> {
        debug!("Processing report: kind={}", report.error.kind);

        let client = match &report.request {
            Some(request) => self.factory.new_client_for(request.clone()),
            None => self.factory.new_client()?,
        };

        Ok(client.send(report))
    }
}
