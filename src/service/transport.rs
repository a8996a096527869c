//! Transport boundary between the filter chains and the collector.

use std::io::Write;
use std::sync::{Mutex, PoisonError};

use tracing::warn;

use crate::domain::{Report, SendOutcome};

/// Sends a filtered report somewhere and reports how it went.
pub trait Transport: Send + Sync {
    fn send(&self, report: &Report) -> SendOutcome;
}

/// Writes each report as one JSON line.
pub struct JsonLinesTransport<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesTransport<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_line(&self, report: &Report) -> Result<(), String> {
        let line = serde_json::to_string(report).map_err(|e| e.to_string())?;
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{}", line).map_err(|e| e.to_string())?;
        writer.flush().map_err(|e| e.to_string())
    }
}

impl<W: Write + Send> Transport for JsonLinesTransport<W> {
    fn send(&self, report: &Report) -> SendOutcome {
        match self.write_line(report) {
            Ok(()) => SendOutcome::Delivered { status: None },
            Err(reason) => {
                warn!("Failed to write report: {}", reason);
                SendOutcome::Failed {
                    status: None,
                    reason,
                }
            }
        }
    }
}
