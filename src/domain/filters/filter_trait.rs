//! Filter trait definitions.

use crate::domain::{FilterError, Report, SendOutcome};

/// Trait for before-send filters.
pub trait BeforeSend: Send + Sync {
    /// Short name used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Return the (possibly modified) report to continue, or `None` to cancel the send.
    fn on_before_send(&self, report: Report) -> Option<Report>;
}

/// Trait for after-send observers.
pub trait AfterSend: Send + Sync {
    /// Short name used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Observe a report after a transport attempt.
    fn on_after_send(&self, report: &Report, outcome: &SendOutcome) -> Result<(), FilterError>;
}
