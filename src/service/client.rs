//! Client that pushes one report through the chains and the transport.

use std::sync::Arc;

use tracing::debug;

use super::Transport;
use crate::domain::{AfterSendChain, BeforeSendChain, Report, RequestDetails, SendStatus};

/// Report sender produced by [`super::ClientFactory`].
///
/// Clients are cheap; the chains and the transport are shared with the factory.
pub struct Client {
    pub(super) before: Arc<BeforeSendChain>,
    pub(super) after: Arc<AfterSendChain>,
    pub(super) transport: Arc<dyn Transport>,
    pub(super) version: Option<String>,
    pub(super) request: Option<RequestDetails>,
}

impl Client {
    /// Filter, send and observe one report.
    ///
    /// Reports without a version or request inherit the client's.
    pub fn send(&self, mut report: Report) -> SendStatus {
        if report.version.is_none() {
            report.version.clone_from(&self.version);
        }
        if report.request.is_none() {
            report.request.clone_from(&self.request);
        }

        let Some(report) = self.before.run(report) else {
            return SendStatus::Cancelled;
        };

        let outcome = self.transport.send(&report);
        debug!("Transport outcome for {}: {:?}", report.error.kind, outcome);

        let faults = self.after.run(&report, &outcome);
        if faults > 0 {
            debug!("{} after-send observer(s) faulted", faults);
        }

        SendStatus::Attempted(outcome)
    }

    pub fn request(&self) -> Option<&RequestDetails> {
        self.request.as_ref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}
