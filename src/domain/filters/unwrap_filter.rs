//! Wrapped error unwrapping filter.

use tracing::debug;

use super::{BeforeSend, KindMatcher};
use crate::domain::Report;

/// Promotes the inner error to top level while the outer error is a known wrapper.
///
/// Wrappers such as `InvocationTargetException` or `ServletException` carry no
/// useful information of their own; grouping works better on the cause.
pub struct StripWrappedErrorFilter {
    wrappers: Vec<KindMatcher>,
}

impl StripWrappedErrorFilter {
    pub fn new(wrappers: Vec<KindMatcher>) -> Self {
        Self { wrappers }
    }

    fn is_wrapper(&self, kind: &str) -> bool {
        self.wrappers.iter().any(|m| m.matches(kind))
    }
}

impl BeforeSend for StripWrappedErrorFilter {
    fn name(&self) -> &str {
        "strip-wrapped-error"
    }

    fn on_before_send(&self, mut report: Report) -> Option<Report> {
        // Each step drops one link of a finite chain, so this terminates.
        while report.error.has_inner_error() && self.is_wrapper(&report.error.kind) {
            let outer = report.error.kind.clone();
            if let Some(inner) = report.error.take_inner() {
                debug!("Unwrapped {} to {}", outer, inner.kind);
                report.error = inner;
            }
        }

        Some(report)
    }
}
