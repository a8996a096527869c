//! Filters that drop whole reports by error kind or request origin.

use super::{BeforeSend, KindMatcher};
use crate::domain::Report;

/// Hosts treated as local by [`ExcludeLocalRequestFilter`].
const LOCAL_HOSTS: &[&str] = &["localhost", "127.0.0.1", "::1", "[::1]"];

/// Cancels reports whose top-level error kind matches any matcher.
pub struct ExcludeErrorKindFilter {
    matchers: Vec<KindMatcher>,
}

impl ExcludeErrorKindFilter {
    pub fn new(matchers: Vec<KindMatcher>) -> Self {
        Self { matchers }
    }
}

impl BeforeSend for ExcludeErrorKindFilter {
    fn name(&self) -> &str {
        "exclude-error-kind"
    }

    fn on_before_send(&self, report: Report) -> Option<Report> {
        if self.matchers.iter().any(|m| m.matches(&report.error.kind)) {
            return None;
        }
        Some(report)
    }
}

/// Cancels reports raised while serving a request to a loopback host.
pub struct ExcludeLocalRequestFilter;

impl ExcludeLocalRequestFilter {
    fn is_local(host: &str) -> bool {
        // Strip a trailing ":port", leaving bracketed IPv6 intact.
        let host = match host.rsplit_once(':') {
            Some((name, port))
                if !port.is_empty()
                    && port.chars().all(|c| c.is_ascii_digit())
                    && (!name.contains(':') || name.ends_with(']')) =>
            {
                name
            }
            _ => host,
        };
        LOCAL_HOSTS.iter().any(|h| h.eq_ignore_ascii_case(host))
    }
}

impl BeforeSend for ExcludeLocalRequestFilter {
    fn name(&self) -> &str {
        "exclude-local-request"
    }

    fn on_before_send(&self, report: Report) -> Option<Report> {
        match &report.request {
            Some(request) if Self::is_local(&request.host_name) => None,
            _ => Some(report),
        }
    }
}
