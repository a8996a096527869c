//! HTTP status code filter implementation.

use std::collections::BTreeSet;

use super::BeforeSend;
use crate::domain::Report;

/// Cancels reports whose captured response has one of the configured status codes.
pub struct HttpStatusFilter {
    codes: BTreeSet<u16>,
}

impl HttpStatusFilter {
    pub fn new(codes: impl IntoIterator<Item = u16>) -> Self {
        Self {
            codes: codes.into_iter().collect(),
        }
    }
}

impl BeforeSend for HttpStatusFilter {
    fn name(&self) -> &str {
        "http-status"
    }

    fn on_before_send(&self, report: Report) -> Option<Report> {
        match &report.response {
            Some(response) if self.codes.contains(&response.status_code) => None,
            _ => Some(report),
        }
    }
}
