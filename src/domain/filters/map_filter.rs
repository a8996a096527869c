//! Request field redaction filter.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use super::BeforeSend;
use crate::domain::{Report, RequestDetails};

/// Default replacement for redacted values.
pub const DEFAULT_REPLACEMENT: &str = "[FILTERED]";

/// Request map a [`RequestMapFilter`] rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestField {
    QueryString,
    Headers,
    Form,
    Cookies,
}

impl RequestField {
    fn map_mut(self, request: &mut RequestDetails) -> &mut BTreeMap<String, String> {
        match self {
            RequestField::QueryString => &mut request.query_string,
            RequestField::Headers => &mut request.headers,
            RequestField::Form => &mut request.form,
            RequestField::Cookies => &mut request.cookies,
        }
    }
}

impl fmt::Display for RequestField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestField::QueryString => "query-string",
            RequestField::Headers => "headers",
            RequestField::Form => "form",
            RequestField::Cookies => "cookies",
        };
        f.write_str(name)
    }
}

/// Replaces the values of configured keys in one request map.
pub struct RequestMapFilter {
    field: RequestField,
    keys: Vec<String>,
    replacement: String,
    name: String,
}

impl RequestMapFilter {
    pub fn new(field: RequestField, keys: Vec<String>) -> Self {
        Self {
            field,
            keys,
            replacement: DEFAULT_REPLACEMENT.to_string(),
            name: format!("redact-{}", field),
        }
    }

    pub fn replace_with(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = replacement.into();
        self
    }
}

impl BeforeSend for RequestMapFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_before_send(&self, mut report: Report) -> Option<Report> {
        if let Some(request) = report.request.as_mut() {
            let map = self.field.map_mut(request);
            for key in &self.keys {
                if let Some(value) = map.get_mut(key) {
                    value.clone_from(&self.replacement);
                }
            }
        }
        Some(report)
    }
}
