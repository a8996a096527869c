//! Core domain types for error reports.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Error report passed through the filter chains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Current top-level error
    pub error: ErrorDetail,

    /// Application version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Free-form tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Arbitrary user data
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_data: BTreeMap<String, serde_json::Value>,

    /// Captured request, if the error happened while serving one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestDetails>,

    /// Response sent for that request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseDetails>,

    /// RFC 3339 timestamp of the occurrence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occurred_on: Option<String>,
}

impl Report {
    /// Create a report carrying only an error.
    pub fn new(error: ErrorDetail) -> Self {
        Self {
            error,
            version: None,
            tags: Vec::new(),
            custom_data: BTreeMap::new(),
            request: None,
            response: None,
            occurred_on: None,
        }
    }

    pub fn with_request(mut self, request: RequestDetails) -> Self {
        self.request = Some(request);
        self
    }

    pub fn with_response_status(mut self, status_code: u16) -> Self {
        self.response = Some(ResponseDetails { status_code });
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// One error occurrence and its cause chain.
///
/// The chain is owned and acyclic: an inner error can only be attached by
/// consuming it in [`ErrorDetail::caused_by`], so no error can ever point
/// back at one of its ancestors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    /// Runtime type name of the originating error
    pub kind: String,

    /// Error message
    #[serde(default)]
    pub message: String,

    /// Stack frames, innermost call first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stack_trace: Vec<StackFrame>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    inner_error: Option<Box<ErrorDetail>>,
}

impl ErrorDetail {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            stack_trace: Vec::new(),
            inner_error: None,
        }
    }

    pub fn with_stack_trace(mut self, frames: Vec<StackFrame>) -> Self {
        self.stack_trace = frames;
        self
    }

    /// Attach `inner` as the cause of this error, replacing any previous cause.
    pub fn caused_by(mut self, inner: ErrorDetail) -> Self {
        self.inner_error = Some(Box::new(inner));
        self
    }

    pub fn inner_error(&self) -> Option<&ErrorDetail> {
        self.inner_error.as_deref()
    }

    pub fn has_inner_error(&self) -> bool {
        self.inner_error.is_some()
    }

    /// Detach and return the cause, leaving this error without one.
    pub fn take_inner(&mut self) -> Option<ErrorDetail> {
        self.inner_error.take().map(|inner| *inner)
    }

    /// Number of errors in the chain, including this one.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self;
        while let Some(inner) = current.inner_error() {
            depth += 1;
            current = inner;
        }
        depth
    }
}

/// Single stack frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
    pub class_name: String,
    pub method_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
}

impl StackFrame {
    pub fn new(class_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            file_name: None,
            line_number: None,
        }
    }

    pub fn at(mut self, file_name: impl Into<String>, line_number: u32) -> Self {
        self.file_name = Some(file_name.into());
        self.line_number = Some(line_number);
        self
    }
}

/// Request captured alongside the error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestDetails {
    pub host_name: String,
    pub url: String,
    pub http_method: String,
    pub ip_address: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub query_string: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub form: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub cookies: BTreeMap<String, String>,
}

/// Response sent for the captured request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDetails {
    pub status_code: u16,
}

/// Result of a transport attempt, handed to after-send observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The collector accepted the report
    Delivered { status: Option<u16> },
    /// The send failed
    Failed {
        status: Option<u16>,
        reason: String,
    },
}

impl SendOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, SendOutcome::Delivered { .. })
    }
}

/// What happened to a report handed to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendStatus {
    /// A before-send filter vetoed the report; transport was not attempted
    Cancelled,
    /// Transport was attempted with this outcome
    Attempted(SendOutcome),
}
