//! crashgate: filter pipeline for crash report clients.
//!
//! Reports pass through an ordered before-send chain that may rewrite or
//! cancel them, then through a transport, then through an after-send chain
//! of observers. The built-in filters unwrap wrapper errors, drop excluded
//! reports, redact request fields and suppress recently delivered duplicates.

pub mod config;
pub mod domain;
pub mod service;

pub use domain::{
    AfterSend, AfterSendChain, BeforeSend, BeforeSendChain, ErrorDetail, FilterError, Report,
    RequestDetails, SendOutcome, SendStatus, StackFrame,
};
pub use service::{Client, ClientFactory, Transport};
