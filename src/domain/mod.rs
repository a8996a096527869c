//! Domain layer containing core business logic.
//!
//! This module contains:
//! - Report and error data types
//! - Filter traits, chains and built-in filters
//! - Error fingerprinting and the clock used for suppression windows
//! - Logger with rotation

pub mod clock;
mod error;
pub mod filters;
pub mod fingerprint;
pub mod logger;
mod types;

pub use error::FilterError;
pub use filters::{AfterSend, AfterSendChain, BeforeSend, BeforeSendChain};
pub use types::{
    ErrorDetail, Report, RequestDetails, ResponseDetails, SendOutcome, SendStatus, StackFrame,
};
