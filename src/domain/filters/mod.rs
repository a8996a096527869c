//! Filter system for error reports.

mod chain;
mod duplicate_filter;
mod exclude_filter;
mod filter_trait;
mod map_filter;
mod matcher;
mod status_filter;
mod unwrap_filter;

pub use chain::{AfterSendChain, BeforeSendChain, Position};
pub use duplicate_filter::{DuplicateErrorFilter, DEFAULT_STACK_DEPTH};
pub use exclude_filter::{ExcludeErrorKindFilter, ExcludeLocalRequestFilter};
pub use filter_trait::{AfterSend, BeforeSend};
pub use map_filter::{RequestField, RequestMapFilter, DEFAULT_REPLACEMENT};
pub use matcher::KindMatcher;
pub use status_filter::HttpStatusFilter;
pub use unwrap_filter::StripWrappedErrorFilter;
