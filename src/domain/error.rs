//! Error types for crashgate.

use thiserror::Error;

/// Main error type for crashgate.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A client was requested without the per-request context the factory needs
    #[error("new_client() is not valid for a request-scoped factory; use new_client_for(request)")]
    RequestContextRequired,

    /// An after-send observer failed
    #[error("Observer '{name}' failed: {message}")]
    Observer { name: String, message: String },

    /// Regex error
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}
