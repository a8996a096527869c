//! Error fingerprinting for duplicate detection.

use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::ErrorDetail;

/// Which parts of an error identify "the same error".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintStrategy {
    /// Kind, message and the leading stack frames
    #[default]
    Full,
    /// Kind and message only
    KindAndMessage,
}

/// Hex-encoded SHA-256 fingerprint of an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint the top-level error only; its causes are ignored.
    pub fn of(error: &ErrorDetail, strategy: FingerprintStrategy, stack_depth: usize) -> Self {
        let mut hasher = Sha256::new();
        update_field(&mut hasher, Some(error.kind.as_str()));
        update_field(&mut hasher, Some(error.message.as_str()));

        if strategy == FingerprintStrategy::Full {
            for frame in error.stack_trace.iter().take(stack_depth) {
                update_field(&mut hasher, Some(frame.class_name.as_str()));
                update_field(&mut hasher, Some(frame.method_name.as_str()));
                update_field(&mut hasher, frame.file_name.as_deref());
                match frame.line_number {
                    Some(line) => {
                        hasher.update([1u8]);
                        hasher.update(line.to_be_bytes());
                    }
                    None => hasher.update([0u8]),
                }
            }
        }

        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Hash an optional string with a presence tag and length prefix, so adjacent
/// fields can never run into each other.
fn update_field(hasher: &mut Sha256, value: Option<&str>) {
    match value {
        Some(value) => {
            hasher.update([1u8]);
            hasher.update((value.len() as u64).to_be_bytes());
            hasher.update(value.as_bytes());
        }
        None => hasher.update([0u8]),
    }
}
