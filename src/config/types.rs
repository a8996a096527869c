//! Configuration data types.

use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::validation;
use crate::domain::filters::{DEFAULT_REPLACEMENT, DEFAULT_STACK_DEPTH};
use crate::domain::fingerprint::FingerprintStrategy;

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Enable debug logging to file
    pub debug: bool,

    /// Path to log directory
    pub log_path: PathBuf,

    /// Days to keep rotated log files
    pub log_retention_days: u64,

    /// Version stamped onto reports that carry none
    pub version: Option<String>,

    /// Clients must be built per request, with request context
    pub request_scoped: bool,

    /// Wrapper error unwrapping
    pub unwrap: UnwrapConfig,

    /// Duplicate suppression
    pub duplicate: DuplicateConfig,

    /// Whole-report exclusion rules
    pub exclude: ExcludeConfig,

    /// Request field redaction
    pub redact: RedactConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            log_path: default_log_path(),
            log_retention_days: 2,
            version: None,
            request_scoped: false,
            unwrap: UnwrapConfig::default(),
            duplicate: DuplicateConfig::default(),
            exclude: ExcludeConfig::default(),
            redact: RedactConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration and return errors if invalid.
    /// Delegates to the comprehensive validation module.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

/// Wrapper error kinds whose cause is promoted to top level.
///
/// ```toml
/// [unwrap]
/// kinds = ["java.lang.reflect.InvocationTargetException"]
/// patterns = ["^com\\.example\\..*WrapperException$"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UnwrapConfig {
    /// Exact kind names
    pub kinds: Vec<String>,

    /// Regex patterns matched against the kind name
    pub patterns: Vec<String>,
}

impl UnwrapConfig {
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty() && self.patterns.is_empty()
    }
}

/// Duplicate suppression settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DuplicateConfig {
    pub enabled: bool,

    /// Seconds a delivered error suppresses identical reports
    pub ttl_secs: u64,

    pub strategy: FingerprintStrategy,

    /// Stack frames included in a `full` fingerprint
    pub stack_depth: usize,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 60,
            strategy: FingerprintStrategy::Full,
            stack_depth: DEFAULT_STACK_DEPTH,
        }
    }
}

/// Rules that drop a report entirely.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExcludeConfig {
    /// Response status codes that are never reported
    pub status_codes: Vec<u16>,

    /// Exact error kinds that are never reported
    pub kinds: Vec<String>,

    /// Regex patterns for error kinds that are never reported
    pub patterns: Vec<String>,

    /// Drop reports from requests to loopback hosts
    pub local_requests: bool,
}

/// Keys whose values are replaced before sending.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedactConfig {
    pub replacement: String,
    pub query_string: Vec<String>,
    pub headers: Vec<String>,
    pub form: Vec<String>,
    pub cookies: Vec<String>,
}

impl Default for RedactConfig {
    fn default() -> Self {
        Self {
            replacement: DEFAULT_REPLACEMENT.to_string(),
            query_string: Vec::new(),
            headers: Vec::new(),
            form: Vec::new(),
            cookies: Vec::new(),
        }
    }
}

/// Get default log path (relative to config directory).
/// This returns a placeholder; the actual path is set by ConfigService based on config file location.
pub fn default_log_path() -> PathBuf {
    default_log_path_for_config_dir(None)
}

/// Get log path based on config directory.
pub fn default_log_path_for_config_dir(config_dir: Option<&Path>) -> PathBuf {
    config_dir
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
                .join("crashgate")
        })
        .join("logs")
}
