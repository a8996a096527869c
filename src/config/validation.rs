//! Configuration validation.

use anyhow::{bail, Result};
use regex::Regex;

use super::Config;

/// Largest TTL accepted, one year.
const MAX_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Longest log retention accepted, ten years.
const MAX_LOG_RETENTION_DAYS: u64 = 3650;

/// Validate configuration.
pub fn validate(config: &Config) -> Result<()> {
    if config.log_path.to_string_lossy().contains('\0') {
        bail!("Invalid log_path: contains null character");
    }

    if config.log_retention_days > MAX_LOG_RETENTION_DAYS {
        bail!(
            "log_retention_days must be at most {}, got {}",
            MAX_LOG_RETENTION_DAYS,
            config.log_retention_days
        );
    }

    if let Some(version) = &config.version {
        if version.trim().is_empty() {
            bail!("version cannot be empty when set");
        }
    }

    // Validate kind matchers
    validate_kinds("unwrap", &config.unwrap.kinds, &config.unwrap.patterns)?;
    validate_kinds("exclude", &config.exclude.kinds, &config.exclude.patterns)?;

    // Validate duplicate suppression
    let duplicate = &config.duplicate;
    if duplicate.ttl_secs == 0 || duplicate.ttl_secs > MAX_TTL_SECS {
        bail!(
            "duplicate.ttl_secs must be between 1 and {}, got {}",
            MAX_TTL_SECS,
            duplicate.ttl_secs
        );
    }
    if duplicate.stack_depth == 0 {
        bail!("duplicate.stack_depth must be at least 1");
    }

    for (i, code) in config.exclude.status_codes.iter().enumerate() {
        if !(100..=599).contains(code) {
            bail!("exclude.status_codes[{}]: {} is not an HTTP status code", i, code);
        }
    }

    // Validate redaction keys
    let redact = &config.redact;
    for (field, keys) in [
        ("query_string", &redact.query_string),
        ("headers", &redact.headers),
        ("form", &redact.form),
        ("cookies", &redact.cookies),
    ] {
        for (i, key) in keys.iter().enumerate() {
            if key.is_empty() {
                bail!("redact.{}[{}]: key cannot be empty", field, i);
            }
        }
    }

    Ok(())
}

fn validate_kinds(section: &str, kinds: &[String], patterns: &[String]) -> Result<()> {
    for (i, kind) in kinds.iter().enumerate() {
        if kind.trim().is_empty() {
            bail!("{}.kinds[{}]: kind cannot be empty", section, i);
        }
    }

    for (i, pattern) in patterns.iter().enumerate() {
        if pattern.is_empty() {
            bail!("{}.patterns[{}]: pattern cannot be empty", section, i);
        }
        if let Err(e) = Regex::new(pattern) {
            bail!(
                "{}.patterns[{}]: invalid regex pattern '{}': {}",
                section,
                i,
                pattern,
                e
            );
        }
    }

    Ok(())
}
