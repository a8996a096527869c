//! Duplicate report suppression.

use std::sync::Arc;

use dashmap::DashMap;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::{AfterSend, BeforeSend};
use crate::domain::clock::{Clock, SystemClock};
use crate::domain::fingerprint::{Fingerprint, FingerprintStrategy};
use crate::domain::{FilterError, Report, SendOutcome};

/// Default number of stack frames included in a fingerprint.
pub const DEFAULT_STACK_DEPTH: usize = 5;

/// Suppresses reports whose error was delivered within the last `ttl`.
///
/// Registered twice: run-last in the before-send chain to veto duplicates,
/// and in the after-send chain to record delivered fingerprints. Two
/// concurrent sends of the same new error can both get through; the map
/// itself is never left inconsistent.
pub struct DuplicateErrorFilter {
    window: DashMap<Fingerprint, OffsetDateTime>,
    ttl: Duration,
    strategy: FingerprintStrategy,
    stack_depth: usize,
    clock: Arc<dyn Clock>,
}

impl DuplicateErrorFilter {
    pub fn new(ttl: Duration) -> Self {
        Self {
            window: DashMap::new(),
            ttl,
            strategy: FingerprintStrategy::default(),
            stack_depth: DEFAULT_STACK_DEPTH,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_strategy(mut self, strategy: FingerprintStrategy, stack_depth: usize) -> Self {
        self.strategy = strategy;
        self.stack_depth = stack_depth;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn fingerprint(&self, report: &Report) -> Fingerprint {
        Fingerprint::of(&report.error, self.strategy, self.stack_depth)
    }

    /// Live iff `0 <= now - last_seen < ttl`. A clock that went backwards expires the entry.
    fn is_live(&self, last_seen: OffsetDateTime, now: OffsetDateTime) -> bool {
        let elapsed = now - last_seen;
        !elapsed.is_negative() && elapsed < self.ttl
    }

    /// Number of fingerprints currently held, live or not yet pruned.
    pub fn tracked(&self) -> usize {
        self.window.len()
    }
}

impl BeforeSend for DuplicateErrorFilter {
    fn name(&self) -> &str {
        "duplicate-error"
    }

    fn on_before_send(&self, report: Report) -> Option<Report> {
        let fingerprint = self.fingerprint(&report);
        let now = self.clock.now();

        let last_seen = self.window.get(&fingerprint).map(|entry| *entry.value());
        match last_seen {
            Some(seen) if self.is_live(seen, now) => {
                debug!("Suppressing duplicate error {}", fingerprint.as_str());
                None
            }
            Some(_) => {
                self.window
                    .remove_if(&fingerprint, |_, seen| !self.is_live(*seen, now));
                Some(report)
            }
            None => Some(report),
        }
    }
}

impl AfterSend for DuplicateErrorFilter {
    fn name(&self) -> &str {
        "duplicate-error"
    }

    fn on_after_send(&self, report: &Report, outcome: &SendOutcome) -> Result<(), FilterError> {
        if !outcome.is_delivered() {
            return Ok(());
        }

        let fingerprint = self.fingerprint(report);
        debug!("Recording delivered error {}", fingerprint.as_str());
        self.window.insert(fingerprint, self.clock.now());
        Ok(())
    }
}
