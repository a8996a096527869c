//! Before-send and after-send chain implementations.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, warn};

use super::{AfterSend, BeforeSend};
use crate::domain::{Report, SendOutcome};

/// Where a before-send filter sits in the composed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Runs in registration order with the other normal filters
    Normal,
    /// Runs after every normal filter, whenever it was registered
    RunLast,
}

#[derive(Clone, Default)]
struct Entries {
    normal: Vec<Arc<dyn BeforeSend>>,
    run_last: Vec<Arc<dyn BeforeSend>>,
}

impl Entries {
    fn ordered(&self) -> impl Iterator<Item = &Arc<dyn BeforeSend>> {
        self.normal.iter().chain(self.run_last.iter())
    }
}

/// Ordered chain of filters applied to a report before it is sent.
///
/// Registration swaps in a new snapshot under a write lock; `run` clones the
/// current snapshot and calls filters without holding the lock.
#[derive(Default)]
pub struct BeforeSendChain {
    entries: RwLock<Arc<Entries>>,
}

impl BeforeSendChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter to the normal sequence.
    pub fn register(&self, filter: Arc<dyn BeforeSend>) {
        self.register_at(filter, Position::Normal);
    }

    /// Append a filter to the run-last sequence.
    pub fn register_run_last(&self, filter: Arc<dyn BeforeSend>) {
        self.register_at(filter, Position::RunLast);
    }

    pub fn register_at(&self, filter: Arc<dyn BeforeSend>, position: Position) {
        debug!("Registering before-send filter {} ({:?})", filter.name(), position);
        let mut guard = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = Entries::clone(&guard);
        match position {
            Position::Normal => next.normal.push(filter),
            Position::RunLast => next.run_last.push(filter),
        }
        *guard = Arc::new(next);
    }

    fn snapshot(&self) -> Arc<Entries> {
        Arc::clone(&self.entries.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Run every filter in composed order, stopping at the first cancellation.
    pub fn run(&self, report: Report) -> Option<Report> {
        let entries = self.snapshot();
        let mut report = report;

        for filter in entries.ordered() {
            match filter.on_before_send(report) {
                Some(next) => report = next,
                None => {
                    info!("Report cancelled by filter: {}", filter.name());
                    return None;
                }
            }
        }

        Some(report)
    }

    /// Filter names in execution order.
    pub fn filter_names(&self) -> Vec<String> {
        self.snapshot()
            .ordered()
            .map(|f| f.name().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        let entries = self.snapshot();
        entries.normal.len() + entries.run_last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered list of observers notified after every send attempt.
#[derive(Default)]
pub struct AfterSendChain {
    observers: RwLock<Arc<Vec<Arc<dyn AfterSend>>>>,
}

impl AfterSendChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, observer: Arc<dyn AfterSend>) {
        debug!("Registering after-send observer {}", observer.name());
        let mut guard = self.observers.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = Vec::clone(&guard);
        next.push(observer);
        *guard = Arc::new(next);
    }

    /// Notify every observer in registration order.
    ///
    /// Observer errors and panics are logged and skipped. Returns how many
    /// observers faulted.
    pub fn run(&self, report: &Report, outcome: &SendOutcome) -> usize {
        let observers = Arc::clone(&self.observers.read().unwrap_or_else(PoisonError::into_inner));
        let mut faults = 0;

        for observer in observers.iter() {
            let result =
                panic::catch_unwind(AssertUnwindSafe(|| observer.on_after_send(report, outcome)));
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!("After-send observer {} failed: {}", observer.name(), e);
                    faults += 1;
                }
                Err(_) => {
                    warn!("After-send observer {} panicked", observer.name());
                    faults += 1;
                }
            }
        }

        faults
    }

    pub fn observer_names(&self) -> Vec<String> {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|o| o.name().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
