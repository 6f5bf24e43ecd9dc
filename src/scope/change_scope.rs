//! ChangeScope - Per-object scope state and the serialized commit step
//!
//! - One `ChangeScope` per trackable object, created with it
//! - `enter`/`exit` bracket exactly one logical top-level mutation; the
//!   token type in `tracked` drives them and carries the reentrancy depth
//! - The ledger lock guards only the bookkeeping and the commit step; it
//!   is never held while caller code runs, so long or suspending bodies
//!   do not block other threads' bookkeeping

use std::sync::Mutex;

use crate::observability::{ChangeMetrics, Event, Logger, Severity};
use crate::version::{Version, VersionCounter};

/// How a scope exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeOutcome {
    /// Normal exit: advance the version by one
    Committed,
    /// Abort signal consumed: keep side effects, skip the advance
    Aborted,
    /// Error-path exit: skip the advance, the error propagates elsewhere
    Abandoned,
}

/// Entry bookkeeping for one object.
#[derive(Debug, Default)]
struct Ledger {
    /// Currently open top-level entries (threads or suspended tasks)
    open: u64,
}

/// Per-object change scope state.
///
/// Concurrent top-level entries are all legal; each carries its own token
/// and they serialize only around the commit step. The version therefore
/// ends up equal to the number of committed top-level scopes, regardless
/// of interleaving.
#[derive(Debug, Default)]
pub struct ChangeScope {
    counter: VersionCounter,
    ledger: Mutex<Ledger>,
    metrics: ChangeMetrics,
}

impl ChangeScope {
    /// Creates scope state with the version at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current version.
    #[inline]
    pub fn version(&self) -> Version {
        self.counter.current()
    }

    /// Returns the number of currently open top-level entries.
    pub fn open_entries(&self) -> u64 {
        self.ledger.lock().expect("scope ledger lock poisoned").open
    }

    /// Change metrics for this object.
    #[inline]
    pub fn metrics(&self) -> &ChangeMetrics {
        &self.metrics
    }

    /// Registers one top-level entry.
    pub(crate) fn enter(&self) {
        let mut ledger = self.ledger.lock().expect("scope ledger lock poisoned");
        ledger.open += 1;
    }

    /// Deregisters one top-level entry and applies its outcome.
    ///
    /// Committing advances the version under the ledger lock; aborted and
    /// abandoned exits leave it untouched. Returns the version as of the
    /// exit.
    pub(crate) fn exit(&self, outcome: ScopeOutcome) -> Version {
        let version = {
            let mut ledger = self.ledger.lock().expect("scope ledger lock poisoned");
            assert!(ledger.open > 0, "change scope exit without a matching entry");
            ledger.open -= 1;

            match outcome {
                ScopeOutcome::Committed => self.counter.advance(),
                ScopeOutcome::Aborted | ScopeOutcome::Abandoned => self.counter.current(),
            }
        };

        match outcome {
            ScopeOutcome::Committed => self.metrics.record_commit(),
            ScopeOutcome::Aborted => self.metrics.record_abort(),
            ScopeOutcome::Abandoned => self.metrics.record_abandon(),
        }
        self.trace_exit(outcome, version);

        version
    }

    /// Records an equality-gated write that did not change a field.
    pub(crate) fn note_unchanged_write(&self, field: &str) {
        self.metrics.record_unchanged_write();
        if Logger::enabled(Severity::Trace) {
            Logger::trace(Event::UnchangedWrite.as_str(), &[("field", field)]);
        }
    }

    fn trace_exit(&self, outcome: ScopeOutcome, version: Version) {
        if !Logger::enabled(Severity::Trace) {
            return;
        }
        let event = match outcome {
            ScopeOutcome::Committed => Event::ChangeCommit,
            ScopeOutcome::Aborted => Event::ChangeAbort,
            ScopeOutcome::Abandoned => Event::ChangeAbandon,
        };
        Logger::trace(event.as_str(), &[("version", &version.to_string())]);
    }
}
