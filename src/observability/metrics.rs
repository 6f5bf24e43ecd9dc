//! Per-object change metrics
//!
//! - Counters only (no gauges, no histograms)
//! - Monotonic increase
//! - Reset only when the object is dropped
//! - Thread-safe but lock-minimal

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one trackable object
///
/// # Thread Safety
///
/// All counters use atomic operations for thread-safe increments.
/// Uses Relaxed ordering for minimal overhead (eventual consistency is
/// fine for metrics).
#[derive(Debug, Default)]
pub struct ChangeMetrics {
    /// Top-level scopes that committed
    commits: AtomicU64,
    /// Top-level scopes that absorbed an abort signal
    aborts: AtomicU64,
    /// Top-level scopes that exited on an error path
    abandons: AtomicU64,
    /// Tracked-field writes skipped because the value was unchanged
    unchanged_writes: AtomicU64,
}

impl ChangeMetrics {
    /// Create a new metrics block with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a committed scope
    pub(crate) fn record_commit(&self) {
        self.commits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an aborted scope
    pub(crate) fn record_abort(&self) {
        self.aborts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an abandoned scope
    pub(crate) fn record_abandon(&self) {
        self.abandons.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an equality-gated write that did not change the value
    pub(crate) fn record_unchanged_write(&self) {
        self.unchanged_writes.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            commits: self.commits.load(Ordering::Relaxed),
            aborts: self.aborts.load(Ordering::Relaxed),
            abandons: self.abandons.load(Ordering::Relaxed),
            unchanged_writes: self.unchanged_writes.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of one object's change metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub commits: u64,
    pub aborts: u64,
    pub abandons: u64,
    pub unchanged_writes: u64,
}
