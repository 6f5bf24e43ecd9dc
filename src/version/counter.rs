//! VersionCounter - Per-object monotonic version counter
//!
//! - Owned exclusively by one trackable object
//! - Reads are lock-free and may race with commits (a reader sees either
//!   the version before or after a concurrent commit, never garbage)
//! - Advancing is crate-internal: only a committing change scope moves the
//!   counter, so the count of committed scopes and the version can never
//!   drift apart

use std::sync::atomic::{AtomicU64, Ordering};

use super::Version;

/// Monotonic version counter for a single trackable object.
///
/// # Thread Safety
///
/// Backed by an atomic; `fetch_add` makes concurrent commits lose nothing.
/// The owning scope additionally serializes commits through its ledger
/// lock, so the counter only ever moves by one per committed scope.
#[derive(Debug, Default)]
pub struct VersionCounter {
    current: AtomicU64,
}

impl VersionCounter {
    /// Creates a counter starting at `Version::ZERO`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current version.
    #[inline]
    pub fn current(&self) -> Version {
        Version::new(self.current.load(Ordering::Acquire))
    }

    /// Advances the counter by one and returns the new version.
    pub(crate) fn advance(&self) -> Version {
        Version::new(self.current.fetch_add(1, Ordering::AcqRel) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_counter_starts_at_zero() {
        let counter = VersionCounter::new();
        assert_eq!(counter.current(), Version::ZERO);
    }

    #[test]
    fn test_advance_moves_by_one() {
        let counter = VersionCounter::new();

        assert_eq!(counter.advance(), Version::new(1));
        assert_eq!(counter.advance(), Version::new(2));
        assert_eq!(counter.current(), Version::new(2));
    }

    #[test]
    fn test_parallel_advances_lose_nothing() {
        use std::sync::Arc;
        use std::thread;

        let counter = Arc::new(VersionCounter::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let counter = Arc::clone(&counter);
            handles.push(thread::spawn(move || {
                for _ in 0..1000 {
                    counter.advance();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.current(), Version::new(8 * 1000));
    }
}
