//! Version - Totally ordered version number
//!
//! - Every trackable object starts at `Version::ZERO`
//! - Version numbers define a strict total order per object
//! - Comparing versions from two different objects is meaningless
//!
//! This is a PURE TYPE with no behavior beyond construction, comparison
//! and access.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A totally ordered, opaque version number.
///
/// Two observations of the same object are ordered by their versions;
/// `is_later_than` answers whether a second observation saw a strictly
/// newer state.
#[derive(
    Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(u64);

impl Version {
    /// The version of a freshly created object.
    pub const ZERO: Version = Version(0);

    /// Creates a Version with the given value.
    #[inline]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying value.
    ///
    /// This accessor exists for serialization and diagnostics.
    /// Application code should not depend on the internal representation.
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }

    /// The version immediately after this one.
    #[inline]
    pub fn next(&self) -> Version {
        Version(self.0 + 1)
    }

    /// Returns true if this version is strictly newer than `other`.
    #[inline]
    pub fn is_later_than(&self, other: Version) -> bool {
        self.0 > other.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_default() {
        assert_eq!(Version::default(), Version::ZERO);
        assert_eq!(Version::ZERO.value(), 0);
    }

    #[test]
    fn test_version_ordering() {
        let v1 = Version::new(1);
        let v5 = Version::new(5);

        assert!(v1 < v5);
        assert!(v5.is_later_than(v1));
        assert!(!v1.is_later_than(v5));
        assert!(!v1.is_later_than(v1));
    }

    #[test]
    fn test_next_is_successor() {
        let v = Version::new(41);
        assert_eq!(v.next(), Version::new(42));
        assert!(v.next().is_later_than(v));
    }

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(7).to_string(), "v7");
    }

    #[test]
    fn test_version_is_copy() {
        let v1 = Version::new(3);
        let v2 = v1;
        assert_eq!(v1, v2);
    }
}
