//! Trackable - Declaring trackable types by composition
//!
//! Host types embed a `Versioned` and point the trait at it; version and
//! scope access come for free. Generic operations (tracked-field access,
//! the wrapper family) live on `Versioned` itself; reach them through
//! `versioned()`.
//!
//! ```
//! use verstate::field::Field;
//! use verstate::tracked::{Trackable, Versioned};
//!
//! static HEALTH: Field<i64> = Field::new("health", || 100);
//!
//! struct Player {
//!     state: Versioned,
//! }
//!
//! impl Trackable for Player {
//!     fn versioned(&self) -> &Versioned {
//!         &self.state
//!     }
//! }
//!
//! let player = Player { state: Versioned::new() };
//! player.versioned().set(&HEALTH, 90);
//! assert!(player.changed_since(verstate::version::Version::ZERO));
//! ```

use crate::version::Version;

use super::{Change, Versioned};

/// A type with a trackable core.
pub trait Trackable {
    /// The tracking core of this object.
    fn versioned(&self) -> &Versioned;

    /// Current version.
    fn version(&self) -> Version {
        self.versioned().version()
    }

    /// Has this object committed since `seen` was observed?
    fn changed_since(&self, seen: Version) -> bool {
        self.versioned().changed_since(seen)
    }

    /// Opens a mutation scope on this object.
    fn change(&self) -> Change {
        self.versioned().change()
    }

    /// One immediate committed scope; returns the new version.
    fn touch(&self) -> Version {
        self.versioned().touch()
    }
}

impl Trackable for Versioned {
    fn versioned(&self) -> &Versioned {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Host {
        state: Versioned,
    }

    impl Trackable for Host {
        fn versioned(&self) -> &Versioned {
            &self.state
        }
    }

    #[test]
    fn test_trait_delegates_to_core() {
        let host = Host {
            state: Versioned::new(),
        };

        assert_eq!(host.version(), Version::ZERO);
        host.touch();
        assert_eq!(host.version(), Version::new(1));
        assert!(host.changed_since(Version::ZERO));
    }

    #[test]
    fn test_trait_scope_commits_once() {
        let host = Host {
            state: Versioned::new(),
        };

        let change = host.change();
        let version = change.commit();

        assert_eq!(version, Version::new(1));
    }
}
