//! Versioned - The trackable base object
//!
//! An `Arc`-shared core composing instance identity, the change scope and
//! the tracked-field store. Cloning a `Versioned` aliases the same object:
//! both handles see the same version, the same fields, and compare equal.
//!
//! # Hashing hazard
//!
//! Equality is identity-only, but the hash mixes identity and version, so
//! an object's hash changes every time it commits. Do not keep a
//! `Versioned` as a key in a hash-based container across mutations.

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use uuid::Uuid;

use crate::field::{Field, FieldStore, FieldValue};
use crate::observability::MetricsSnapshot;
use crate::scope::{
    AbortChange, AbortUpdate, ChangeError, ChangeResult, ChangeScope, UpdateError, UpdateResult,
};
use crate::version::Version;

use super::change::{settle_change, settle_update, Change};

/// Shared state of one trackable object.
#[derive(Debug)]
pub(crate) struct Core {
    pub(crate) id: Uuid,
    pub(crate) scope: ChangeScope,
    pub(crate) fields: FieldStore,
}

/// A trackable object: identity, monotonic version, mutation scope and
/// tracked fields.
pub struct Versioned {
    core: Arc<Core>,
}

impl Versioned {
    /// Creates a fresh object at `Version::ZERO`.
    pub fn new() -> Self {
        Self {
            core: Arc::new(Core {
                id: Uuid::new_v4(),
                scope: ChangeScope::new(),
                fields: FieldStore::new(),
            }),
        }
    }

    /// Stable identity of this object.
    #[inline]
    pub fn id(&self) -> Uuid {
        self.core.id
    }

    /// Current version.
    #[inline]
    pub fn version(&self) -> Version {
        self.core.scope.version()
    }

    /// Has this object committed since `seen` was observed?
    #[inline]
    pub fn changed_since(&self, seen: Version) -> bool {
        self.version().is_later_than(seen)
    }

    /// Point-in-time snapshot of this object's change metrics.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.core.scope.metrics().snapshot()
    }

    /// Opens a mutation scope and returns its token.
    ///
    /// Settle the token on every path: `commit()` advances the version by
    /// one, `abort()` suppresses the advance, dropping it unsettled is the
    /// error path (no advance). The token may be held across `.await`
    /// points; the scope stays open until it settles.
    pub fn change(&self) -> Change {
        Change::top_level(Arc::clone(&self.core))
    }

    /// Direct-call form of [`Versioned::change`]: one immediate committed
    /// scope. Returns the new version.
    pub fn touch(&self) -> Version {
        self.change().commit()
    }

    // Tracked-field access.

    /// Current value of `field`, materializing its default on first touch.
    pub fn get<T: FieldValue>(&self, field: &'static Field<T>) -> T {
        self.core.fields.read(field)
    }

    /// Writes `field`, committing one scope iff the value actually changed.
    ///
    /// A write equal to the current value (by `PartialEq`) opens no scope
    /// and leaves the version untouched. To batch several writes into one
    /// version advance, go through [`Versioned::change`] or a wrapper and
    /// use [`Change::set`]; this method always scopes itself.
    pub fn set<T: FieldValue>(&self, field: &'static Field<T>, value: T) -> Version {
        if self.core.fields.write(field, value) {
            self.change().commit()
        } else {
            self.core.scope.note_unchanged_write(field.name());
            self.version()
        }
    }

    /// Read-modify-write of `field`, atomic with respect to other field
    /// access on this object. Commits one scope iff the closure changed
    /// the value.
    pub fn modify<T: FieldValue, R>(
        &self,
        field: &'static Field<T>,
        f: impl FnOnce(&mut T) -> R,
    ) -> R {
        let (changed, result) = self.core.fields.modify(field, f);
        if changed {
            self.change().commit();
        }
        result
    }

    // Mutating-operation wrappers. All share one settle algorithm; they
    // differ only in the abort flavor and the error channel.

    /// Runs a mutating operation; on abort the payload becomes the result.
    ///
    /// The body receives a nested token for field writes and inner
    /// operations; the wrapper owns the single pending version advance.
    pub fn changes<T, F>(&self, f: F) -> T
    where
        F: FnOnce(Change) -> Result<T, AbortChange<T>>,
    {
        match self.try_changes::<T, Infallible, _>(|cx| f(cx).map_err(ChangeError::Abort)) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Runs a mutating operation; on abort the result is `None`.
    pub fn updates<T, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(Change) -> Result<T, AbortUpdate>,
    {
        match self.try_updates::<T, Infallible, _>(|cx| f(cx).map_err(UpdateError::Abort)) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Runs a fallible mutating operation.
    ///
    /// Aborts are consumed here; any other error exits the scope without
    /// committing and propagates unchanged.
    pub fn try_changes<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(Change) -> ChangeResult<T, E>,
    {
        let token = self.change();
        let result = f(token.nested());
        settle_change(token, result)
    }

    /// Runs a fallible mutating operation; aborts resolve to `None`.
    pub fn try_updates<T, E, F>(&self, f: F) -> Result<Option<T>, E>
    where
        F: FnOnce(Change) -> UpdateResult<T, E>,
    {
        let token = self.change();
        let result = f(token.nested());
        settle_update(token, result)
    }

    /// Suspendable form of [`Versioned::changes`]. The scope stays open
    /// across every suspension point until the future settles.
    pub async fn changes_async<T, F, Fut>(&self, f: F) -> T
    where
        F: FnOnce(Change) -> Fut,
        Fut: Future<Output = Result<T, AbortChange<T>>>,
    {
        let token = self.change();
        let result = f(token.nested()).await.map_err(ChangeError::Abort);
        match settle_change::<T, Infallible>(token, result) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Suspendable form of [`Versioned::updates`].
    pub async fn updates_async<T, F, Fut>(&self, f: F) -> Option<T>
    where
        F: FnOnce(Change) -> Fut,
        Fut: Future<Output = Result<T, AbortUpdate>>,
    {
        let token = self.change();
        let result = f(token.nested()).await.map_err(UpdateError::Abort);
        match settle_update::<T, Infallible>(token, result) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Suspendable form of [`Versioned::try_changes`].
    pub async fn try_changes_async<T, E, F, Fut>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(Change) -> Fut,
        Fut: Future<Output = ChangeResult<T, E>>,
    {
        let token = self.change();
        let result = f(token.nested()).await;
        settle_change(token, result)
    }

    /// Suspendable form of [`Versioned::try_updates`].
    pub async fn try_updates_async<T, E, F, Fut>(&self, f: F) -> Result<Option<T>, E>
    where
        F: FnOnce(Change) -> Fut,
        Fut: Future<Output = UpdateResult<T, E>>,
    {
        let token = self.change();
        let result = f(token.nested()).await;
        settle_update(token, result)
    }

    /// Marks an operation as non-mutating. Documentation and symmetry
    /// only: the body runs unwrapped and the version cannot move through
    /// this call.
    pub fn waits<T, F: FnOnce() -> T>(&self, f: F) -> T {
        f()
    }

    /// Suspendable form of [`Versioned::waits`].
    pub async fn waits_async<T, Fut: Future<Output = T>>(&self, fut: Fut) -> T {
        fut.await
    }
}

impl Default for Versioned {
    fn default() -> Self {
        Self::new()
    }
}

/// A clone aliases the same object: same identity, same version, same
/// fields.
impl Clone for Versioned {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

/// Identity equality: two handles are equal iff they alias one instance.
/// Field values never make two distinct instances equal.
impl PartialEq for Versioned {
    fn eq(&self, other: &Self) -> bool {
        self.core.id == other.core.id
    }
}

impl Eq for Versioned {}

/// Mixes identity and version: the hash moves with every commit. See the
/// type-level hazard note.
impl Hash for Versioned {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.core.id.hash(state);
        self.version().hash(state);
    }
}

impl fmt::Debug for Versioned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Versioned")
            .field("id", &self.core.id)
            .field("version", &self.version())
            .finish()
    }
}
