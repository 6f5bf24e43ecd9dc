//! Change - The mutation-scope token
//!
//! Obtained from `Versioned::change()` (top level) or `Change::nested()`.
//! A token must be settled on every exit path:
//! - `commit()` - normal exit; the outermost token advances the version
//! - `abort()` - cooperative abort; no advance, side effects kept
//! - drop without settling - error path; no advance
//!
//! Only depth-0 tokens touch the scope ledger and the counter. Nested
//! tokens exist so that inner operations compose: their commit and abort
//! are version no-ops, which is exactly the reentrancy rule: one commit
//! per outermost scope.
//!
//! The token is an owned value so a future can carry it across any number
//! of suspension points; the scope stays open until the token settles.

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;

use crate::field::{Field, FieldValue};
use crate::scope::{
    AbortChange, AbortUpdate, ChangeError, ChangeResult, ScopeOutcome, UpdateError, UpdateResult,
};
use crate::version::Version;

use super::handle::Core;

/// An open mutation scope on one trackable object.
#[derive(Debug)]
pub struct Change {
    core: Arc<Core>,
    depth: u32,
    settled: bool,
}

impl Change {
    /// Opens a top-level scope entry.
    pub(crate) fn top_level(core: Arc<Core>) -> Self {
        core.scope.enter();
        Self {
            core,
            depth: 0,
            settled: false,
        }
    }

    /// Opens a nested scope on the same object.
    ///
    /// Nested commit/abort never move the version; the outermost token
    /// owns the single pending increment.
    pub fn nested(&self) -> Change {
        Change {
            core: Arc::clone(&self.core),
            depth: self.depth + 1,
            settled: false,
        }
    }

    /// Reentrancy depth of this token (0 = outermost).
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Current version of the underlying object.
    #[inline]
    pub fn version(&self) -> Version {
        self.core.scope.version()
    }

    /// Settles the scope normally.
    ///
    /// Outermost: advances the version by exactly one and returns the new
    /// version. Nested: returns the current version unchanged.
    pub fn commit(mut self) -> Version {
        self.settled = true;
        if self.depth == 0 {
            self.core.scope.exit(ScopeOutcome::Committed)
        } else {
            self.core.scope.version()
        }
    }

    /// Settles the scope without committing.
    ///
    /// Field writes already performed are kept; only the version advance
    /// is suppressed.
    pub fn abort(mut self) -> Version {
        self.settled = true;
        if self.depth == 0 {
            self.core.scope.exit(ScopeOutcome::Aborted)
        } else {
            self.core.scope.version()
        }
    }

    // Tracked-field access inside the open scope.

    /// Current value of `field`.
    pub fn get<T: FieldValue>(&self, field: &'static Field<T>) -> T {
        self.core.fields.read(field)
    }

    /// Writes `field` inside this scope; no version activity of its own.
    ///
    /// Returns true when the stored value actually changed.
    pub fn set<T: FieldValue>(&self, field: &'static Field<T>, value: T) -> bool {
        let changed = self.core.fields.write(field, value);
        if !changed {
            self.core.scope.note_unchanged_write(field.name());
        }
        changed
    }

    /// Read-modify-write of `field` inside this scope, atomic with respect
    /// to other field access.
    pub fn modify<T: FieldValue, R>(
        &self,
        field: &'static Field<T>,
        f: impl FnOnce(&mut T) -> R,
    ) -> R {
        let (_, result) = self.core.fields.modify(field, f);
        result
    }

    // Nested wrappers: the nearest enclosing abort boundary for their body.

    /// Runs a nested mutating operation; aborts resolve to their payload.
    pub fn changes<T, F>(&self, f: F) -> T
    where
        F: FnOnce(Change) -> Result<T, AbortChange<T>>,
    {
        match self.try_changes::<T, Infallible, _>(|cx| f(cx).map_err(ChangeError::Abort)) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Runs a nested mutating operation; aborts resolve to `None`.
    pub fn updates<T, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(Change) -> Result<T, AbortUpdate>,
    {
        match self.try_updates::<T, Infallible, _>(|cx| f(cx).map_err(UpdateError::Abort)) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Runs a nested fallible mutating operation.
    pub fn try_changes<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(Change) -> ChangeResult<T, E>,
    {
        let token = self.nested();
        let result = f(token.nested());
        settle_change(token, result)
    }

    /// Runs a nested fallible mutating operation; aborts resolve to `None`.
    pub fn try_updates<T, E, F>(&self, f: F) -> Result<Option<T>, E>
    where
        F: FnOnce(Change) -> UpdateResult<T, E>,
    {
        let token = self.nested();
        let result = f(token.nested());
        settle_update(token, result)
    }

    /// Suspendable form of [`Change::changes`].
    pub async fn changes_async<T, F, Fut>(&self, f: F) -> T
    where
        F: FnOnce(Change) -> Fut,
        Fut: Future<Output = Result<T, AbortChange<T>>>,
    {
        let token = self.nested();
        let result = f(token.nested()).await.map_err(ChangeError::Abort);
        match settle_change::<T, Infallible>(token, result) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Suspendable form of [`Change::updates`].
    pub async fn updates_async<T, F, Fut>(&self, f: F) -> Option<T>
    where
        F: FnOnce(Change) -> Fut,
        Fut: Future<Output = Result<T, AbortUpdate>>,
    {
        let token = self.nested();
        let result = f(token.nested()).await.map_err(UpdateError::Abort);
        match settle_update::<T, Infallible>(token, result) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Suspendable form of [`Change::try_changes`].
    pub async fn try_changes_async<T, E, F, Fut>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(Change) -> Fut,
        Fut: Future<Output = ChangeResult<T, E>>,
    {
        let token = self.nested();
        let result = f(token.nested()).await;
        settle_change(token, result)
    }

    /// Suspendable form of [`Change::try_updates`].
    pub async fn try_updates_async<T, E, F, Fut>(&self, f: F) -> Result<Option<T>, E>
    where
        F: FnOnce(Change) -> Fut,
        Fut: Future<Output = UpdateResult<T, E>>,
    {
        let token = self.nested();
        let result = f(token.nested()).await;
        settle_update(token, result)
    }
}

impl Drop for Change {
    fn drop(&mut self) {
        // Unsettled drop is the error path: deregister, never commit.
        if !self.settled && self.depth == 0 {
            self.core.scope.exit(ScopeOutcome::Abandoned);
        }
    }
}

/// The one settle algorithm behind every `changes` variant.
pub(crate) fn settle_change<T, E>(token: Change, result: ChangeResult<T, E>) -> Result<T, E> {
    match result {
        Ok(value) => {
            token.commit();
            Ok(value)
        }
        Err(ChangeError::Abort(AbortChange(payload))) => {
            token.abort();
            Ok(payload)
        }
        Err(ChangeError::Other(error)) => {
            drop(token);
            Err(error)
        }
    }
}

/// The one settle algorithm behind every `updates` variant.
pub(crate) fn settle_update<T, E>(
    token: Change,
    result: UpdateResult<T, E>,
) -> Result<Option<T>, E> {
    match result {
        Ok(value) => {
            token.commit();
            Ok(Some(value))
        }
        Err(UpdateError::Abort(AbortUpdate)) => {
            token.abort();
            Ok(None)
        }
        Err(UpdateError::Other(error)) => {
            drop(token);
            Err(error)
        }
    }
}
