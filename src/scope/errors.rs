//! # Abort signals and wrapper error channels
//!
//! Two signal flavors share one control contract: raised anywhere inside a
//! mutation scope, they are consumed by the nearest enclosing wrapper on
//! the same object, the pending commit is skipped, and nothing propagates
//! to the caller. They differ only in what the wrapped operation resolves
//! to: `AbortChange` carries the result, `AbortUpdate` resolves to nothing.
//!
//! Anything that is not a signal passes through the scope unchanged.

use std::convert::Infallible;

use thiserror::Error;

/// Result type for `try_changes` operations
pub type ChangeResult<T, E = Infallible> = Result<T, ChangeError<T, E>>;

/// Result type for `try_updates` operations
pub type UpdateResult<T, E = Infallible> = Result<T, UpdateError<E>>;

/// Cooperative abort signal that carries the operation's result.
///
/// Returning `Err(AbortChange(payload))` from a `changes` body skips the
/// version commit; the wrapper resolves to `payload`. Field writes already
/// performed are kept: an abort cancels the commit, not the side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("change aborted")]
pub struct AbortChange<T = ()>(pub T);

/// Cooperative abort signal with no payload.
///
/// Returning `Err(AbortUpdate)` from an `updates` body skips the version
/// commit; the wrapper resolves to `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Error)]
#[error("update aborted")]
pub struct AbortUpdate;

/// Error channel of a `try_changes` operation
///
/// `Other` is transparent pass-through: the `From` impl lets `?` lift any
/// host error into the scope, and the wrapper re-raises it unchanged after
/// bookkeeping cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChangeError<T, E = Infallible> {
    /// Consumed by the wrapper; the payload becomes the result
    #[error("change aborted")]
    Abort(AbortChange<T>),

    /// Propagates past the scope unchanged; no commit
    #[error("{0}")]
    Other(E),
}

impl<T, E> ChangeError<T, E> {
    /// Signal an abort resolving the operation to `payload`.
    pub fn abort(payload: T) -> Self {
        ChangeError::Abort(AbortChange(payload))
    }
}

impl<T, E> From<E> for ChangeError<T, E> {
    fn from(error: E) -> Self {
        ChangeError::Other(error)
    }
}

/// Error channel of a `try_updates` operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UpdateError<E = Infallible> {
    /// Consumed by the wrapper; the operation resolves to `None`
    #[error("update aborted")]
    Abort(AbortUpdate),

    /// Propagates past the scope unchanged; no commit
    #[error("{0}")]
    Other(E),
}

impl<E> UpdateError<E> {
    /// Signal an abort resolving the operation to `None`.
    pub fn abort() -> Self {
        UpdateError::Abort(AbortUpdate)
    }
}

impl<E> From<E> for UpdateError<E> {
    fn from(error: E) -> Self {
        UpdateError::Other(error)
    }
}
