//! Change scopes
//!
//! A change scope brackets the region during which field writes on one
//! object are batched into a single pending version increment.
//!
//! This module provides:
//! - `ChangeScope` - Per-object scope state: entry ledger, version counter,
//!   change metrics
//! - `ScopeOutcome` - Tri-state exit: committed, aborted, abandoned
//! - Abort signals and wrapper error channels (`errors`)
//!
//! Invariants:
//! - The ledger lock is held only for entry/exit bookkeeping and the
//!   version-commit step, never across caller code
//! - Exactly one version advance per committed top-level scope
//! - Aborted and abandoned scopes never advance the version

mod change_scope;
mod errors;

pub use change_scope::{ChangeScope, ScopeOutcome};
pub use errors::{
    AbortChange, AbortUpdate, ChangeError, ChangeResult, UpdateError, UpdateResult,
};
