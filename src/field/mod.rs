//! Tracked fields
//!
//! A tracked field is class-level metadata: a name plus a default-value
//! factory, declared once as a `static` and shared by every instance of
//! the owning type. The actual values live per instance in a `FieldStore`.
//!
//! Invariants:
//! - Defaults are materialized lazily, one independent value per instance;
//!   a mutable default is never shared between instances
//! - A write whose value equals the current one (by `PartialEq`) is a
//!   no-op with respect to versioning
//! - Slot access with a descriptor of the wrong type is a structural
//!   violation and panics immediately

mod descriptor;
mod store;

pub use descriptor::{Field, FieldValue};
pub(crate) use descriptor::FieldKey;
pub(crate) use store::FieldStore;
