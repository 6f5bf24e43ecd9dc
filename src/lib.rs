//! verstate - A strict, thread-safe mutation-tracking primitive
//!
//! Every trackable object carries a monotonically increasing version that
//! advances exactly once per committed mutation scope, no matter how many
//! tracked fields changed inside the scope or how deeply mutating
//! operations nested. A scope can be aborted cooperatively: side effects
//! are kept, the version advance is suppressed, and the signal never
//! reaches the caller.
//!
//! ```
//! use verstate::field::Field;
//! use verstate::scope::AbortChange;
//! use verstate::tracked::Versioned;
//! use verstate::version::Version;
//!
//! static VALUE: Field<i64> = Field::new("value", || 0);
//!
//! let obj = Versioned::new();
//! assert_eq!(obj.version(), Version::ZERO);
//!
//! // A changing write commits one scope.
//! obj.set(&VALUE, 5);
//! assert_eq!(obj.version(), Version::new(1));
//!
//! // An equal write is a no-op.
//! obj.set(&VALUE, 5);
//! assert_eq!(obj.version(), Version::new(1));
//!
//! // A wrapped operation batches writes into one advance. If it aborts,
//! // the payload becomes the result and the version stays put.
//! let result = obj.changes(|cx| {
//!     cx.set(&VALUE, -1);
//!     Err(AbortChange("discarded"))
//! });
//! assert_eq!(result, "discarded");
//! assert_eq!(obj.version(), Version::new(1));
//! assert_eq!(obj.get(&VALUE), -1); // side effects are kept
//! ```

pub mod field;
pub mod observability;
pub mod scope;
pub mod tracked;
pub mod version;

pub use field::Field;
pub use scope::{AbortChange, AbortUpdate, ChangeError, ChangeScope, UpdateError};
pub use tracked::{Change, Trackable, Versioned};
pub use version::{Version, VersionCounter};
