//! Version numbers and counters
//!
//! This module provides:
//! - `Version` - Totally ordered version number of a trackable object
//! - `VersionCounter` - Per-object monotonic counter behind the commit step
//!
//! Invariants:
//! - A version number is opaque: callers compare and serialize it, they do
//!   not construct intermediate values
//! - A counter never decreases and moves by exactly one per committed scope
//! - Only the scope commit path may advance a counter

mod counter;
mod number;

pub use counter::VersionCounter;
pub use number::Version;
