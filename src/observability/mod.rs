//! Observability for change tracking
//!
//! This module provides:
//! - Structured logging (JSON, one line per event)
//! - Typed scope lifecycle events
//! - Per-object change metrics
//!
//! # Principles
//!
//! 1. Observability is read-only: no side effects on tracking semantics
//! 2. No async or background threads
//! 3. Deterministic output (stable key ordering)
//! 4. Silent by default: the severity gate starts at `Warn`, so routine
//!    scope lifecycle events cost one atomic load and nothing else
//!
//! # Usage
//!
//! ```
//! use verstate::observability::{Logger, Severity};
//!
//! // Opt in to scope lifecycle events
//! Logger::set_max_severity(Severity::Trace);
//! Logger::info("TRACKING_ENABLED", &[("objects", "1")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{ChangeMetrics, MetricsSnapshot};
