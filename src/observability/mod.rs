//! Observability subsystem
//!
//! - Structured logging (JSON lines)
//! - Typed lifecycle events for partition transitions
//!
//! Observability is read-only: it never changes what a transition does.
//!
//! ```ignore
//! use aeropart::observability::{Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Trace);
//! Logger::info("plan.loaded", &[("partition_id", "1")]);
//! ```

mod events;
mod logger;

pub use events::TransitionEvent;
pub use logger::{Logger, Severity};

#[cfg(test)]
pub(crate) use logger::{start_capture, take_captured};
