//! Opened Step Log
//!
//! Steps currently open, in the order they were opened.
//! Doubles as the undo log for teardown: closing walks a reversed snapshot
//! and removes each step from the live log as soon as it closes, so a later
//! close resumes where a failed one stopped.

use std::fmt;
use std::sync::Arc;

use super::step::SharedStep;

/// Ordered record of open steps
pub struct OpenedStepLog<C> {
    steps: Vec<SharedStep<C>>,
}

impl<C> OpenedStepLog<C> {
    /// Create an empty log
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Record a step that opened successfully.
    pub fn record_opened(&mut self, step: SharedStep<C>) {
        self.steps.push(step);
    }

    /// Remove a step that closed successfully.
    ///
    /// Steps are matched by identity, never by name.
    /// Returns false if the step was not in the log.
    pub fn record_closed(&mut self, step: &SharedStep<C>) -> bool {
        match self.steps.iter().position(|s| Arc::ptr_eq(s, step)) {
            Some(index) => {
                self.steps.remove(index);
                true
            }
            None => false,
        }
    }

    /// Copy of the log in close order (last opened first)
    pub fn closing_order(&self) -> Vec<SharedStep<C>> {
        self.steps.iter().rev().cloned().collect()
    }

    /// Step names in open order
    pub fn names(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.name().to_string()).collect()
    }

    /// Number of open steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if no step is open.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<C> Default for OpenedStepLog<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for OpenedStepLog<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.steps.iter().map(|s| s.name())).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::step::{Step, StepFuture};

    struct Named(&'static str);

    impl Step<()> for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn open<'a>(&'a self, _ctx: &'a ()) -> StepFuture<'a> {
            Box::pin(async { Ok(()) })
        }

        fn close<'a>(&'a self, _ctx: &'a ()) -> StepFuture<'a> {
            Box::pin(async { Ok(()) })
        }
    }

    fn step(name: &'static str) -> SharedStep<()> {
        Arc::new(Named(name))
    }

    #[test]
    fn test_closing_order_is_reversed() {
        let mut log = OpenedStepLog::new();
        log.record_opened(step("A"));
        log.record_opened(step("B"));
        log.record_opened(step("C"));

        let names: Vec<_> = log.closing_order().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, vec!["C", "B", "A"]);
        // snapshot does not drain the live log
        assert_eq!(log.names(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_record_closed_matches_identity_not_name() {
        let first = step("Same");
        let second = step("Same");
        let mut log = OpenedStepLog::new();
        log.record_opened(Arc::clone(&first));
        log.record_opened(Arc::clone(&second));

        assert!(log.record_closed(&second));
        assert_eq!(log.len(), 1);
        assert!(Arc::ptr_eq(&log.closing_order()[0], &first));
    }

    #[test]
    fn test_record_closed_unknown_step() {
        let mut log = OpenedStepLog::new();
        log.record_opened(step("A"));

        assert!(!log.record_closed(&step("A")));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_empty_log() {
        let log: OpenedStepLog<()> = OpenedStepLog::default();
        assert!(log.is_empty());
        assert!(log.closing_order().is_empty());
        assert_eq!(format!("{:?}", log), "[]");
    }
}
