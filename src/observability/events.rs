//! Partition transition lifecycle events
//!
//! Events are explicit and typed. Each one maps to a stable dotted name,
//! a severity and a fixed set of fields; `emit` writes it through the
//! structured logger.

use super::logger::{Logger, Severity};

/// Observable events of the transition orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionEvent {
    /// A role change was requested and queued
    Requested { partition_id: u32, target: &'static str },

    /// A queued transition started its close phase
    Started {
        partition_id: u32,
        target: &'static str,
        opened: usize,
    },

    /// Every step of the target role is open
    Completed {
        partition_id: u32,
        target: &'static str,
        elapsed_ms: u128,
    },

    /// The transition stopped at a failing step
    Failed {
        partition_id: u32,
        target: &'static str,
        error: String,
        elapsed_ms: u128,
    },

    /// A step is about to close
    StepClosing { partition_id: u32, step: String },

    /// A step closed and left the opened-step log
    StepClosed { partition_id: u32, step: String },

    /// A step failed to close; teardown stops here
    StepCloseFailed {
        partition_id: u32,
        step: String,
        error: String,
    },

    /// A step is about to open
    StepOpening { partition_id: u32, step: String },

    /// A step opened and joined the opened-step log
    StepOpened { partition_id: u32, step: String },

    /// A step failed to open; install stops here
    StepOpenFailed {
        partition_id: u32,
        step: String,
        error: String,
    },

    /// The orchestrator stopped accepting transitions
    Shutdown { partition_id: u32 },
}

impl TransitionEvent {
    /// Get the event name for logging.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Requested { .. } => "partition.transition.requested",
            Self::Started { .. } => "partition.transition.started",
            Self::Completed { .. } => "partition.transition.completed",
            Self::Failed { .. } => "partition.transition.failed",
            Self::StepClosing { .. } => "partition.step.closing",
            Self::StepClosed { .. } => "partition.step.closed",
            Self::StepCloseFailed { .. } => "partition.step.close_failed",
            Self::StepOpening { .. } => "partition.step.opening",
            Self::StepOpened { .. } => "partition.step.opened",
            Self::StepOpenFailed { .. } => "partition.step.open_failed",
            Self::Shutdown { .. } => "partition.orchestrator.shutdown",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Self::Failed { .. } | Self::StepCloseFailed { .. } | Self::StepOpenFailed { .. } => {
                Severity::Error
            }
            Self::Started { .. } | Self::Completed { .. } | Self::Shutdown { .. } => {
                Severity::Info
            }
            Self::Requested { .. }
            | Self::StepClosing { .. }
            | Self::StepClosed { .. }
            | Self::StepOpening { .. }
            | Self::StepOpened { .. } => Severity::Trace,
        }
    }

    /// Partition the event belongs to
    pub fn partition_id(&self) -> u32 {
        match self {
            Self::Requested { partition_id, .. }
            | Self::Started { partition_id, .. }
            | Self::Completed { partition_id, .. }
            | Self::Failed { partition_id, .. }
            | Self::StepClosing { partition_id, .. }
            | Self::StepClosed { partition_id, .. }
            | Self::StepCloseFailed { partition_id, .. }
            | Self::StepOpening { partition_id, .. }
            | Self::StepOpened { partition_id, .. }
            | Self::StepOpenFailed { partition_id, .. }
            | Self::Shutdown { partition_id } => *partition_id,
        }
    }

    /// Fields written with the event, `partition_id` first.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("partition_id", self.partition_id().to_string())];
        match self {
            Self::Requested { target, .. } => fields.push(("target", target.to_string())),
            Self::Started { target, opened, .. } => {
                fields.push(("target", target.to_string()));
                fields.push(("opened", opened.to_string()));
            }
            Self::Completed {
                target, elapsed_ms, ..
            } => {
                fields.push(("target", target.to_string()));
                fields.push(("elapsed_ms", elapsed_ms.to_string()));
            }
            Self::Failed {
                target,
                error,
                elapsed_ms,
                ..
            } => {
                fields.push(("target", target.to_string()));
                fields.push(("error", error.clone()));
                fields.push(("elapsed_ms", elapsed_ms.to_string()));
            }
            Self::StepClosing { step, .. }
            | Self::StepClosed { step, .. }
            | Self::StepOpening { step, .. }
            | Self::StepOpened { step, .. } => fields.push(("step", step.clone())),
            Self::StepCloseFailed { step, error, .. } | Self::StepOpenFailed { step, error, .. } => {
                fields.push(("step", step.clone()));
                fields.push(("error", error.clone()));
            }
            Self::Shutdown { .. } => {}
        }
        fields
    }

    /// Write the event through the logger.
    pub fn emit(&self) {
        let severity = self.severity();
        if !Logger::enabled(severity) {
            return;
        }
        let fields = self.fields();
        let refs: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        match severity {
            Severity::Trace => Logger::trace(self.event_name(), &refs),
            Severity::Info => Logger::info(self.event_name(), &refs),
            Severity::Error => Logger::error(self.event_name(), &refs),
            other => Logger::log(other, self.event_name(), &refs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_stable() {
        let closing = TransitionEvent::StepClosing {
            partition_id: 1,
            step: "LogStream".to_string(),
        };
        assert_eq!(closing.event_name(), "partition.step.closing");

        let shutdown = TransitionEvent::Shutdown { partition_id: 1 };
        assert_eq!(shutdown.event_name(), "partition.orchestrator.shutdown");
    }

    #[test]
    fn test_failures_are_errors() {
        let failed = TransitionEvent::StepOpenFailed {
            partition_id: 2,
            step: "B".to_string(),
            error: "boom".to_string(),
        };
        assert_eq!(failed.severity(), Severity::Error);

        let opened = TransitionEvent::StepOpened {
            partition_id: 2,
            step: "A".to_string(),
        };
        assert_eq!(opened.severity(), Severity::Trace);
    }

    #[test]
    fn test_fields_carry_partition_and_step() {
        let event = TransitionEvent::StepCloseFailed {
            partition_id: 9,
            step: "Snapshot".to_string(),
            error: "busy".to_string(),
        };

        assert_eq!(
            event.fields(),
            vec![
                ("partition_id", "9".to_string()),
                ("step", "Snapshot".to_string()),
                ("error", "busy".to_string()),
            ]
        );
    }

    #[test]
    fn test_emit_writes_one_line_with_fields() {
        crate::observability::start_capture();
        TransitionEvent::Started {
            partition_id: 1,
            target: "leader",
            opened: 2,
        }
        .emit();
        let lines = crate::observability::take_captured();

        assert_eq!(lines.len(), 1);
        let parsed: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(parsed["event"], "partition.transition.started");
        assert_eq!(parsed["severity"], "INFO");
        assert_eq!(parsed["partition_id"], "1");
        assert_eq!(parsed["target"], "leader");
        assert_eq!(parsed["opened"], "2");
    }
}
