//! Partition Transition Error Types
//!
//! A failure inside one step aborts the phase it happened in and is handed to
//! the caller verbatim, wrapped with the failing step's name.
//! Nothing here is fatal: every error is reported through the completion handle.

use thiserror::Error;

/// Error produced by a step's own `open` or `close`.
pub type StepError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A step panicked inside `open` or `close`.
///
/// Reported as the step's own error so the worker keeps running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("step panicked: {message}")]
pub struct StepPanic {
    /// Panic payload, when it was a string
    pub message: String,
}

impl StepPanic {
    /// Build from a payload caught by `catch_unwind`.
    pub fn from_payload(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(message) => (*message).to_string(),
                Err(_) => "non-string panic payload".to_string(),
            },
        };
        Self { message }
    }
}

/// Result type for partition transitions
pub type TransitionResult<T> = Result<T, TransitionError>;

/// Partition transition errors
#[derive(Debug, Error)]
pub enum TransitionError {
    /// A step failed to open while installing the target role
    #[error("failed to open step '{step}': {source}")]
    StepOpenFailure {
        /// Name of the failing step
        step: String,
        /// Error returned by the step
        #[source]
        source: StepError,
    },

    /// A step failed to close while tearing down the current role
    #[error("failed to close step '{step}': {source}")]
    StepCloseFailure {
        /// Name of the failing step
        step: String,
        /// Error returned by the step
        #[source]
        source: StepError,
    },

    /// The orchestrator was shut down and accepts no more transitions
    #[error("partition transition orchestrator is closed")]
    Closed,
}

impl TransitionError {
    /// Create an open failure for the named step.
    pub fn open_failed(step: impl Into<String>, source: StepError) -> Self {
        Self::StepOpenFailure {
            step: step.into(),
            source,
        }
    }

    /// Create a close failure for the named step.
    pub fn close_failed(step: impl Into<String>, source: StepError) -> Self {
        Self::StepCloseFailure {
            step: step.into(),
            source,
        }
    }

    /// Name of the step that failed, if the error came from a step.
    pub fn step_name(&self) -> Option<&str> {
        match self {
            Self::StepOpenFailure { step, .. } | Self::StepCloseFailure { step, .. } => Some(step),
            Self::Closed => None,
        }
    }

    /// Check if this error was raised by a step.
    pub fn is_step_failure(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Stable code for reports and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::StepOpenFailure { .. } => "STEP_OPEN_FAILURE",
            Self::StepCloseFailure { .. } => "STEP_CLOSE_FAILURE",
            Self::Closed => "ORCHESTRATOR_CLOSED",
        }
    }
}
