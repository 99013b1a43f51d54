//! Simulation plan configuration
//!
//! A plan is a JSON document describing one partition: its leader and
//! follower chains of scripted steps and the sequence of roles to request.
//!
//! ```json
//! {
//!   "partition_id": 1,
//!   "log_level": "info",
//!   "leader_steps": [{ "name": "LogStream" }, { "name": "Snapshot", "fail_open": true }],
//!   "follower_steps": [{ "name": "LogStream", "delay_ms": 10 }],
//!   "roles": ["leader", "follower", "inactive"]
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::Severity;
use crate::partition::PartitionRole;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The plan file could not be read
    #[error("failed to read plan: {0}")]
    Read(#[from] std::io::Error),

    /// The plan file is not valid JSON for a plan
    #[error("invalid plan JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The plan parsed but breaks a rule
    #[error("invalid plan: {0}")]
    Invalid(String),
}

/// One scripted step of a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSpec {
    /// Step name (required, unique within its chain)
    pub name: String,

    /// Fail the first open (default: false)
    #[serde(default)]
    pub fail_open: bool,

    /// Fail the first close (default: false)
    #[serde(default)]
    pub fail_close: bool,

    /// Time spent in each open and close, in milliseconds (default: 0)
    #[serde(default)]
    pub delay_ms: u64,
}

/// Plan file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Partition identifier (required)
    pub partition_id: u32,

    /// Minimum log level (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Steps installed for the leader role, in order
    #[serde(default)]
    pub leader_steps: Vec<StepSpec>,

    /// Steps installed for the follower role, in order
    #[serde(default)]
    pub follower_steps: Vec<StepSpec>,

    /// Roles to request, in order (required, non-empty)
    pub roles: Vec<PartitionRole>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl PlanConfig {
    /// Load and validate a plan from file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate a plan from a JSON string.
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let plan: PlanConfig = serde_json::from_str(content)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Validate the plan.
    ///
    /// - `roles` must not be empty
    /// - step names must be non-empty and unique within a chain
    /// - `log_level` must be a known severity
    pub fn validate(&self) -> ConfigResult<()> {
        if self.roles.is_empty() {
            return Err(ConfigError::Invalid(
                "roles must list at least one role".to_string(),
            ));
        }

        validate_chain("leader_steps", &self.leader_steps)?;
        validate_chain("follower_steps", &self.follower_steps)?;

        self.severity()?;
        Ok(())
    }

    /// Minimum log severity requested by the plan
    pub fn severity(&self) -> ConfigResult<Severity> {
        self.log_level.parse().map_err(ConfigError::Invalid)
    }
}

fn validate_chain(field: &str, steps: &[StepSpec]) -> ConfigResult<()> {
    let mut seen = HashSet::new();
    for step in steps {
        if step.name.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "{} contains a step with an empty name",
                field
            )));
        }
        if !seen.insert(step.name.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "{} contains step '{}' more than once",
                field, step.name
            )));
        }
    }
    Ok(())
}
