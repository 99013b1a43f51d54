//! CLI command implementations
//!
//! - `check` validates a plan and describes it
//! - `simulate` drives a partition through the plan's roles with scripted
//!   steps, reporting every transition as one JSON line

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use crate::config::PlanConfig;
use crate::observability::Logger;
use crate::partition::{PartitionRole, TransitionOrchestrator, TransitionResult};
use crate::simulation::{chains_from_plan, SimulationContext};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{write_line, write_response};

/// Outcome of one requested transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionReport {
    /// Requested role
    pub role: PartitionRole,
    /// "completed" or "failed"
    pub outcome: &'static str,
    /// Error code, if the transition failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    /// Error message, if the transition failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Open steps once the transition settled
    pub opened_steps: Vec<String>,
    /// Role state once the transition settled
    pub state: &'static str,
}

/// Result of a whole simulation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationSummary {
    /// Partition driven by the plan
    pub partition_id: u32,
    /// One report per requested role, in request order
    pub transitions: Vec<TransitionReport>,
    /// Outcome of the final teardown
    pub shutdown: TransitionReport,
    /// Number of failed transitions, shutdown included
    pub failures: usize,
    /// Role state after shutdown
    pub final_state: &'static str,
    /// Steps still open after shutdown
    pub remaining_steps: Vec<String>,
}

/// Main CLI entry point
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Check { plan } => check(&plan),
        Command::Simulate { plan } => simulate(&plan),
    }
}

/// Validate a plan and print its shape.
pub fn check(plan_path: &Path) -> CliResult<()> {
    let plan = PlanConfig::load(plan_path)?;

    write_response(json!({
        "partition_id": plan.partition_id,
        "leader_steps": plan.leader_steps.len(),
        "follower_steps": plan.follower_steps.len(),
        "roles": plan.roles,
    }))
}

/// Run a plan and print one report per transition, then a summary.
pub fn simulate(plan_path: &Path) -> CliResult<()> {
    let plan = PlanConfig::load(plan_path)?;
    Logger::set_min_severity(plan.severity()?);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::runtime_error(format!("Failed to create tokio runtime: {}", e)))?;

    let summary = rt.block_on(run_plan(&plan));

    for report in summary.transitions.iter().chain(std::iter::once(&summary.shutdown)) {
        write_line(report)?;
    }
    write_response(serde_json::to_value(&summary)?)
}

/// Drive an orchestrator through every role of the plan, then shut it down.
///
/// Each role is awaited before the next is requested, so reports reflect
/// the state right after that transition.
pub async fn run_plan(plan: &PlanConfig) -> SimulationSummary {
    let context = Arc::new(SimulationContext::new(plan.partition_id));
    let orchestrator = TransitionOrchestrator::new(context, chains_from_plan(plan));

    let mut transitions = Vec::with_capacity(plan.roles.len());
    for role in &plan.roles {
        let result = orchestrator.request(*role).await;
        transitions.push(report(&orchestrator, *role, &result));
    }

    // a failed teardown leaves steps open; the report and remaining_steps show which
    let result = orchestrator.shutdown().await;
    let shutdown = report(&orchestrator, PartitionRole::Inactive, &result);

    let failures = transitions
        .iter()
        .chain(std::iter::once(&shutdown))
        .filter(|t| t.outcome == "failed")
        .count();

    SimulationSummary {
        partition_id: plan.partition_id,
        transitions,
        shutdown,
        failures,
        final_state: orchestrator.role().state_name(),
        remaining_steps: orchestrator.opened_steps(),
    }
}

fn report(
    orchestrator: &TransitionOrchestrator<SimulationContext>,
    role: PartitionRole,
    result: &TransitionResult<()>,
) -> TransitionReport {
    let (code, error) = match result {
        Ok(()) => (None, None),
        Err(err) => (Some(err.code()), Some(err.to_string())),
    };
    TransitionReport {
        role,
        outcome: if result.is_ok() { "completed" } else { "failed" },
        code,
        error,
        opened_steps: orchestrator.opened_steps(),
        state: orchestrator.role().state_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_plan_round_trip() {
        let plan = PlanConfig::from_json(
            r#"{
                "partition_id": 2,
                "leader_steps": [{ "name": "A" }, { "name": "B" }],
                "follower_steps": [{ "name": "X" }],
                "roles": ["leader", "follower", "inactive"]
            }"#,
        )
        .unwrap();

        let summary = run_plan(&plan).await;

        assert_eq!(summary.failures, 0);
        assert_eq!(summary.transitions[0].opened_steps, vec!["A", "B"]);
        assert_eq!(summary.transitions[0].state, "leader");
        assert_eq!(summary.transitions[1].opened_steps, vec!["X"]);
        assert_eq!(summary.transitions[1].state, "follower");
        assert!(summary.transitions[2].opened_steps.is_empty());
        assert_eq!(summary.final_state, "inactive");
    }

    #[tokio::test]
    async fn test_run_plan_reports_failure_and_recovers() {
        let plan = PlanConfig::from_json(
            r#"{
                "partition_id": 2,
                "leader_steps": [{ "name": "A" }, { "name": "B", "fail_open": true }, { "name": "C" }],
                "roles": ["leader", "leader"]
            }"#,
        )
        .unwrap();

        let summary = run_plan(&plan).await;

        let first = &summary.transitions[0];
        assert_eq!(first.outcome, "failed");
        assert_eq!(first.code, Some("STEP_OPEN_FAILURE"));
        assert_eq!(first.opened_steps, vec!["A"]);
        assert_eq!(first.state, "transitioning");

        // B fails only once, so the retry closes A and installs the full chain
        let second = &summary.transitions[1];
        assert_eq!(second.outcome, "completed");
        assert_eq!(second.opened_steps, vec!["A", "B", "C"]);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.shutdown.outcome, "completed");
        assert!(summary.remaining_steps.is_empty());
    }

    #[tokio::test]
    async fn test_run_plan_reports_failed_shutdown() {
        let plan = PlanConfig::from_json(
            r#"{
                "partition_id": 3,
                "leader_steps": [{ "name": "A" }, { "name": "B", "fail_close": true }],
                "roles": ["leader"]
            }"#,
        )
        .unwrap();

        let summary = run_plan(&plan).await;

        assert_eq!(summary.transitions[0].outcome, "completed");
        let shutdown = &summary.shutdown;
        assert_eq!(shutdown.role, PartitionRole::Inactive);
        assert_eq!(shutdown.outcome, "failed");
        assert_eq!(shutdown.code, Some("STEP_CLOSE_FAILURE"));
        assert!(shutdown.error.as_deref().unwrap().contains("'B'"));
        assert_eq!(shutdown.opened_steps, vec!["A", "B"]);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.final_state, "transitioning");
        assert_eq!(summary.remaining_steps, vec!["A", "B"]);
    }

    #[test]
    fn test_report_serialization_skips_empty_error() {
        let report = TransitionReport {
            role: PartitionRole::Leader,
            outcome: "completed",
            code: None,
            error: None,
            opened_steps: vec!["A".to_string()],
            state: "leader",
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["role"], "leader");
        assert!(value.get("error").is_none());
    }
}
