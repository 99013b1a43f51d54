//! Transition Ordering Tests
//!
//! - Install opens a chain in order
//! - Teardown closes opened steps last-opened first
//! - Inactive only tears down
//! - Leader → Follower → Inactive round trip

use std::sync::Arc;

use aeropart::partition::{PartitionRole, RoleState, StepChains, TransitionOrchestrator};
use aeropart::simulation::{ScriptedStep, SimulationContext};

fn orchestrator(
    leader: &[&str],
    follower: &[&str],
) -> (Arc<SimulationContext>, TransitionOrchestrator<SimulationContext>) {
    let ctx = Arc::new(SimulationContext::new(1));
    let chains = StepChains::new(
        leader.iter().map(|n| ScriptedStep::new(*n).shared()).collect(),
        follower.iter().map(|n| ScriptedStep::new(*n).shared()).collect(),
    );
    let orchestrator = TransitionOrchestrator::new(Arc::clone(&ctx), chains);
    (ctx, orchestrator)
}

// =============================================================================
// Open Order
// =============================================================================

/// Install opens every step of the chain, in chain order.
#[tokio::test]
async fn test_install_opens_in_chain_order() {
    let (ctx, orchestrator) = orchestrator(&["S1", "S2", "S3", "S4"], &[]);

    orchestrator.to_leader().await.unwrap();

    assert_eq!(ctx.journal(), vec!["open:S1", "open:S2", "open:S3", "open:S4"]);
    assert_eq!(orchestrator.opened_steps(), vec!["S1", "S2", "S3", "S4"]);
    assert_eq!(orchestrator.role(), RoleState::Leader);
}

/// An empty follower chain installs trivially.
#[tokio::test]
async fn test_empty_chain_installs_trivially() {
    let (ctx, orchestrator) = orchestrator(&["A"], &[]);

    orchestrator.to_follower().await.unwrap();

    assert!(ctx.journal().is_empty());
    assert_eq!(orchestrator.role(), RoleState::Follower);
}

// =============================================================================
// Close Order (LIFO)
// =============================================================================

/// Teardown closes in reverse open order and empties the log.
#[tokio::test]
async fn test_close_is_lifo() {
    let (ctx, orchestrator) = orchestrator(&["S1", "S2", "S3"], &[]);
    orchestrator.to_leader().await.unwrap();
    ctx.take_journal();

    orchestrator.to_inactive().await.unwrap();

    assert_eq!(ctx.journal(), vec!["close:S3", "close:S2", "close:S1"]);
    assert!(orchestrator.opened_steps().is_empty());
}

/// Re-requesting the current role closes and reopens the whole chain.
#[tokio::test]
async fn test_same_role_reinstalls() {
    let (ctx, orchestrator) = orchestrator(&["A", "B"], &[]);
    orchestrator.to_leader().await.unwrap();
    ctx.take_journal();

    orchestrator.to_leader().await.unwrap();

    assert_eq!(ctx.journal(), vec!["close:B", "close:A", "open:A", "open:B"]);
    assert_eq!(orchestrator.opened_steps(), vec!["A", "B"]);
}

// =============================================================================
// Inactive
// =============================================================================

/// Inactive closes everything and opens nothing.
#[tokio::test]
async fn test_inactive_is_teardown_only() {
    let (ctx, orchestrator) = orchestrator(&["A", "B"], &["X"]);
    orchestrator.to_leader().await.unwrap();
    ctx.take_journal();

    orchestrator.to_inactive().await.unwrap();

    assert_eq!(ctx.journal(), vec!["close:B", "close:A"]);
    assert_eq!(orchestrator.role(), RoleState::Inactive);
}

/// Repeated Inactive requests on an empty log touch no step.
#[tokio::test]
async fn test_inactive_is_idempotent() {
    let (ctx, orchestrator) = orchestrator(&["A"], &["X"]);

    for _ in 0..3 {
        orchestrator.to_inactive().await.unwrap();
    }

    assert!(ctx.journal().is_empty());
    assert!(orchestrator.opened_steps().is_empty());
    assert!(orchestrator.role().is_inactive());
}

// =============================================================================
// Round Trip
// =============================================================================

/// Leader → Follower → Inactive with every transition succeeding.
#[tokio::test]
async fn test_round_trip() {
    let (ctx, orchestrator) = orchestrator(&["A", "B"], &["X", "Y"]);

    orchestrator.to_leader().await.unwrap();
    assert_eq!(orchestrator.opened_steps(), vec!["A", "B"]);
    assert_eq!(ctx.take_journal(), vec!["open:A", "open:B"]);

    orchestrator.to_follower().await.unwrap();
    assert_eq!(orchestrator.opened_steps(), vec!["X", "Y"]);
    assert_eq!(
        ctx.take_journal(),
        vec!["close:B", "close:A", "open:X", "open:Y"]
    );
    assert_eq!(orchestrator.role().role(), Some(PartitionRole::Follower));

    orchestrator.to_inactive().await.unwrap();
    assert!(orchestrator.opened_steps().is_empty());
    assert_eq!(ctx.take_journal(), vec!["close:Y", "close:X"]);
    assert_eq!(orchestrator.role().role(), Some(PartitionRole::Inactive));
}

/// A step shared by both chains is closed and reopened across a role change.
#[tokio::test]
async fn test_shared_step_instance_across_chains() {
    let ctx = Arc::new(SimulationContext::new(5));
    let log_stream = ScriptedStep::new("LogStream").shared();
    let chains = StepChains::builder()
        .leader_shared(Arc::clone(&log_stream))
        .leader(ScriptedStep::new("Processor"))
        .follower_shared(log_stream)
        .build();
    let orchestrator = TransitionOrchestrator::new(Arc::clone(&ctx), chains);

    orchestrator.to_leader().await.unwrap();
    orchestrator.to_follower().await.unwrap();

    assert_eq!(
        ctx.journal(),
        vec![
            "open:LogStream",
            "open:Processor",
            "close:Processor",
            "close:LogStream",
            "open:LogStream",
        ]
    );
    assert_eq!(orchestrator.opened_steps(), vec!["LogStream"]);
    assert_eq!(orchestrator.partition_id(), 5);
}
