//! aeropart - partition role-transition orchestrator
//!
//! Drives a replicated partition through Leader, Follower and Inactive roles
//! by opening and closing ordered lifecycle steps.
//!
//! - `partition`: steps, chains, the opened-step log and the orchestrator
//! - `observability`: structured JSON logging of transition events
//! - `config`: JSON simulation plans
//! - `simulation`: scripted steps for plans and tests
//! - `cli`: the `aeropart` command line

pub mod cli;
pub mod config;
pub mod observability;
pub mod partition;
pub mod simulation;

pub use partition::{
    PartitionContext, PartitionRole, RoleState, Step, StepChains, StepError, StepFuture,
    StepPanic, TransitionError, TransitionHandle, TransitionOrchestrator, TransitionResult,
};
