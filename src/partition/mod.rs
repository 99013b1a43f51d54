//! Partition Role Transitions
//!
//! A partition changes role (Leader, Follower, Inactive) by closing the
//! steps of its current role and opening the steps of the next one.
//!
//! - Steps close in reverse open order and open in chain order
//! - Only one transition runs at a time, in request order
//! - The first failing step aborts the transition and is reported to the caller
//! - Partial progress is kept so the next transition resumes from it
//! - Nothing is retried or rolled back automatically

mod chain;
mod context;
mod errors;
mod opened;
mod orchestrator;
mod role;
mod step;

pub use chain::{StepChain, StepChains, StepChainsBuilder};
pub use context::PartitionContext;
pub use errors::{StepError, StepPanic, TransitionError, TransitionResult};
pub use opened::OpenedStepLog;
pub use orchestrator::{TransitionHandle, TransitionOrchestrator};
pub use role::{PartitionRole, RoleState};
pub use step::{SharedStep, Step, StepFuture};
