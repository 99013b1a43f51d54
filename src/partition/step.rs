//! Partition Step Trait
//!
//! A step is one lifecycle unit of a partition role: binding storage,
//! starting replication, exposing request handling and so on.
//! The orchestrator only calls `open` and `close`; whatever the step
//! acquires is owned by the step or stored in the context.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::errors::StepError;

/// Future returned by `Step::open` and `Step::close`
pub type StepFuture<'a> = Pin<Box<dyn Future<Output = Result<(), StepError>> + Send + 'a>>;

/// Lifecycle unit installed and torn down by the transition orchestrator.
///
/// `C` is the partition context shared by every step of every transition.
/// The name is for diagnostics only; the orchestrator never compares steps by name.
pub trait Step<C>: Send + Sync {
    /// Diagnostic name of this step
    fn name(&self) -> &str;

    /// Acquire the resources of this step
    fn open<'a>(&'a self, ctx: &'a C) -> StepFuture<'a>;

    /// Release the resources of this step
    fn close<'a>(&'a self, ctx: &'a C) -> StepFuture<'a>;
}

/// Shared handle to a step, as stored in chains and the opened-step log
pub type SharedStep<C> = Arc<dyn Step<C>>;
