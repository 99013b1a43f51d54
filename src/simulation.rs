//! Scripted steps for simulations and tests.
//!
//! `ScriptedStep` records every `open`/`close` call in the context journal
//! and can be told to fail a number of times, or to take a while.
//! Plans loaded by the CLI are turned into scripted chains here.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use thiserror::Error;

use crate::config::{PlanConfig, StepSpec};
use crate::partition::{PartitionContext, SharedStep, Step, StepChains, StepError, StepFuture};

/// Context shared by scripted steps: a partition id and a call journal.
#[derive(Debug, Default)]
pub struct SimulationContext {
    partition_id: u32,
    journal: Mutex<Vec<String>>,
}

impl SimulationContext {
    /// Create a context with an empty journal
    pub fn new(partition_id: u32) -> Self {
        Self {
            partition_id,
            journal: Mutex::new(Vec::new()),
        }
    }

    /// Append an entry such as `open:A` to the journal.
    pub fn record(&self, entry: impl Into<String>) {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.into());
    }

    /// Copy of the journal
    pub fn journal(&self) -> Vec<String> {
        self.journal
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Empty the journal, returning what it held.
    pub fn take_journal(&self) -> Vec<String> {
        std::mem::take(&mut *self.journal.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl PartitionContext for SimulationContext {
    fn partition_id(&self) -> u32 {
        self.partition_id
    }
}

/// Failure injected into a scripted step
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("scripted {action} failure in step '{step}'")]
pub struct ScriptedFailure {
    /// Step that failed
    pub step: String,
    /// `open` or `close`
    pub action: &'static str,
}

/// Step that journals its calls and fails on demand
#[derive(Debug)]
pub struct ScriptedStep {
    name: String,
    open_failures: AtomicUsize,
    close_failures: AtomicUsize,
    delay: Duration,
}

impl ScriptedStep {
    /// Step that always succeeds immediately
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            open_failures: AtomicUsize::new(0),
            close_failures: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    /// Build from a plan entry.
    pub fn from_spec(spec: &StepSpec) -> Self {
        Self::new(spec.name.clone())
            .fail_open_times(usize::from(spec.fail_open))
            .fail_close_times(usize::from(spec.fail_close))
            .with_delay(Duration::from_millis(spec.delay_ms))
    }

    /// Fail the next `times` opens.
    pub fn fail_open_times(self, times: usize) -> Self {
        self.open_failures.store(times, Ordering::SeqCst);
        self
    }

    /// Fail the next `times` closes.
    pub fn fail_close_times(self, times: usize) -> Self {
        self.close_failures.store(times, Ordering::SeqCst);
        self
    }

    /// Sleep for `delay` inside every open and close.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Wrap in an `Arc` for use in chains.
    pub fn shared(self) -> SharedStep<SimulationContext> {
        Arc::new(self)
    }

    async fn run(
        &self,
        ctx: &SimulationContext,
        action: &'static str,
        failures: &AtomicUsize,
    ) -> Result<(), ScriptedFailure> {
        ctx.record(format!("{}:{}", action, self.name));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let failed = failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failed {
            return Err(ScriptedFailure {
                step: self.name.clone(),
                action,
            });
        }
        Ok(())
    }
}

impl Step<SimulationContext> for ScriptedStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn open<'a>(&'a self, ctx: &'a SimulationContext) -> StepFuture<'a> {
        Box::pin(async move {
            self.run(ctx, "open", &self.open_failures)
                .await
                .map_err(StepError::from)
        })
    }

    fn close<'a>(&'a self, ctx: &'a SimulationContext) -> StepFuture<'a> {
        Box::pin(async move {
            self.run(ctx, "close", &self.close_failures)
                .await
                .map_err(StepError::from)
        })
    }
}

/// Build scripted leader and follower chains from a plan.
pub fn chains_from_plan(plan: &PlanConfig) -> StepChains<SimulationContext> {
    StepChains::new(
        plan.leader_steps.iter().map(|s| ScriptedStep::from_spec(s).shared()).collect(),
        plan.follower_steps.iter().map(|s| ScriptedStep::from_spec(s).shared()).collect(),
    )
}
