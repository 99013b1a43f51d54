//! Partition Transition Orchestrator
//!
//! Drives one partition through role changes:
//! 1. close every opened step, last opened first
//! 2. open the target role's chain, in order
//! 3. resolve the caller's handle with success or the first failure
//!
//! Requests from every entry point, shutdown included, go through one FIFO
//! queue drained by a single worker task. Transitions therefore never overlap
//! and run in call order. The opened-step log and role state sit behind a
//! mutex that is never held across an await.
//!
//! Failures are not compensated: steps opened before a failing step stay in
//! the log and are closed by the next transition. A step that panics fails
//! like any other step; the worker survives it.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use std::time::Instant;

use futures_util::FutureExt;
use tokio::sync::{mpsc, oneshot};

use super::chain::StepChains;
use super::context::PartitionContext;
use super::errors::{StepError, StepPanic, TransitionError, TransitionResult};
use super::opened::OpenedStepLog;
use super::role::{PartitionRole, RoleState};
use super::step::StepFuture;
use crate::observability::TransitionEvent;

/// Completion handle for a requested transition.
///
/// Resolves once the transition has settled. Dropping the handle does not
/// cancel the transition.
#[derive(Debug)]
#[must_use = "a transition handle reports whether the role change succeeded"]
pub struct TransitionHandle {
    receiver: oneshot::Receiver<TransitionResult<()>>,
}

impl Future for TransitionHandle {
    type Output = TransitionResult<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // a dropped sender means the worker stopped before serving the request
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(TransitionError::Closed)))
    }
}

enum Request {
    Transition {
        target: PartitionRole,
        done: oneshot::Sender<TransitionResult<()>>,
    },
    Shutdown {
        done: oneshot::Sender<TransitionResult<()>>,
    },
}

/// State shared between the worker and observers
struct PartitionState<C> {
    opened: OpenedStepLog<C>,
    role: RoleState,
}

type SharedState<C> = Arc<Mutex<PartitionState<C>>>;

fn lock<C>(state: &Mutex<PartitionState<C>>) -> MutexGuard<'_, PartitionState<C>> {
    // steps never run under the lock, so a poisoned guard still holds a consistent log
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Orchestrates role transitions for a single partition.
///
/// Cheap to clone; all clones feed the same transition queue.
pub struct TransitionOrchestrator<C: PartitionContext> {
    partition_id: u32,
    requests: mpsc::UnboundedSender<Request>,
    state: SharedState<C>,
}

impl<C: PartitionContext> Clone for TransitionOrchestrator<C> {
    fn clone(&self) -> Self {
        Self {
            partition_id: self.partition_id,
            requests: self.requests.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<C: PartitionContext> TransitionOrchestrator<C> {
    /// Create an orchestrator and spawn its transition worker.
    ///
    /// Must be called from within a Tokio runtime. The partition starts
    /// Inactive with nothing open.
    pub fn new(context: Arc<C>, chains: StepChains<C>) -> Self {
        let partition_id = context.partition_id();
        let state = Arc::new(Mutex::new(PartitionState {
            opened: OpenedStepLog::new(),
            role: RoleState::new(),
        }));
        let (requests, receiver) = mpsc::unbounded_channel();

        let worker = TransitionWorker {
            partition_id,
            context,
            chains,
            state: Arc::clone(&state),
        };
        tokio::spawn(worker.run(receiver));

        Self {
            partition_id,
            requests,
            state,
        }
    }

    /// Request the Leader role.
    pub fn to_leader(&self) -> TransitionHandle {
        self.request(PartitionRole::Leader)
    }

    /// Request the Follower role.
    pub fn to_follower(&self) -> TransitionHandle {
        self.request(PartitionRole::Follower)
    }

    /// Request the Inactive role: close everything, open nothing.
    pub fn to_inactive(&self) -> TransitionHandle {
        self.request(PartitionRole::Inactive)
    }

    /// Tear the partition down after every queued transition, then stop.
    ///
    /// Requests made afterwards resolve with [`TransitionError::Closed`].
    /// The worker stops even if the teardown fails: steps left open by a
    /// failed shutdown stay open and no later request can close them.
    pub fn shutdown(&self) -> TransitionHandle {
        let (done, receiver) = oneshot::channel();
        // if the worker is gone the request is dropped and the handle reports Closed
        let _ = self.requests.send(Request::Shutdown { done });
        TransitionHandle { receiver }
    }

    /// Request a transition to `target`.
    pub fn request(&self, target: PartitionRole) -> TransitionHandle {
        TransitionEvent::Requested {
            partition_id: self.partition_id,
            target: target.as_str(),
        }
        .emit();

        let (done, receiver) = oneshot::channel();
        let _ = self.requests.send(Request::Transition { target, done });
        TransitionHandle { receiver }
    }

    /// Current role state
    pub fn role(&self) -> RoleState {
        lock(&self.state).role
    }

    /// Names of the open steps, in open order
    pub fn opened_steps(&self) -> Vec<String> {
        lock(&self.state).opened.names()
    }

    /// Partition this orchestrator drives
    pub fn partition_id(&self) -> u32 {
        self.partition_id
    }

    /// Check if the worker has stopped accepting transitions.
    pub fn is_closed(&self) -> bool {
        self.requests.is_closed()
    }
}

/// Runs queued transitions one at a time
struct TransitionWorker<C: PartitionContext> {
    partition_id: u32,
    context: Arc<C>,
    chains: StepChains<C>,
    state: SharedState<C>,
}

impl<C: PartitionContext> TransitionWorker<C> {
    async fn run(self, mut requests: mpsc::UnboundedReceiver<Request>) {
        while let Some(request) = requests.recv().await {
            match request {
                Request::Transition { target, done } => {
                    let result = self.transition(target).await;
                    let _ = done.send(result);
                }
                Request::Shutdown { done } => {
                    let result = self.transition(PartitionRole::Inactive).await;
                    TransitionEvent::Shutdown {
                        partition_id: self.partition_id,
                    }
                    .emit();
                    let _ = done.send(result);
                    break;
                }
            }
        }
        // pending requests are dropped with the receiver and resolve as Closed
    }

    async fn transition(&self, target: PartitionRole) -> TransitionResult<()> {
        let started = Instant::now();
        let opened = {
            let mut state = lock(&self.state);
            state.role = state.role.begin(target);
            state.opened.len()
        };
        TransitionEvent::Started {
            partition_id: self.partition_id,
            target: target.as_str(),
            opened,
        }
        .emit();

        let result = match self.close_opened().await {
            Ok(()) => self.install(target).await,
            Err(err) => Err(err),
        };

        let elapsed_ms = started.elapsed().as_millis();
        match &result {
            Ok(()) => {
                {
                    let mut state = lock(&self.state);
                    state.role = state.role.complete();
                }
                TransitionEvent::Completed {
                    partition_id: self.partition_id,
                    target: target.as_str(),
                    elapsed_ms,
                }
                .emit();
            }
            Err(err) => TransitionEvent::Failed {
                partition_id: self.partition_id,
                target: target.as_str(),
                error: err.to_string(),
                elapsed_ms,
            }
            .emit(),
        }

        result
    }

    /// Close every opened step, last opened first, stopping at the first failure.
    async fn close_opened(&self) -> TransitionResult<()> {
        let closing = lock(&self.state).opened.closing_order();

        for step in closing {
            TransitionEvent::StepClosing {
                partition_id: self.partition_id,
                step: step.name().to_string(),
            }
            .emit();

            match guarded(|| step.close(&self.context)).await {
                Ok(()) => {
                    lock(&self.state).opened.record_closed(&step);
                    TransitionEvent::StepClosed {
                        partition_id: self.partition_id,
                        step: step.name().to_string(),
                    }
                    .emit();
                }
                Err(source) => {
                    TransitionEvent::StepCloseFailed {
                        partition_id: self.partition_id,
                        step: step.name().to_string(),
                        error: source.to_string(),
                    }
                    .emit();
                    return Err(TransitionError::close_failed(step.name(), source));
                }
            }
        }

        Ok(())
    }

    /// Open the target chain in order, stopping at the first failure.
    async fn install(&self, target: PartitionRole) -> TransitionResult<()> {
        let chain = self.chains.for_role(target);

        for step in chain.steps() {
            TransitionEvent::StepOpening {
                partition_id: self.partition_id,
                step: step.name().to_string(),
            }
            .emit();

            match guarded(|| step.open(&self.context)).await {
                Ok(()) => {
                    lock(&self.state).opened.record_opened(Arc::clone(step));
                    TransitionEvent::StepOpened {
                        partition_id: self.partition_id,
                        step: step.name().to_string(),
                    }
                    .emit();
                }
                Err(source) => {
                    TransitionEvent::StepOpenFailed {
                        partition_id: self.partition_id,
                        step: step.name().to_string(),
                        error: source.to_string(),
                    }
                    .emit();
                    return Err(TransitionError::open_failed(step.name(), source));
                }
            }
        }

        Ok(())
    }
}

/// Run one step call, turning a panic into that step's error.
///
/// The call is made inside the guarded future so a panic raised before the
/// step returns its future is caught too.
async fn guarded<'a, F>(call: F) -> Result<(), StepError>
where
    F: FnOnce() -> StepFuture<'a>,
{
    match AssertUnwindSafe(async move { call().await })
        .catch_unwind()
        .await
    {
        Ok(result) => result,
        Err(payload) => Err(Box::new(StepPanic::from_payload(payload))),
    }
}
