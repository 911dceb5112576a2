//! # Worker: the per-worker task loop.
//!
//! Each worker repeatedly takes one task from the shared task channel, applies
//! the action, and posts the outcome, until it consumes a poison pill.
//!
//! ## State machine
//! ```text
//!            ┌────────────────────────────────────────────────┐
//!            ▼                                                │
//!   CheckStop + FetchTask ──Task──► Execute ──► PostResult ───┘
//!      │           │
//!      │ stop      │ PoisonPill / channel closed
//!      ▼           ▼
//!    Drain ──► Terminated (Stopped)     Terminated (Finished)
//! ```
//!
//! - **CheckStop + FetchTask**: with stop-on-error, a biased `select!` over the
//!   stop token and the task channel (stop first); otherwise a plain read.
//! - **Drain**: after a stop, read and discard tasks until a poison pill, so
//!   every other worker still finds its own pill.
//! - **Execute**: run the action; an error or a panic becomes an
//!   [`ErrorRecord`] on the error channel (sent before the result) and a `None`
//!   result. The worker keeps going.
//! - **PostResult**: send `(task?, result)` on the result channel.
//!
//! ## Rules
//! - A running action is never interrupted; the stop signal is observed on the
//!   next loop iteration.
//! - A closed result/error channel (collector gone) is not an error; the worker
//!   keeps consuming until its pill.

use std::{panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;
use tokio::select;
use tokio_util::sync::CancellationToken;

use crate::{
    actions::Action,
    core::channels::{Envelope, KeepTask, Posted, WorkerChannels},
    error::{ActionError, ErrorRecord},
    events::{Bus, Event, EventKind},
};

/// How a worker terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WorkerExit {
    /// Consumed its poison pill.
    Finished,
    /// Observed the stop signal and drained to its poison pill.
    Stopped,
}

/// One worker of a run.
pub(crate) struct Worker<T, A>
where
    A: Action<T> + ?Sized,
{
    /// Worker name (`worker_<n>`).
    pub name: Arc<str>,
    /// Action applied to every task.
    pub action: Arc<A>,
    /// Task, result and error channel ends.
    pub channels: WorkerChannels<T, A::Output>,
    /// Stop signal (`Some` only in stop-on-error mode).
    pub stop: Option<CancellationToken>,
    /// Keeps a copy of each task for correlated results.
    pub keep_task: Option<KeepTask<T>>,
    /// Event bus.
    pub bus: Bus,
}

impl<T, A> Worker<T, A>
where
    T: Send + 'static,
    A: Action<T> + ?Sized,
{
    /// Runs the worker loop until a poison pill or the stop signal ends it.
    pub(crate) async fn run(self) -> WorkerExit {
        self.bus
            .publish(Event::new(EventKind::WorkerStarting).with_worker(Arc::clone(&self.name)));

        let mut processed = 0usize;
        loop {
            let next = match &self.stop {
                Some(token) => {
                    select! {
                        biased;
                        _ = token.cancelled() => return self.drain().await,
                        next = self.channels.tasks.recv_async() => next,
                    }
                }
                None => self.channels.tasks.recv_async().await,
            };

            let task = match next {
                Ok(Envelope::Task(task)) => task,
                // A closed channel only happens once every pill is gone.
                Ok(Envelope::PoisonPill) | Err(_) => {
                    self.bus.publish(
                        Event::new(EventKind::WorkerFinished)
                            .with_worker(Arc::clone(&self.name))
                            .with_count(processed),
                    );
                    return WorkerExit::Finished;
                }
            };

            let kept = self.keep_task.map(|keep| keep(&task));
            let result = self.execute(task).await;
            processed += 1;

            let _ = self.channels.results.send(Posted { task: kept, result });
        }
    }

    /// Applies the action to one task, turning failures into an error record.
    async fn execute(&self, task: T) -> Option<A::Output> {
        let outcome = match std::panic::catch_unwind(AssertUnwindSafe(|| self.action.call(task))) {
            Ok(fut) => AssertUnwindSafe(fut)
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| Err(ActionError::from_panic(&*panic))),
            Err(panic) => Err(ActionError::from_panic(&*panic)),
        };

        match outcome {
            Ok(value) => Some(value),
            Err(error) => {
                let record = ErrorRecord {
                    worker: Arc::clone(&self.name),
                    action: Arc::from(self.action.name()),
                    error,
                };
                self.bus.publish(
                    Event::new(EventKind::TaskFailed)
                        .with_worker(Arc::clone(&record.worker))
                        .with_action(Arc::clone(&record.action))
                        .with_reason(record.error.to_string()),
                );
                let _ = self.channels.errors.send(record);
                None
            }
        }
    }

    /// Discards tasks until this worker's poison pill.
    async fn drain(&self) -> WorkerExit {
        let mut discarded = 0usize;
        while let Ok(Envelope::Task(_)) = self.channels.tasks.recv_async().await {
            discarded += 1;
        }

        self.bus.publish(
            Event::new(EventKind::WorkerStopped)
                .with_worker(Arc::clone(&self.name))
                .with_count(discarded),
        );
        WorkerExit::Stopped
    }
}
