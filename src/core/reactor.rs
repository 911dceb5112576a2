//! # Reactor: distributes tasks over a worker pool and collects the results.
//!
//! A [`Reactor`] runs **once**: it loads every task plus one poison pill per
//! worker into a shared channel, spawns the workers, collects one result per
//! task and joins the workers.
//!
//! ## Architecture
//! ```text
//! run(tasks, action)
//!   ├─► spent? ── yes ──► Err(Spent)
//!   ├─► publish RunStarting
//!   ├─► loader::load(tasks + pills) ──► [task channel]
//!   ├─► WorkerPool::spawn(min(parallelism, tasks))
//!   │       worker_i: fetch ─► action.call ─► post (task?, result)
//!   ├─► Collector::collect(tasks.len())
//!   │       ├─ Complete / Truncated ──► join ─► publish RunFinished ─► Ok(results)
//!   │       └─ Aborted(record)     ──► StopBroadcaster::broadcast
//!   │                                  join ─► publish RunAborted ─► Err(Aborted)
//!   └─► subscriber listener forwards bus events to a per-run SubscriberSet,
//!       then drains it before run returns
//! ```
//!
//! ## Rules
//! - Results come back in completion order, not submission order.
//! - A failed task leaves `None` in its slot unless `stop_on_error` is set, in
//!   which case the first failure aborts the run and discards partial results.
//! - A result read that exceeds [`Config::result_timeout`] truncates the list.
//! - Every run ends with exactly one `RunFinished` or `RunAborted` event.
//! - `run` returns only after every subscriber has handled that event.
//! - The result and error channels outlive the workers of the run.
//!
//! ## Example
//! ```rust
//! use taskreactor::{ActionError, ActionFn, ActionRef, Config, Reactor};
//!
//! #[tokio::main(flavor = "multi_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = Config::new(false);
//!     cfg.parallelism = 2;
//!
//!     let add_5: ActionRef<i64, i64> =
//!         ActionFn::arc("add_5", |x: i64| async move { Ok::<_, ActionError>(x + 5) });
//!
//!     let reactor = Reactor::new(cfg);
//!     let mut results: Vec<_> = reactor
//!         .run(vec![1, 2, 3, 4, 5], add_5)
//!         .await?
//!         .into_iter()
//!         .flatten()
//!         .collect();
//!     results.sort();
//!     assert_eq!(results, vec![6, 7, 8, 9, 10]);
//!     Ok(())
//! }
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::{
    sync::{broadcast, mpsc},
    task::JoinHandle,
    time::Instant,
};

use crate::{
    actions::Action,
    core::{
        builder::ReactorBuilder,
        channels::{KeepTask, Posted, WorkerChannels},
        collector::{Collection, Collector},
        config::Config,
        loader,
        pool::WorkerPool,
        stop::StopBroadcaster,
    },
    error::ReactorError,
    events::{Bus, Event, EventKind},
    subscribers::{Subscribe, SubscriberSet},
};

/// Single-use task distributor.
pub struct Reactor {
    cfg: Config,
    bus: Bus,
    subscribers: Vec<Arc<dyn Subscribe>>,
    spent: AtomicBool,
}

impl Reactor {
    /// Creates a reactor without subscribers.
    pub fn new(cfg: Config) -> Self {
        ReactorBuilder::new(cfg).build()
    }

    /// Returns a builder for a reactor with subscribers.
    pub fn builder(cfg: Config) -> ReactorBuilder {
        ReactorBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: Config,
        bus: Bus,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Self {
        Self {
            cfg,
            bus,
            subscribers,
            spent: AtomicBool::new(false),
        }
    }

    /// Returns the configuration of this reactor.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Returns `true` once [`run`](Self::run) or
    /// [`run_correlated`](Self::run_correlated) has been called.
    pub fn is_spent(&self) -> bool {
        self.spent.load(Ordering::Acquire)
    }

    /// Subscribes to the raw event stream of this reactor.
    ///
    /// Only events published after this call are received.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Applies `action` to every task and returns one entry per collected result.
    ///
    /// Entries are in completion order; a failed task yields `None`.
    ///
    /// # Errors
    /// - [`ReactorError::Spent`] on the second call.
    /// - [`ReactorError::Aborted`] when a task fails and `stop_on_error` is set.
    /// - [`ReactorError::GraceExceeded`] when workers outlive the join grace.
    pub async fn run<T, A>(
        &self,
        tasks: Vec<T>,
        action: Arc<A>,
    ) -> Result<Vec<Option<A::Output>>, ReactorError>
    where
        T: Send + 'static,
        A: Action<T> + ?Sized,
    {
        let posted = self.execute(tasks, action, None).await?;
        Ok(posted.into_iter().map(|p| p.result).collect())
    }

    /// Like [`run`](Self::run), but pairs every result with the task that produced it.
    ///
    /// # Errors
    /// Same as [`run`](Self::run).
    pub async fn run_correlated<T, A>(
        &self,
        tasks: Vec<T>,
        action: Arc<A>,
    ) -> Result<Vec<(T, Option<A::Output>)>, ReactorError>
    where
        T: Clone + Send + 'static,
        A: Action<T> + ?Sized,
    {
        let keep: KeepTask<T> = T::clone;
        let posted = self.execute(tasks, action, Some(keep)).await?;
        Ok(posted
            .into_iter()
            .filter_map(|p| p.task.map(|task| (task, p.result)))
            .collect())
    }

    async fn execute<T, A>(
        &self,
        tasks: Vec<T>,
        action: Arc<A>,
        keep_task: Option<KeepTask<T>>,
    ) -> Result<Vec<Posted<T, A::Output>>, ReactorError>
    where
        T: Send + 'static,
        A: Action<T> + ?Sized,
    {
        if self.spent.swap(true, Ordering::AcqRel) {
            return Err(ReactorError::Spent);
        }
        let started = Instant::now();
        let listener = self.subscriber_listener();

        let parallelism = self.cfg.parallelism_clamped();
        self.bus.publish(
            Event::new(EventKind::RunStarting)
                .with_tasks(tasks.len())
                .with_workers(loader::worker_count(parallelism, tasks.len()))
                .with_action(action.name()),
        );

        if tasks.is_empty() {
            self.finish(started, 0);
            wait_listener(listener).await;
            return Ok(Vec::new());
        }

        let queue = loader::load(tasks, parallelism, &self.bus);
        let (results_tx, results) = mpsc::unbounded_channel();
        let (errors_tx, errors) = mpsc::unbounded_channel();

        let stop = self
            .cfg
            .stop_on_error
            .then(|| StopBroadcaster::new(queue.pills, self.bus.clone()));

        let pool = WorkerPool::spawn(
            queue.pills,
            &action,
            WorkerChannels {
                tasks: queue.rx,
                results: results_tx,
                errors: errors_tx,
            },
            stop.as_ref().map(StopBroadcaster::token),
            keep_task,
            &self.bus,
        );

        let mut collector = Collector {
            results,
            errors,
            stop_on_error: self.cfg.stop_on_error,
            timeout: self.cfg.result_timeout(),
            bus: self.bus.clone(),
        };
        let collection = collector.collect(queue.tasks).await;

        let outcome = match collection {
            Collection::Aborted(record) => {
                if let Some(stop) = &stop {
                    stop.broadcast(&record);
                }
                // A stuck worker is reported by its event; the failure stays the error.
                let _ = pool.join(self.cfg.join_grace()).await;
                Err(ReactorError::Aborted { record })
            }
            Collection::Complete(posted) | Collection::Truncated(posted) => pool
                .join(self.cfg.join_grace())
                .await
                .map(|_| posted),
        };
        drop(collector);

        match &outcome {
            Ok(posted) => self.finish(started, posted.len()),
            Err(err) => self.bus.publish(
                Event::new(EventKind::RunAborted)
                    .with_reason(err.to_string())
                    .with_elapsed(started.elapsed()),
            ),
        }
        wait_listener(listener).await;
        outcome
    }

    fn finish(&self, started: Instant, count: usize) {
        self.bus.publish(
            Event::new(EventKind::RunFinished)
                .with_count(count)
                .with_elapsed(started.elapsed()),
        );
    }

    /// Forwards bus events to a per-run subscriber set until the run's terminal
    /// event, then drains every subscriber queue.
    fn subscriber_listener(&self) -> Option<JoinHandle<()>> {
        if self.subscribers.is_empty() {
            return None;
        }

        let mut rx = self.bus.subscribe();
        let set = SubscriberSet::new(self.subscribers.clone(), self.bus.clone());
        Some(tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => {
                        let last =
                            matches!(ev.kind, EventKind::RunFinished | EventKind::RunAborted);
                        set.emit(&ev);
                        if last {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            set.shutdown().await;
        }))
    }
}

async fn wait_listener(listener: Option<JoinHandle<()>>) {
    if let Some(handle) = listener {
        let _ = handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{ActionFn, ActionRef};
    use crate::error::ActionError;

    fn add_5() -> ActionRef<i64, i64> {
        ActionFn::arc("add_5", |x: i64| async move {
            if x < 0 {
                return Err(ActionError::fail(format!("negative: {x}")));
            }
            Ok(x + 5)
        })
    }

    fn kinds(rx: &mut broadcast::Receiver<Event>) -> Vec<EventKind> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            out.push(ev.kind);
        }
        out
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn second_run_is_rejected() {
        let reactor = Reactor::new(Config::default());
        assert!(!reactor.is_spent());

        let first = reactor.run(vec![1, 2], add_5()).await.unwrap();
        assert_eq!(first.len(), 2);
        assert!(reactor.is_spent());

        let second = reactor.run(vec![3], add_5()).await;
        assert!(matches!(second, Err(ReactorError::Spent)));
    }

    #[tokio::test]
    async fn empty_batch_spawns_no_workers() {
        let reactor = Reactor::new(Config::new(true));
        let mut rx = reactor.subscribe();

        let out = reactor.run(Vec::<i64>::new(), add_5()).await.unwrap();
        assert!(out.is_empty());
        assert_eq!(kinds(&mut rx), vec![EventKind::RunStarting, EventKind::RunFinished]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn aborted_run_ends_with_run_aborted() {
        let mut cfg = Config::new(true);
        cfg.parallelism = 1;
        let reactor = Reactor::new(cfg);
        let mut rx = reactor.subscribe();

        let err = reactor.run(vec![1, -1, 2, 3], add_5()).await.unwrap_err();
        assert_eq!(err.as_label(), "reactor_aborted");
        assert_eq!(
            err.record().map(|r| r.error.clone()),
            Some(ActionError::fail("negative: -1"))
        );

        let seen = kinds(&mut rx);
        assert!(seen.contains(&EventKind::StopBroadcast));
        assert_eq!(seen.last(), Some(&EventKind::RunAborted));
        assert!(!seen.contains(&EventKind::RunFinished));
    }
}
