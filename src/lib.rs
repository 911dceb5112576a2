//! # taskreactor
//!
//! **Taskreactor** distributes a batch of tasks over a fixed pool of async
//! workers and collects one result per task.
//!
//! Tasks are handed out through a shared channel terminated by one poison pill
//! per worker. Results are collected with a per-result timeout; failed tasks
//! either leave a `None` slot or, in stop-on-error mode, abort the whole run
//! and stop every worker. Results can optionally be correlated with the task
//! that produced them.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!        tasks: Vec<T>                       action: Arc<dyn Action<T>>
//!             │                                        │
//!             ▼                                        │
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Reactor (single-use)                                             │
//! │  - loader: [t0 .. tN-1, PILL × workers] ──► task channel (flume)  │
//! │  - WorkerPool: worker_0 .. worker_{W-1}, W = min(parallelism, N)  │
//! │  - StopBroadcaster (stop_on_error only)                           │
//! │  - Collector: result channel + error channel (tokio mpsc)         │
//! └──────┬──────────────────┬──────────────────┬───────────────┬──────┘
//!        ▼                  ▼                  ▼               │
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   │
//!     │   worker_0   │   │   worker_1   │   │   worker_W   │   │
//!     │ fetch/exec/  │   │ fetch/exec/  │   │ fetch/exec/  │   │
//!     │ post loop    │   │ post loop    │   │ post loop    │   │
//!     └┬─────────────┘   └┬─────────────┘   └┬─────────────┘   │
//!      │ WorkerStarting   │ TaskFailed       │ WorkerStopped   │ RunStarting
//!      │ WorkerFinished   │                  │                 │ RunFinished / RunAborted
//!      ▼                  ▼                  ▼                 ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │                    (capacity: Config::bus_capacity)               │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │  subscriber_listener   │
//!                       └───────────┬────────────┘
//!                                   ▼
//!                             SubscriberSet
//!                            (per-sub queues)
//!                         ┌─────────┼─────────┐
//!                         ▼         ▼         ▼
//!                      LogWriter   sub2      subN
//! ```
//!
//! ### Worker lifecycle
//! ```text
//! loop {
//!   ├─► stop_on_error && stop signalled ─► drain until own pill ─► WorkerStopped, exit
//!   ├─► fetch next item
//!   │       ├─ PoisonPill ─► WorkerFinished, exit
//!   │       └─ Task(t)
//!   ├─► action.call(t)
//!   │       ├─ Ok(o)          ─► post (t?, Some(o))
//!   │       └─ Err / panic    ─► TaskFailed, send ErrorRecord, post (t?, None)
//!   └─ continue
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                 | Key types / traits                          |
//! |-------------------|-------------------------------------------------------------|---------------------------------------------|
//! | **Reactor**       | Run a batch of tasks over a worker pool, once.              | [`Reactor`], [`ReactorBuilder`]             |
//! | **Actions**       | The operation applied to every task, async or blocking.     | [`Action`], [`ActionFn`], [`BlockingFn`]    |
//! | **Subscriber API**| Hook into run events (logging, metrics, custom handlers).   | [`Subscribe`], [`SubscriberSet`]            |
//! | **Errors**        | Typed errors for runs and single action invocations.        | [`ReactorError`], [`ActionError`]           |
//! | **Configuration** | Stop-on-error, parallelism, timeouts, bus capacity.         | [`Config`]                                  |
//!
//! ## Optional features
//! - `logging`: exports the built-in [`LogWriter`] subscriber (`tracing` records).
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use taskreactor::{ActionError, ActionFn, ActionRef, Config, Reactor, ReactorError};
//!
//! #[tokio::main(flavor = "multi_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = Config::new(true);
//!     cfg.parallelism = 3;
//!
//!     // Build subscribers (optional)
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn taskreactor::Subscribe>> = vec![Arc::new(taskreactor::LogWriter::new())];
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn taskreactor::Subscribe>> = Vec::new();
//!
//!     let parse: ActionRef<String, i64> = ActionFn::arc("parse", |s: String| async move {
//!         s.trim().parse::<i64>().map_err(ActionError::fail)
//!     });
//!
//!     let reactor = Reactor::builder(cfg).with_subscribers(subs).build();
//!     let tasks = vec!["1".to_string(), "two".to_string(), "3".to_string()];
//!
//!     match reactor.run_correlated(tasks, parse).await {
//!         Err(ReactorError::Aborted { record }) => println!("stopped: {record}"),
//!         Err(e) => return Err(e.into()),
//!         Ok(pairs) => println!("parsed: {pairs:?}"),
//!     }
//!     Ok(())
//! }
//! ```
mod actions;
mod core;
mod error;
mod events;
mod subscribers;

// ---- Public re-exports ----

pub use actions::{Action, ActionFn, ActionRef, BlockingFn, BoxActionFuture};
pub use core::{Config, Reactor, ReactorBuilder};
pub use error::{ActionError, ErrorRecord, ReactorError};
pub use events::{Bus, Event, EventKind};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose the built-in `tracing` subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
