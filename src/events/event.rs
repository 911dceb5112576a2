//! # Runtime events emitted by the reactor and its workers.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Run events**: the life of one `run` (starting, loaded, finished, aborted)
//! - **Worker events**: worker lifecycle and task failures
//! - **Subscriber events**: delivery problems inside the fan-out set
//!
//! The [`Event`] struct carries additional metadata such as timestamps, worker
//! name, counts and durations.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use taskreactor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskFailed)
//!     .with_worker("worker_0")
//!     .with_action("add_5")
//!     .with_reason("boom");
//!
//! assert_eq!(ev.kind, EventKind::TaskFailed);
//! assert_eq!(ev.worker.as_deref(), Some("worker_0"));
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `worker`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `worker`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Run events ===
    /// A run is starting.
    ///
    /// Sets:
    /// - `tasks`: number of submitted tasks
    /// - `workers`: number of workers about to be spawned
    RunStarting,

    /// The task channel is loaded.
    ///
    /// Sets:
    /// - `tasks`: number of enqueued tasks
    /// - `workers`: number of enqueued poison pills
    TasksLoaded,

    /// The collector gave up waiting for the next result.
    ///
    /// Sets:
    /// - `count`: results collected so far
    /// - `tasks`: results expected
    /// - `timeout_ms`: the result timeout
    ResultTimeout,

    /// A failure was detected and the stop signal went out to every worker.
    ///
    /// Sets:
    /// - `workers`: number of signalled workers
    /// - `reason`: the failure that triggered the stop
    StopBroadcast,

    /// The run completed and results are returned.
    ///
    /// Sets:
    /// - `count`: number of returned results
    /// - `elapsed_ms`: wall time of the run
    RunFinished,

    /// The run was aborted by a failed task.
    ///
    /// Sets:
    /// - `reason`: the failure that aborted the run
    /// - `elapsed_ms`: wall time of the run
    RunAborted,

    /// Workers did not exit within the join grace and were aborted.
    ///
    /// Sets:
    /// - `timeout_ms`: the join grace
    /// - `workers`: number of stuck workers
    /// - `reason`: comma-separated names of the stuck workers
    GraceExceeded,

    // === Worker events ===
    /// Worker spawned and about to fetch its first task.
    ///
    /// Sets:
    /// - `worker`: worker name
    WorkerStarting,

    /// An action invocation failed; the worker posts a `None` result.
    ///
    /// Sets:
    /// - `worker`: worker name
    /// - `action`: action name
    /// - `reason`: failure message
    TaskFailed,

    /// Worker consumed its poison pill after processing tasks.
    ///
    /// Sets:
    /// - `worker`: worker name
    /// - `count`: tasks processed by this worker
    WorkerFinished,

    /// Worker observed the stop signal and drained the task channel.
    ///
    /// Sets:
    /// - `worker`: worker name
    /// - `count`: tasks discarded while draining
    WorkerStopped,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the worker (or subscriber), if applicable.
    pub worker: Option<Arc<str>>,
    /// Name of the action, if applicable.
    pub action: Option<Arc<str>>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Number of tasks in the run.
    pub tasks: Option<usize>,
    /// Number of workers in the run.
    pub workers: Option<usize>,
    /// Kind-specific counter (processed, discarded or collected items).
    pub count: Option<usize>,
    /// Result timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Run duration in milliseconds (compact).
    pub elapsed_ms: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            worker: None,
            action: None,
            reason: None,
            tasks: None,
            workers: None,
            count: None,
            timeout_ms: None,
            elapsed_ms: None,
        }
    }

    /// Attaches a worker (or subscriber) name.
    #[inline]
    pub fn with_worker(mut self, worker: impl Into<Arc<str>>) -> Self {
        self.worker = Some(worker.into());
        self
    }

    /// Attaches an action name.
    #[inline]
    pub fn with_action(mut self, action: impl Into<Arc<str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the task count.
    #[inline]
    pub fn with_tasks(mut self, n: usize) -> Self {
        self.tasks = Some(n);
        self
    }

    /// Attaches the worker count.
    #[inline]
    pub fn with_workers(mut self, n: usize) -> Self {
        self.workers = Some(n);
        self
    }

    /// Attaches a kind-specific counter.
    #[inline]
    pub fn with_count(mut self, n: usize) -> Self {
        self.count = Some(n);
        self
    }

    /// Attaches a timeout duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        self.timeout_ms = Some(compact_ms(d));
        self
    }

    /// Attaches an elapsed duration (stored as milliseconds).
    #[inline]
    pub fn with_elapsed(mut self, d: Duration) -> Self {
        self.elapsed_ms = Some(compact_ms(d));
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_worker(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_worker(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberPanicked)
    }
}

fn compact_ms(d: Duration) -> u32 {
    d.as_millis().min(u128::from(u32::MAX)) as u32
}
