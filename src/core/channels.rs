//! Messages and channel ends shared between the master side and the workers.
//!
//! ```text
//!   loader ──Envelope<T>──► [task: flume MPMC] ──► worker 0..N
//!   worker ──Posted<T,O>──► [result: mpsc]     ──► collector
//!   worker ──ErrorRecord──► [error:  mpsc]     ──► collector
//! ```

use tokio::sync::mpsc;

use crate::error::ErrorRecord;

/// Item on the task channel.
#[derive(Debug)]
pub(crate) enum Envelope<T> {
    /// A unit of work.
    Task(T),
    /// End-of-work marker; exactly one per worker.
    PoisonPill,
}

/// Item on the result channel.
///
/// `task` is only filled when the run correlates tasks to results;
/// `result` is `None` when the action failed.
#[derive(Debug)]
pub(crate) struct Posted<T, O> {
    pub task: Option<T>,
    pub result: Option<O>,
}

/// Keeps a copy of the task before it is handed to the action (correlation mode).
pub(crate) type KeepTask<T> = fn(&T) -> T;

/// Channel ends owned by one worker.
pub(crate) struct WorkerChannels<T, O> {
    pub tasks: flume::Receiver<Envelope<T>>,
    pub results: mpsc::UnboundedSender<Posted<T, O>>,
    pub errors: mpsc::UnboundedSender<ErrorRecord>,
}

impl<T, O> Clone for WorkerChannels<T, O> {
    fn clone(&self) -> Self {
        Self {
            tasks: self.tasks.clone(),
            results: self.results.clone(),
            errors: self.errors.clone(),
        }
    }
}
