//! # LogWriter: structured event logger
//!
//! A minimal subscriber that turns incoming [`Event`]s into `tracing` records
//! under the `taskreactor` target. Install any `tracing` subscriber (for
//! example `tracing_subscriber::fmt`) to see them.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO taskreactor: run starting tasks=5 workers=2
//! DEBUG taskreactor: tasks loaded tasks=5 pills=2
//! ERROR taskreactor: task failed worker="worker_1" action="add_5" reason="execution failed: not a number"
//! WARN taskreactor: stop broadcast workers=2 reason="worker_1: action \"add_5\" ..."
//! WARN taskreactor: worker stopped worker="worker_0" discarded=3
//! INFO taskreactor: run finished collected=5 elapsed_ms=12
//! ```
//!
//! Metadata the event does not carry is left out of the record.

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let worker = e.worker.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");

        match e.kind {
            EventKind::RunStarting => {
                info!(target: "taskreactor", seq = e.seq, tasks = e.tasks, workers = e.workers, "run starting");
            }
            EventKind::TasksLoaded => {
                debug!(target: "taskreactor", seq = e.seq, tasks = e.tasks, pills = e.workers, "tasks loaded");
            }
            EventKind::WorkerStarting => {
                debug!(target: "taskreactor", seq = e.seq, worker, "worker starting");
            }
            EventKind::TaskFailed => {
                error!(
                    target: "taskreactor",
                    seq = e.seq,
                    worker,
                    action = e.action.as_deref().unwrap_or("-"),
                    reason,
                    "task failed"
                );
            }
            EventKind::WorkerFinished => {
                info!(target: "taskreactor", seq = e.seq, worker, processed = e.count, "worker finished");
            }
            EventKind::WorkerStopped => {
                warn!(target: "taskreactor", seq = e.seq, worker, discarded = e.count, "worker stopped");
            }
            EventKind::StopBroadcast => {
                warn!(target: "taskreactor", seq = e.seq, workers = e.workers, reason, "stop broadcast");
            }
            EventKind::ResultTimeout => {
                warn!(
                    target: "taskreactor",
                    seq = e.seq,
                    collected = e.count,
                    expected = e.tasks,
                    timeout_ms = e.timeout_ms,
                    "result timeout; remaining tasks abandoned"
                );
            }
            EventKind::RunFinished => {
                info!(target: "taskreactor", seq = e.seq, collected = e.count, elapsed_ms = e.elapsed_ms, "run finished");
            }
            EventKind::RunAborted => {
                error!(target: "taskreactor", seq = e.seq, reason, elapsed_ms = e.elapsed_ms, "run aborted");
            }
            EventKind::GraceExceeded => {
                error!(target: "taskreactor", seq = e.seq, grace_ms = e.timeout_ms, stuck = reason, "grace exceeded");
            }
            EventKind::SubscriberOverflow => {
                warn!(target: "taskreactor", seq = e.seq, subscriber = worker, reason, "subscriber overflow");
            }
            EventKind::SubscriberPanicked => {
                error!(target: "taskreactor", seq = e.seq, subscriber = worker, info = reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[tokio::test]
    async fn fields_are_logged_as_plain_values() {
        let cap = Capture::default();
        let writer = cap.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let log = LogWriter::new();
        log.on_event(&Event::new(EventKind::RunStarting).with_tasks(5).with_workers(3))
            .await;
        log.on_event(&Event::new(EventKind::RunFinished).with_count(5))
            .await;

        let out = cap.text();
        assert!(out.contains("run starting"), "{out}");
        assert!(out.contains("tasks=5 workers=3"), "{out}");
        assert!(out.contains("collected=5"), "{out}");
        assert!(!out.contains("Some("), "{out}");
        assert!(!out.contains("elapsed_ms"), "{out}");
    }
}
