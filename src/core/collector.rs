//! # Result collector.
//!
//! Reads posted results until one per task has arrived, a result read times
//! out, or (in stop-on-error mode) a failure is reported.
//!
//! ```text
//! loop while collected < expected:
//!   stop_on_error:  select!(biased) { error ─► Aborted(record)
//!                                     result / timeout / closed }
//!   otherwise:      result / timeout / closed
//!
//!   result  ─► push, continue
//!   timeout ─► publish ResultTimeout, Truncated(collected so far)
//!   closed  ─► Truncated(collected so far)
//!
//! stop_on_error: a failure still queued after the last result ─► Aborted
//! ```
//!
//! Workers send the error record before the matching `None` result, so every
//! failure behind a collected result is visible to the collector.

use std::time::Duration;

use tokio::{select, sync::mpsc};

use crate::{
    core::channels::Posted,
    error::ErrorRecord,
    events::{Bus, Event, EventKind},
};

/// Outcome of a collection.
#[derive(Debug)]
pub(crate) enum Collection<T, O> {
    /// One result per task.
    Complete(Vec<Posted<T, O>>),
    /// Fewer results than tasks: a read timed out or every worker went away.
    Truncated(Vec<Posted<T, O>>),
    /// A task failed in stop-on-error mode.
    Aborted(ErrorRecord),
}

enum Next<T, O> {
    Posted(Posted<T, O>),
    TimedOut,
    Closed,
}

/// Receiving side of the result and error channels.
pub(crate) struct Collector<T, O> {
    pub results: mpsc::UnboundedReceiver<Posted<T, O>>,
    pub errors: mpsc::UnboundedReceiver<ErrorRecord>,
    pub stop_on_error: bool,
    pub timeout: Option<Duration>,
    pub bus: Bus,
}

impl<T, O> Collector<T, O> {
    /// Collects up to `expected` results.
    ///
    /// The receivers stay open afterwards; the caller drops the collector once
    /// every worker has been joined.
    pub(crate) async fn collect(&mut self, expected: usize) -> Collection<T, O> {
        let mut collected = Vec::with_capacity(expected);

        while collected.len() < expected {
            let next = if self.stop_on_error {
                select! {
                    biased;
                    Some(record) = self.errors.recv() => return Collection::Aborted(record),
                    next = next_result(&mut self.results, self.timeout) => next,
                }
            } else {
                next_result(&mut self.results, self.timeout).await
            };

            match next {
                Next::Posted(posted) => collected.push(posted),
                Next::TimedOut => {
                    let mut ev = Event::new(EventKind::ResultTimeout)
                        .with_count(collected.len())
                        .with_tasks(expected);
                    if let Some(timeout) = self.timeout {
                        ev = ev.with_timeout(timeout);
                    }
                    self.bus.publish(ev);
                    return Collection::Truncated(collected);
                }
                Next::Closed => return Collection::Truncated(collected),
            }
        }

        if self.stop_on_error {
            if let Ok(record) = self.errors.try_recv() {
                return Collection::Aborted(record);
            }
        }
        Collection::Complete(collected)
    }
}

async fn next_result<T, O>(
    results: &mut mpsc::UnboundedReceiver<Posted<T, O>>,
    timeout: Option<Duration>,
) -> Next<T, O> {
    let received = match timeout {
        Some(d) => match tokio::time::timeout(d, results.recv()).await {
            Ok(received) => received,
            Err(_) => return Next::TimedOut,
        },
        None => results.recv().await,
    };

    match received {
        Some(posted) => Next::Posted(posted),
        None => Next::Closed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ActionError;

    struct Feed {
        results: mpsc::UnboundedSender<Posted<u8, u8>>,
        errors: mpsc::UnboundedSender<ErrorRecord>,
    }

    fn collector(
        stop_on_error: bool,
        timeout: Option<Duration>,
        bus: &Bus,
    ) -> (Feed, Collector<u8, u8>) {
        let (results_tx, results) = mpsc::unbounded_channel();
        let (errors_tx, errors) = mpsc::unbounded_channel();
        (
            Feed {
                results: results_tx,
                errors: errors_tx,
            },
            Collector {
                results,
                errors,
                stop_on_error,
                timeout,
                bus: bus.clone(),
            },
        )
    }

    fn posted(result: Option<u8>) -> Posted<u8, u8> {
        Posted { task: None, result }
    }

    fn record(msg: &str) -> ErrorRecord {
        ErrorRecord {
            worker: "worker_1".into(),
            action: "add_5".into(),
            error: ActionError::fail(msg),
        }
    }

    fn results(collected: Vec<Posted<u8, u8>>) -> Vec<Option<u8>> {
        collected.into_iter().map(|p| p.result).collect()
    }

    #[tokio::test]
    async fn lenient_mode_keeps_failed_slots() {
        let bus = Bus::new(16);
        let (feed, mut c) = collector(false, None, &bus);
        feed.errors.send(record("bad")).unwrap();
        feed.results.send(posted(None)).unwrap();
        feed.results.send(posted(Some(7))).unwrap();

        match c.collect(2).await {
            Collection::Complete(got) => assert_eq!(results(got), vec![None, Some(7)]),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn stop_mode_aborts_on_first_error() {
        let bus = Bus::new(16);
        let (feed, mut c) = collector(true, None, &bus);
        feed.results.send(posted(Some(6))).unwrap();
        feed.errors.send(record("first")).unwrap();
        feed.errors.send(record("second")).unwrap();
        feed.results.send(posted(None)).unwrap();

        match c.collect(5).await {
            Collection::Aborted(rec) => assert_eq!(rec.error, ActionError::fail("first")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn stop_mode_prefers_error_over_ready_result() {
        let bus = Bus::new(16);
        let (feed, mut c) = collector(true, None, &bus);
        feed.results.send(posted(None)).unwrap();
        feed.errors.send(record("last")).unwrap();

        match c.collect(1).await {
            Collection::Aborted(rec) => assert_eq!(rec.error, ActionError::fail("last")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_truncates_and_publishes() {
        let bus = Bus::new(16);
        let mut events = bus.subscribe();
        let (feed, mut c) = collector(false, Some(Duration::from_secs(2)), &bus);
        feed.results.send(posted(Some(1))).unwrap();

        match c.collect(3).await {
            Collection::Truncated(got) => assert_eq!(results(got), vec![Some(1)]),
            other => panic!("unexpected: {other:?}"),
        }

        let ev = events.try_recv().unwrap();
        assert_eq!(ev.kind, EventKind::ResultTimeout);
        assert_eq!((ev.count, ev.tasks), (Some(1), Some(3)));
        assert_eq!(ev.timeout_ms, Some(2_000));
        drop(feed);
    }

    #[tokio::test(start_paused = true)]
    async fn receivers_stay_open_after_collection() {
        let bus = Bus::new(16);
        let (feed, mut c) = collector(false, Some(Duration::from_secs(1)), &bus);
        feed.results.send(posted(Some(1))).unwrap();

        assert!(matches!(c.collect(2).await, Collection::Truncated(_)));

        // A late worker can still post until the collector is dropped.
        assert!(feed.results.send(posted(Some(9))).is_ok());
        assert!(feed.errors.send(record("late")).is_ok());
        drop(c);
        assert!(feed.results.send(posted(Some(10))).is_err());
    }

    #[tokio::test]
    async fn closed_channel_truncates() {
        let bus = Bus::new(16);
        let (feed, mut c) = collector(true, None, &bus);
        feed.results.send(posted(Some(3))).unwrap();
        drop(feed);

        match c.collect(4).await {
            Collection::Truncated(got) => assert_eq!(results(got), vec![Some(3)]),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
