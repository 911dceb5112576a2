//! # Task loader.
//!
//! Fills the task channel for one run: every task first, then one poison pill
//! per worker, then the producing side is dropped.
//!
//! ```text
//! [t0, t1, ..., tN-1, PILL × workers]  ──►  worker_0 .. worker_{workers-1}
//! ```
//!
//! Every worker consumes exactly one pill before exiting, so the pill count
//! must equal the worker count: one pill fewer leaves a worker blocked forever,
//! one more is never consumed.

use crate::core::channels::Envelope;
use crate::events::{Bus, Event, EventKind};

/// A loaded task channel.
pub(crate) struct TaskQueue<T> {
    /// Consuming side, cloned into every worker.
    pub rx: flume::Receiver<Envelope<T>>,
    /// Number of enqueued tasks.
    pub tasks: usize,
    /// Number of enqueued poison pills (== workers to spawn).
    pub pills: usize,
}

/// Number of workers for a run: `min(parallelism, tasks)`, with `parallelism >= 1`.
#[inline]
pub(crate) fn worker_count(parallelism: usize, tasks: usize) -> usize {
    parallelism.max(1).min(tasks)
}

/// Enqueues `tasks` followed by `worker_count(parallelism, tasks.len())` poison pills.
pub(crate) fn load<T>(tasks: Vec<T>, parallelism: usize, bus: &Bus) -> TaskQueue<T> {
    let (tx, rx) = flume::unbounded();
    let total = tasks.len();
    let pills = worker_count(parallelism, total);

    // `rx` is alive and the channel is unbounded: sends cannot fail.
    for task in tasks {
        let _ = tx.send(Envelope::Task(task));
    }
    for _ in 0..pills {
        let _ = tx.send(Envelope::PoisonPill);
    }

    bus.publish(
        Event::new(EventKind::TasksLoaded)
            .with_tasks(total)
            .with_workers(pills),
    );

    TaskQueue {
        rx,
        tasks: total,
        pills,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<T>(rx: &flume::Receiver<Envelope<T>>) -> (Vec<T>, usize) {
        let mut tasks = Vec::new();
        let mut pills = 0;
        while let Ok(env) = rx.try_recv() {
            match env {
                Envelope::Task(t) => {
                    assert_eq!(pills, 0, "task enqueued after a poison pill");
                    tasks.push(t);
                }
                Envelope::PoisonPill => pills += 1,
            }
        }
        (tasks, pills)
    }

    #[test]
    fn worker_count_is_bounded_by_tasks_and_parallelism() {
        assert_eq!(worker_count(5, 3), 3);
        assert_eq!(worker_count(2, 5), 2);
        assert_eq!(worker_count(5, 5), 5);
        assert_eq!(worker_count(0, 4), 1);
        assert_eq!(worker_count(5, 0), 0);
    }

    #[test]
    fn fewer_tasks_than_parallelism_gets_one_pill_per_task() {
        let bus = Bus::new(8);
        let queue = load(vec![1, 2, 3], 5, &bus);
        assert_eq!(queue.tasks, 3);
        assert_eq!(queue.pills, 3);

        let (tasks, pills) = drain(&queue.rx);
        assert_eq!(tasks, vec![1, 2, 3]);
        assert_eq!(pills, 3);
        assert!(queue.rx.is_disconnected());
    }

    #[test]
    fn more_tasks_than_parallelism_gets_one_pill_per_worker() {
        let bus = Bus::new(8);
        let mut events = bus.subscribe();
        let queue = load((0..10).collect(), 4, &bus);

        let (tasks, pills) = drain(&queue.rx);
        assert_eq!(tasks.len(), 10);
        assert_eq!(pills, 4);

        let ev = events.try_recv().unwrap();
        assert_eq!(ev.kind, EventKind::TasksLoaded);
        assert_eq!((ev.tasks, ev.workers), (Some(10), Some(4)));
    }

    #[test]
    fn empty_batch_loads_nothing() {
        let bus = Bus::new(8);
        let queue = load(Vec::<u8>::new(), 5, &bus);
        assert_eq!((queue.tasks, queue.pills), (0, 0));
        assert!(queue.rx.try_recv().is_err());
    }
}
