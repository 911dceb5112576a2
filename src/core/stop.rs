//! # Stop broadcaster.
//!
//! Delivers the abort signal of a stop-on-error run to every worker. The
//! signal channel is a [`CancellationToken`] shared by all workers of the run:
//! a single `cancel()` reaches each of them, and a worker waiting for its next
//! task observes it immediately through its multiplexed wait.
//!
//! ```text
//! collector ── broadcast(record) ──► token.cancel()
//!                                        ├──► worker_0: drain until own pill
//!                                        ├──► worker_1: drain until own pill
//!                                        └──► worker_N: (mid-task) finish, post, then drain
//! ```

use tokio_util::sync::CancellationToken;

use crate::error::ErrorRecord;
use crate::events::{Bus, Event, EventKind};

/// Abort signal shared by the workers of one stop-on-error run.
pub(crate) struct StopBroadcaster {
    token: CancellationToken,
    workers: usize,
    bus: Bus,
}

impl StopBroadcaster {
    /// Creates a broadcaster for `workers` workers.
    pub(crate) fn new(workers: usize, bus: Bus) -> Self {
        Self {
            token: CancellationToken::new(),
            workers,
            bus,
        }
    }

    /// Returns the token a worker listens on.
    pub(crate) fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Signals every worker to stop. Only the first call has an effect.
    pub(crate) fn broadcast(&self, record: &ErrorRecord) {
        if self.token.is_cancelled() {
            return;
        }
        self.token.cancel();
        self.bus.publish(
            Event::new(EventKind::StopBroadcast)
                .with_workers(self.workers)
                .with_reason(record.to_string()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ActionError;

    #[test]
    fn broadcast_reaches_every_token_once() {
        let bus = Bus::new(8);
        let mut events = bus.subscribe();
        let stop = StopBroadcaster::new(3, bus);
        let tokens: Vec<_> = (0..3).map(|_| stop.token()).collect();

        let record = ErrorRecord {
            worker: "worker_2".into(),
            action: "add_5".into(),
            error: ActionError::fail("boom"),
        };
        stop.broadcast(&record);
        stop.broadcast(&record);

        assert!(tokens.iter().all(CancellationToken::is_cancelled));

        let ev = events.try_recv().unwrap();
        assert_eq!(ev.kind, EventKind::StopBroadcast);
        assert_eq!(ev.workers, Some(3));
        assert!(events.try_recv().is_err(), "second broadcast must be a no-op");
    }
}
