//! # Worker pool.
//!
//! Spawns the workers of one run into a [`JoinSet`] and joins them once the
//! collector is done.
//!
//! Joining waits for every worker to consume its poison pill. With a non-zero
//! [`Config::grace`](crate::Config::grace) the wait is bounded: workers still
//! running when it elapses are aborted, [`EventKind::GraceExceeded`] is
//! published and their names are reported in [`ReactorError::GraceExceeded`].

use std::{sync::Arc, time::Duration};

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::{
    actions::Action,
    core::{
        channels::{KeepTask, WorkerChannels},
        worker::{Worker, WorkerExit},
    },
    error::ReactorError,
    events::{Bus, Event, EventKind},
};

/// Running workers of one run.
pub(crate) struct WorkerPool {
    set: JoinSet<(Arc<str>, WorkerExit)>,
    names: Vec<Arc<str>>,
    bus: Bus,
}

impl WorkerPool {
    /// Spawns `count` workers named `worker_0 .. worker_{count-1}`.
    pub(crate) fn spawn<T, A>(
        count: usize,
        action: &Arc<A>,
        channels: WorkerChannels<T, A::Output>,
        stop: Option<CancellationToken>,
        keep_task: Option<KeepTask<T>>,
        bus: &Bus,
    ) -> Self
    where
        T: Send + 'static,
        A: Action<T> + ?Sized,
    {
        let mut set = JoinSet::new();
        let mut names = Vec::with_capacity(count);

        for i in 0..count {
            let name: Arc<str> = Arc::from(format!("worker_{i}"));
            let worker = Worker {
                name: Arc::clone(&name),
                action: Arc::clone(action),
                channels: channels.clone(),
                stop: stop.clone(),
                keep_task,
                bus: bus.clone(),
            };
            names.push(Arc::clone(&name));
            set.spawn(async move { (name, worker.run().await) });
        }

        Self {
            set,
            names,
            bus: bus.clone(),
        }
    }

    /// Waits for every worker to exit, bounded by `grace` when set.
    pub(crate) async fn join(
        mut self,
        grace: Option<Duration>,
    ) -> Result<Vec<(Arc<str>, WorkerExit)>, ReactorError> {
        let mut exits = Vec::with_capacity(self.names.len());

        let Some(grace) = grace else {
            self.drain_set(&mut exits).await;
            return Ok(exits);
        };

        if tokio::time::timeout(grace, self.drain_set(&mut exits))
            .await
            .is_ok()
        {
            return Ok(exits);
        }

        let mut stuck: Vec<String> = self
            .names
            .iter()
            .filter(|name| !exits.iter().any(|(done, _)| done == *name))
            .map(|name| name.to_string())
            .collect();
        stuck.sort();

        self.set.abort_all();
        while self.set.join_next().await.is_some() {}

        self.bus.publish(
            Event::new(EventKind::GraceExceeded)
                .with_timeout(grace)
                .with_workers(stuck.len())
                .with_reason(stuck.join(",")),
        );
        Err(ReactorError::GraceExceeded { grace, stuck })
    }

    async fn drain_set(&mut self, exits: &mut Vec<(Arc<str>, WorkerExit)>) {
        while let Some(joined) = self.set.join_next().await {
            // Action panics are caught inside the worker; a join error means abort.
            if let Ok(exit) = joined {
                exits.push(exit);
            }
        }
    }
}
