use std::sync::Arc;

use crate::{
    core::{Config, Reactor},
    events::Bus,
    subscribers::Subscribe,
};

/// Builder for constructing a [`Reactor`] with optional subscribers.
pub struct ReactorBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl ReactorBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive run events (worker lifecycle, failures, timeouts)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds one event subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Builds the reactor.
    ///
    /// Subscriber delivery tasks are spawned per run, so building needs no
    /// runtime.
    pub fn build(self) -> Reactor {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        Reactor::new_internal(self.cfg, bus, self.subscribers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Event;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Counter(Mutex<usize>);

    #[async_trait]
    impl Subscribe for Counter {
        async fn on_event(&self, _ev: &Event) {
            if let Ok(mut n) = self.0.lock() {
                *n += 1;
            }
        }

        fn name(&self) -> &'static str {
            "counter"
        }
    }

    #[test]
    fn builds_without_a_runtime() {
        let plain = ReactorBuilder::new(Config::new(true)).build();
        assert!(plain.config().stop_on_error);
        assert!(!plain.is_spent());

        let watched = Reactor::builder(Config::default())
            .with_subscriber(Arc::new(Counter::default()))
            .build();
        assert!(!watched.config().stop_on_error);
    }

    #[tokio::test]
    async fn attached_subscriber_sees_the_empty_run() {
        let counter = Arc::new(Counter::default());
        let reactor = Reactor::builder(Config::default())
            .with_subscriber(counter.clone())
            .build();

        let action = crate::actions::ActionFn::arc("noop", |x: u8| async move {
            Ok::<_, crate::ActionError>(x)
        });
        reactor.run(Vec::<u8>::new(), action).await.unwrap();

        // RunStarting and RunFinished.
        assert_eq!(*counter.0.lock().unwrap(), 2);
    }
}
