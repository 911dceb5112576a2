//! # Example: correlated
//!
//! Pairs every result with the task that produced it, and runs a CPU-bound
//! action on the blocking thread pool.
//!
//! Demonstrates how to:
//! - Define a synchronous action with [`BlockingFn`].
//! - Use [`Reactor::run_correlated`] to get `(task, result)` pairs.
//! - Watch the raw event stream with [`Reactor::subscribe`].
//!
//! ## Run
//! ```bash
//! cargo run --example correlated
//! ```

use taskreactor::{ActionError, ActionRef, BlockingFn, Config, EventKind, Reactor};

/// Naive primality check; slow on purpose.
fn is_prime(n: u64) -> bool {
    n >= 2 && (2..n).take_while(|d| d * d <= n).all(|d| n % d != 0)
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = Config::new(false);
    cfg.parallelism = 4;

    let check: ActionRef<u64, bool> = BlockingFn::arc("is_prime", |n: u64| {
        if n == 0 {
            return Err(ActionError::fail("zero is not a candidate"));
        }
        Ok(is_prime(n))
    });

    let reactor = Reactor::new(cfg);
    let mut events = reactor.subscribe();

    let tasks = vec![0, 7, 12, 97, 1_000_003, 1_000_004];
    let mut pairs = reactor.run_correlated(tasks, check).await?;
    pairs.sort_by_key(|(n, _)| *n);

    for (n, prime) in &pairs {
        match prime {
            Some(true) => println!("[correlated] {n} is prime"),
            Some(false) => println!("[correlated] {n} is composite"),
            None => println!("[correlated] {n} failed"),
        }
    }

    while let Ok(ev) = events.try_recv() {
        if ev.kind == EventKind::TaskFailed {
            println!(
                "[correlated] {} failed a task: {}",
                ev.worker.as_deref().unwrap_or("?"),
                ev.reason.as_deref().unwrap_or("?")
            );
        }
    }
    Ok(())
}
