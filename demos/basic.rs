//! # Example: basic
//!
//! Minimal example: add 5 to a batch of numbers over a pool of two workers.
//!
//! Demonstrates how to:
//! - Define an action using [`ActionFn`].
//! - Run it over a batch with [`Reactor::run`].
//! - Read results (completion order, `None` for failed tasks).
//!
//! ## Flow
//! ```text
//! Reactor::run([1..=5], add_5)
//!     ├─► publish(RunStarting)
//!     ├─► load [1, 2, 3, 4, 5, PILL, PILL]
//!     ├─► worker_0, worker_1: fetch ─► add_5 ─► post
//!     ├─► collect 5 results
//!     └─► join workers ─► publish(RunFinished)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic
//! ```

use taskreactor::{ActionError, ActionFn, ActionRef, Config, Reactor};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Lenient mode: failures leave a `None` slot
    let mut cfg = Config::new(false);
    cfg.parallelism = 2;

    // 2. The action applied to every task
    let add_5: ActionRef<String, i64> = ActionFn::arc("add_5", |s: String| async move {
        let n: i64 = s.parse().map_err(ActionError::fail)?;
        Ok::<_, ActionError>(n + 5)
    });

    // 3. One reactor per batch
    let reactor = Reactor::new(cfg);
    let tasks = ["1", "2", "three", "4", "5"].map(String::from).to_vec();

    let results = reactor.run(tasks, add_5).await?;
    for (i, result) in results.iter().enumerate() {
        match result {
            Some(n) => println!("[basic] result #{i}: {n}"),
            None => println!("[basic] result #{i}: failed"),
        }
    }
    Ok(())
}
