//! # Example: stop_on_error
//!
//! The first failing task aborts the run and stops every worker; the built-in
//! [`LogWriter`] shows the sequence of events.
//!
//! Demonstrates how to:
//! - Enable stop-on-error in [`Config`].
//! - Attach [`LogWriter`] through [`Reactor::builder`].
//! - Handle [`ReactorError::Aborted`].
//!
//! ## Flow
//! ```text
//! Reactor::run()
//!     ├─► worker_k: action fails ─► publish(TaskFailed), send ErrorRecord
//!     ├─► collector sees the record ─► StopBroadcaster::broadcast ─► publish(StopBroadcast)
//!     ├─► idle workers drain to their pill ─► publish(WorkerStopped)
//!     └─► publish(RunAborted) ─► Err(Aborted)
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example stop_on_error --features logging
//! ```

use std::{sync::Arc, time::Duration};

use taskreactor::{ActionError, ActionFn, ActionRef, Config, LogWriter, Reactor, ReactorError};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut cfg = Config::new(true);
    cfg.parallelism = 3;
    cfg.result_timeout = Duration::from_secs(10);

    let reactor = Reactor::builder(cfg)
        .with_subscriber(Arc::new(LogWriter::new()))
        .build();

    let slow_add_5: ActionRef<String, i64> = ActionFn::arc("slow_add_5", |s: String| async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let n: i64 = s
            .parse()
            .map_err(|_| ActionError::fail(format!("cannot add 5 to {s:?}")))?;
        Ok::<_, ActionError>(n + 5)
    });

    let tasks = ["1", "2", "3", "q", "5", "6", "7", "8", "9"]
        .map(String::from)
        .to_vec();

    match reactor.run(tasks, slow_add_5).await {
        Ok(results) => println!("[stop_on_error] all done: {results:?}"),
        Err(ReactorError::Aborted { record }) => {
            println!("[stop_on_error] aborted by {}: {}", record.worker, record.error);
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
