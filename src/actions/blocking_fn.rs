//! # Blocking action (`BlockingFn`)
//!
//! [`BlockingFn`] wraps a synchronous closure `F: Fn(T) -> Result<O, ActionError>`
//! and runs every invocation on tokio's blocking thread pool
//! (`tokio::task::spawn_blocking`). Use it for CPU-bound or blocking work so
//! that workers execute in parallel without starving the async runtime.
//!
//! A panic inside the closure surfaces as [`ActionError::Panicked`].
//!
//! ## Example
//! ```rust
//! use taskreactor::{ActionError, BlockingFn, ActionRef};
//!
//! let checksum: ActionRef<Vec<u8>, u32> = BlockingFn::arc("checksum", |bytes: Vec<u8>| {
//!     Ok::<_, ActionError>(bytes.iter().map(|b| u32::from(*b)).sum::<u32>())
//! });
//! ```

use std::borrow::Cow;
use std::sync::Arc;

use crate::actions::action::{Action, BoxActionFuture};
use crate::error::ActionError;

/// Synchronous action executed on the blocking thread pool.
#[derive(Debug)]
pub struct BlockingFn<F> {
    name: Cow<'static, str>,
    f: Arc<F>,
}

impl<F> BlockingFn<F> {
    /// Creates a new blocking action.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }

    /// Creates the action and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<T, F, O> Action<T> for BlockingFn<F>
where
    T: Send + 'static,
    F: Fn(T) -> Result<O, ActionError> + Send + Sync + 'static,
    O: Send + 'static,
{
    type Output = O;

    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, task: T) -> BoxActionFuture<O> {
        let f = Arc::clone(&self.f);
        let handle = tokio::task::spawn_blocking(move || f(task));

        Box::pin(async move {
            match handle.await {
                Ok(res) => res,
                Err(join_err) if join_err.is_panic() => {
                    Err(ActionError::from_panic(&*join_err.into_panic()))
                }
                Err(join_err) => Err(ActionError::fail(join_err)),
            }
        })
    }
}
