//! # Function-backed action (`ActionFn`)
//!
//! [`ActionFn`] wraps a closure `F: Fn(T) -> Fut`, producing a fresh future per
//! task. The closure is shared by every worker, so it is `Fn` (not `FnMut`); if
//! shared state is needed, capture an `Arc<...>` explicitly.
//!
//! ## Example
//! ```rust
//! use taskreactor::{Action, ActionError, ActionFn, ActionRef};
//!
//! let add_5: ActionRef<i64, i64> =
//!     ActionFn::arc("add_5", |x: i64| async move { Ok::<_, ActionError>(x + 5) });
//! assert_eq!(add_5.name(), "add_5");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use crate::actions::action::{Action, BoxActionFuture};
use crate::error::ActionError;

/// Function-backed async action.
#[derive(Debug)]
pub struct ActionFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ActionFn<F> {
    /// Creates a new function-backed action.
    ///
    /// Prefer [`ActionFn::arc`] when you immediately pass it to a reactor.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the action and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<T, F, Fut, O> Action<T> for ActionFn<F>
where
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, ActionError>> + Send + 'static,
    O: Send + 'static,
{
    type Output = O;

    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, task: T) -> BoxActionFuture<O> {
        Box::pin((self.f)(task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionRef;

    #[tokio::test]
    async fn produces_a_fresh_future_per_task() {
        let action: ActionRef<u32, u32> = ActionFn::arc("double", |x: u32| async move {
            if x == 0 {
                Err(ActionError::fail("zero"))
            } else {
                Ok(x * 2)
            }
        });

        assert_eq!(action.call(4).await, Ok(8));
        assert_eq!(action.call(0).await, Err(ActionError::fail("zero")));
        assert_eq!(action.call(5).await, Ok(10));
    }
}
