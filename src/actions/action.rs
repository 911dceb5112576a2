//! # Action abstraction.
//!
//! An [`Action`] is the single operation a reactor applies to every task of a
//! run. Workers share it as an `Arc<A>`, so an action must be `Send + Sync +
//! 'static` and must not borrow anything from the caller; whatever state it
//! needs it owns (or holds behind an `Arc`).
//!
//! Each invocation produces a fresh `'static` future ([`BoxActionFuture`]).
//! Failures are reported as [`ActionError`]; a panic while creating or polling
//! the future is caught by the worker and treated like a failure.

use std::{future::Future, pin::Pin, sync::Arc};

use crate::error::ActionError;

/// Boxed future returned by [`Action::call`].
pub type BoxActionFuture<O> =
    Pin<Box<dyn Future<Output = Result<O, ActionError>> + Send + 'static>>;

/// Shared handle to a type-erased action.
pub type ActionRef<T, O> = Arc<dyn Action<T, Output = O>>;

/// # Unit of work applied to each task.
///
/// # Example
/// ```
/// use taskreactor::{Action, ActionError, BoxActionFuture};
///
/// struct Add(i64);
///
/// impl Action<i64> for Add {
///     type Output = i64;
///
///     fn name(&self) -> &str { "add" }
///
///     fn call(&self, task: i64) -> BoxActionFuture<i64> {
///         let n = self.0;
///         Box::pin(async move {
///             task.checked_add(n).ok_or_else(|| ActionError::fail("overflow"))
///         })
///     }
/// }
/// ```
pub trait Action<T>: Send + Sync + 'static {
    /// Value produced for a successful task.
    type Output: Send + 'static;

    /// Returns a stable, human-readable action name (used in error records and events).
    fn name(&self) -> &str;

    /// Creates the future that processes one task.
    fn call(&self, task: T) -> BoxActionFuture<Self::Output>;
}
