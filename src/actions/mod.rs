//! # Action abstractions.
//!
//! This module provides the action-related types:
//! - [`Action`] - trait for the operation applied to each task
//! - [`ActionFn`] - async closure-backed action
//! - [`BlockingFn`] - synchronous closure run on the blocking thread pool
//! - [`ActionRef`] - shared, type-erased action (`Arc<dyn Action<T, Output = O>>`)

mod action;
mod action_fn;
mod blocking_fn;

pub use action::{Action, ActionRef, BoxActionFuture};
pub use action_fn::ActionFn;
pub use blocking_fn::BlockingFn;
