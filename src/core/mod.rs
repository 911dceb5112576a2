//! Runtime core: task distribution and result collection.
//!
//! The public API from this module is [`Reactor`] (with its [`ReactorBuilder`])
//! and [`Config`].
//!
//! Internal modules:
//! - [`channels`]: messages exchanged between the reactor and its workers;
//! - [`loader`]: fills the task channel with tasks and poison pills;
//! - [`worker`]: the per-worker fetch / execute / post loop;
//! - [`pool`]: spawns and joins the workers of a run;
//! - [`stop`]: stop-on-error signal delivered to every worker;
//! - [`collector`]: gathers results with timeout and abort handling;
//! - [`reactor`]: ties one run together.

mod builder;
mod channels;
mod collector;
mod config;
mod loader;
mod pool;
mod reactor;
mod stop;
mod worker;

pub use builder::ReactorBuilder;
pub use config::Config;
pub use reactor::Reactor;
