//! # Reactor configuration.
//!
//! Provides [`Config`], the settings of a single [`Reactor`](crate::Reactor) run.
//!
//! ## Sentinel values
//! - `parallelism = 0` → treated as `1` (a run always has at least one worker)
//! - `result_timeout = 0s` → wait indefinitely for every result
//! - `grace = 0s` → wait indefinitely for workers to exit
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use taskreactor::Config;
//!
//! let mut cfg = Config::new(true);
//! cfg.parallelism = 2;
//! cfg.result_timeout = Duration::from_secs(30);
//!
//! assert!(cfg.stop_on_error);
//! assert_eq!(cfg.result_timeout(), Some(Duration::from_secs(30)));
//! ```

use std::time::Duration;

/// Configuration of a reactor.
///
/// ## Field semantics
/// - `stop_on_error`: abort every worker on the first failed task
/// - `parallelism`: upper bound on spawned workers (min 1; clamped)
/// - `result_timeout`: max wait for the next result (`0s` = no bound)
/// - `grace`: max wait for workers to exit once collection ends (`0s` = no bound)
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped)
///
/// ## Notes
/// All fields are public for flexibility. Prefer using helper accessors to avoid
/// sprinkling sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct Config {
    /// Abort the run as soon as any task fails.
    ///
    /// - `false`: failed tasks yield `None` results, the run always completes
    /// - `true`: the first failure stops all workers and `run` returns
    ///   [`ReactorError::Aborted`](crate::ReactorError::Aborted)
    pub stop_on_error: bool,

    /// Number of workers to spawn.
    ///
    /// The pool is sized to `min(parallelism, tasks.len())`.
    pub parallelism: usize,

    /// Maximum time to wait for the next result.
    ///
    /// Recommended to be the longest time a single task may take. When it
    /// expires the remaining tasks are treated as abandoned and the returned
    /// list is shorter than the task list.
    pub result_timeout: Duration,

    /// Maximum time to wait for workers to exit after collection ends.
    ///
    /// When exceeded, remaining workers are aborted and the run returns
    /// [`ReactorError::GraceExceeded`](crate::ReactorError::GraceExceeded).
    pub grace: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` events skip
    /// older items.
    pub bus_capacity: usize,
}

impl Config {
    /// Default configuration with the given stop-on-error mode.
    pub fn new(stop_on_error: bool) -> Self {
        Self {
            stop_on_error,
            ..Self::default()
        }
    }

    /// Returns the worker upper bound, clamped to a minimum of 1.
    #[inline]
    pub fn parallelism_clamped(&self) -> usize {
        self.parallelism.max(1)
    }

    /// Returns the result timeout as an `Option`.
    ///
    /// - `None` → wait indefinitely
    /// - `Some(d)` → bound every result read by `d`
    #[inline]
    pub fn result_timeout(&self) -> Option<Duration> {
        if self.result_timeout == Duration::ZERO {
            None
        } else {
            Some(self.result_timeout)
        }
    }

    /// Returns the join grace as an `Option`.
    ///
    /// - `None` → wait for workers indefinitely
    /// - `Some(d)` → abort workers still running after `d`
    #[inline]
    pub fn join_grace(&self) -> Option<Duration> {
        if self.grace == Duration::ZERO {
            None
        } else {
            Some(self.grace)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `stop_on_error = false`
    /// - `parallelism = 5`
    /// - `result_timeout = 300s`
    /// - `grace = 0s` (wait for workers indefinitely)
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            stop_on_error: false,
            parallelism: 5,
            result_timeout: Duration::from_secs(300),
            grace: Duration::ZERO,
            bus_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert!(!cfg.stop_on_error);
        assert_eq!(cfg.parallelism, 5);
        assert_eq!(cfg.result_timeout(), Some(Duration::from_secs(300)));
        assert_eq!(cfg.join_grace(), None);

        assert!(Config::new(true).stop_on_error);
    }

    #[test]
    fn sentinels_are_clamped() {
        let cfg = Config {
            stop_on_error: false,
            parallelism: 0,
            result_timeout: Duration::ZERO,
            grace: Duration::from_millis(10),
            bus_capacity: 0,
        };
        assert_eq!(cfg.parallelism_clamped(), 1);
        assert_eq!(cfg.result_timeout(), None);
        assert_eq!(cfg.join_grace(), Some(Duration::from_millis(10)));
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }
}
