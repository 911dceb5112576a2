//! Error types used by the reactor and by actions.
//!
//! This module defines two main error enums:
//!
//! - [`ReactorError`]: errors raised by a reactor run itself.
//! - [`ActionError`]: errors raised by a single action invocation.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//! [`ErrorRecord`] is the formatted failure a worker reports to the collector.

use std::{any::Any, fmt, sync::Arc, time::Duration};
use thiserror::Error;

/// # Errors produced by a reactor run.
///
/// Per-task failures never show up here unless the reactor runs in
/// stop-on-error mode, where the first one aborts the run.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ReactorError {
    /// The reactor already ran once; instances are single-use.
    #[error("reactor is spent; create a new reactor for every run")]
    Spent,

    /// A task failed while `stop_on_error` was set; every worker was stopped.
    #[error("run aborted: {record}")]
    Aborted {
        /// The first failure observed by the collector.
        record: ErrorRecord,
    },

    /// Workers did not exit within the configured join grace and were aborted.
    #[error("workers did not exit within {grace:?}; stuck: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Names of the workers that were still running.
        stuck: Vec<String>,
    },
}

impl ReactorError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskreactor::ReactorError;
    ///
    /// assert_eq!(ReactorError::Spent.as_label(), "reactor_spent");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ReactorError::Spent => "reactor_spent",
            ReactorError::Aborted { .. } => "reactor_aborted",
            ReactorError::GraceExceeded { .. } => "reactor_grace_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ReactorError::Spent => "reactor already ran".to_string(),
            ReactorError::Aborted { record } => format!("aborted: {record}"),
            ReactorError::GraceExceeded { grace, stuck } => {
                format!("grace exceeded after {grace:?}; stuck workers={stuck:?}")
            }
        }
    }

    /// Returns the failure that aborted the run, if any.
    pub fn record(&self) -> Option<&ErrorRecord> {
        match self {
            ReactorError::Aborted { record } => Some(record),
            _ => None,
        }
    }
}

/// # Errors produced by a single action invocation.
///
/// Workers catch both variants locally; they turn into a `None` result and an
/// [`ErrorRecord`] instead of ending the worker.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// The action returned an error.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The action panicked.
    #[error("panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl ActionError {
    /// Shorthand for [`ActionError::Fail`] from anything displayable.
    ///
    /// # Example
    /// ```
    /// use taskreactor::ActionError;
    ///
    /// let err = ActionError::fail("bad input");
    /// assert_eq!(err.to_string(), "execution failed: bad input");
    /// ```
    pub fn fail(error: impl fmt::Display) -> Self {
        ActionError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ActionError::Fail { .. } => "action_failed",
            ActionError::Panicked { .. } => "action_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ActionError::Fail { error } => format!("error: {error}"),
            ActionError::Panicked { info } => format!("panic: {info}"),
        }
    }

    /// Converts a caught panic payload into [`ActionError::Panicked`].
    pub(crate) fn from_panic(payload: &(dyn Any + Send)) -> Self {
        ActionError::Panicked {
            info: panic_message(payload),
        }
    }
}

/// Renders a panic payload as text.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// A failure reported by a worker over the error channel.
///
/// Rendered as `<worker>: action "<name>" <error>`, e.g.
/// `worker_2: action "add_5" execution failed: not a number`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    /// Name of the worker that ran the action.
    pub worker: Arc<str>,
    /// Name of the action.
    pub action: Arc<str>,
    /// The failure itself.
    pub error: ActionError,
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: action {:?} {}", self.worker, self.action, self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aborted_message_carries_the_record() {
        let err = ReactorError::Aborted {
            record: ErrorRecord {
                worker: "worker_1".into(),
                action: "add_5".into(),
                error: ActionError::fail("cannot add 5 to \"q\""),
            },
        };
        let text = err.to_string();
        assert!(text.starts_with("run aborted: worker_1"));
        assert!(text.contains("cannot add 5 to \"q\""));
        assert_eq!(err.as_label(), "reactor_aborted");
        assert!(err.record().is_some());
    }

    #[test]
    fn panic_payloads_are_rendered() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(
            ActionError::from_panic(boxed.as_ref()),
            ActionError::Panicked {
                info: "boom".into()
            }
        );

        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned boom"));
        assert_eq!(ActionError::from_panic(boxed.as_ref()).as_message(), "panic: owned boom");

        let boxed: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(ActionError::from_panic(boxed.as_ref()).as_label(), "action_panicked");
    }

    #[test]
    fn spent_has_no_record() {
        assert!(ReactorError::Spent.record().is_none());
        assert_eq!(ReactorError::Spent.as_message(), "reactor already ran");
    }
}
