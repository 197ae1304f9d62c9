//! Error types for policy checks and plan execution.

use deskpilot_desktop::DesktopError;
use thiserror::Error;

/// A safety policy rejection, naming the value that failed the check.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("app not allowed by safety policy: {0}")]
    AppNotAllowed(String),
    #[error("URL not allowed by safety policy: {0}")]
    UrlNotAllowed(String),
    #[error("command not allowed by safety policy: {0}")]
    CommandNotAllowed(String),
    #[error("delete requires confirm=true per safety policy: {0}")]
    ConfirmRequired(String),
}

/// Errors from executing a plan.
///
/// A single step's failure aborts the entire plan; the interpreter wraps
/// the cause in [`ExecError::Step`] so the report always carries the
/// 1-based step index and action name. `wait_for_image` timing out and an
/// unknown `if_condition` predicate are the only non-raising outcomes.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error("{0}")]
    NotFound(String),
    #[error("capability unavailable: {0}")]
    CapabilityUnavailable(&'static str),
    #[error(transparent)]
    Desktop(#[from] DesktopError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("step {index} ({action}): {source}")]
    Step {
        index: usize,
        action: String,
        #[source]
        source: Box<ExecError>,
    },
}
