//! Error type for capability backends.

use thiserror::Error;

/// Errors reported by desktop capability backends.
///
/// A missing backend is not an error here: it is represented by the absence
/// of the trait object in [`crate::DesktopCapabilities`], and surfaces as a
/// capability-unavailable failure at dispatch time in the engine.
#[derive(Debug, Error)]
pub enum DesktopError {
    #[error("desktop backend error: {0}")]
    Backend(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
