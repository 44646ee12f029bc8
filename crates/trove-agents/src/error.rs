//! Platform client error types.

use thiserror::Error;

/// Errors from the agent-platform API.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The platform returned a non-success status.
    #[error("Platform API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure.
    #[error("Platform request failed: {0}")]
    Http(#[from] reqwest::Error),
}
