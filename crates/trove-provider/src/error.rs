//! Provider error types.

use thiserror::Error;

/// Errors from the Websets API, classified by HTTP status at the client seam.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 409: a resource with the supplied external id already exists. The
    /// creation workflow recovers from this; everything else escalates.
    #[error("Conflict: a resource with external id '{external_id}' already exists")]
    Conflict { external_id: String },

    /// 401/403: credentials rejected.
    #[error("Authentication with the search provider failed: {message}")]
    Auth { message: String },

    /// 400: the provider rejected the request shape.
    #[error("Provider rejected the request: {message}")]
    BadRequest { message: String },

    /// 404: the resource does not exist (or was deleted).
    #[error("Resource not found: {message}")]
    NotFound { message: String },

    /// Any other non-success status.
    #[error("Provider API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}
