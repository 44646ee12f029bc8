//! Ledger error types.

use thiserror::Error;

/// Errors from the credit ledger service.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The ledger endpoint returned a non-success status.
    #[error("Ledger API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Transport-level failure.
    #[error("Ledger request failed: {0}")]
    Http(#[from] reqwest::Error),
}
