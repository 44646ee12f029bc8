//! State store error types.

use thiserror::Error;

/// Errors from scope document operations.
#[derive(Debug, Error)]
pub enum StateError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Stored document content is not valid JSON.
    #[error("Corrupt document for scope '{scope_id}': {reason}")]
    CorruptDocument { scope_id: String, reason: String },

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
