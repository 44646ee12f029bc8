//! Tool-level error taxonomy.
//!
//! Every public tool operation catches these at its boundary and converts
//! them to a failure payload with a short actionable message; nothing
//! propagates to the agent runtime as a hard failure.

use thiserror::Error;
use trove_billing::LedgerError;
use trove_provider::ProviderError;
use trove_state::StateError;

#[derive(Debug, Error)]
pub enum WebsetsError {
    /// Provider credentials absent. Checked first; short-circuits every
    /// operation.
    #[error("search provider is not configured")]
    NotConfigured,

    /// A required field is missing or out of range.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No active conversation scope to bill against.
    #[error("no active session context for billing")]
    NoBillingContext,

    /// The creation-with-dedup workflow ran out of attempts.
    #[error("failed to create webset after {attempts} attempts (last alias: '{last_alias}')")]
    CreationExhausted { attempts: u32, last_alias: String },

    /// Ledger declined the debit.
    #[error("insufficient credits: operation requires {required} credits")]
    InsufficientCredits { required: u64 },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    State(#[from] StateError),
}
