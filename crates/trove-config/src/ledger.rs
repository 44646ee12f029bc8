//! Credit ledger service configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LedgerConfig {
    /// Base URL of the internal credit ledger service.
    #[serde(default)]
    pub base_url: String,

    /// Service token used to authenticate debit calls.
    #[serde(default)]
    pub service_token: String,
}

impl LedgerConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty()
    }
}
