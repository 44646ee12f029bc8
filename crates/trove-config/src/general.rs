//! General application configuration.

use serde::{Deserialize, Serialize};

/// Whether usage is charged against the credit ledger.
///
/// `Unmetered` is the privileged execution mode (local development, internal
/// deployments): operations report their would-be cost annotated as
/// unmetered and never touch the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingMode {
    #[default]
    Metered,
    Unmetered,
}

fn default_http_bind() -> String {
    "127.0.0.1:8710".to_string()
}

fn default_state_db_path() -> String {
    ".trove/state.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Whether operations are charged against the credit ledger.
    #[serde(default)]
    pub billing_mode: BillingMode,

    /// Bind address for the HTTP polling surface.
    #[serde(default = "default_http_bind")]
    pub http_bind: String,

    /// Path to the local scope-document database.
    #[serde(default = "default_state_db_path")]
    pub state_db_path: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            billing_mode: BillingMode::default(),
            http_bind: default_http_bind(),
            state_db_path: default_state_db_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert_eq!(config.billing_mode, BillingMode::Metered);
        assert_eq!(config.http_bind, "127.0.0.1:8710");
        assert_eq!(config.state_db_path, ".trove/state.db");
    }

    #[test]
    fn billing_mode_snake_case() {
        let mode: BillingMode = serde_json::from_str("\"unmetered\"").unwrap();
        assert_eq!(mode, BillingMode::Unmetered);
    }
}
