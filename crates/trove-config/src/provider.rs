//! Search provider (Websets API) configuration.

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "https://api.websets.dev/v0".to_string()
}

/// Default per-request timeout in seconds.
const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// API key for the search provider. The websets tool is disabled when
    /// this is empty.
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the provider's Websets API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    /// Whether enough is configured to construct a provider client.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_without_api_key() {
        let config = ProviderConfig::default();
        assert!(!config.is_configured());
        assert!(config.base_url.starts_with("https://"));
    }
}
