//! Agent-platform API configuration.

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "https://api.trove.dev/v1".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlatformConfig {
    /// API key for the agent-platform API.
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the agent-platform API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl PlatformConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
        }
    }
}
