//! # trove-config
//!
//! Layered configuration loading for Trove using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TROVE_*` prefix, `__` as separator)
//! 2. Project-level `.trove/config.toml`
//! 3. User-level `~/.config/trove/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `TROVE_PROVIDER__API_KEY` -> `provider.api_key`,
//! `TROVE_LEDGER__BASE_URL` -> `ledger.base_url`, etc. The `__` (double
//! underscore) separates nested config sections.

mod error;
mod general;
mod ledger;
mod platform;
mod provider;

pub use error::ConfigError;
pub use general::{BillingMode, GeneralConfig};
pub use ledger::LedgerConfig;
pub use platform::PlatformConfig;
pub use provider::ProviderConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TroveConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub platform: PlatformConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl TroveConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any source fails to parse or merge.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// This is the typical entry point for the CLI and for tests.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any source fails to parse or merge.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add additional
    /// providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".trove/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("TROVE_").split("__"));

        figment
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("trove").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir
    /// looking for a `.env` file. Silently does nothing if none is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = TroveConfig::default();
        assert!(!config.provider.is_configured());
        assert!(!config.ledger.is_configured());
        assert!(!config.platform.is_configured());
        assert_eq!(config.general.billing_mode, BillingMode::Metered);
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config: TroveConfig = TroveConfig::figment().extract()?;
            assert!(!config.provider.is_configured());
            assert_eq!(config.general.http_bind, "127.0.0.1:8710");
            Ok(())
        });
    }

    #[test]
    fn env_vars_override_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("TROVE_PROVIDER__API_KEY", "test-key");
            jail.set_env("TROVE_GENERAL__BILLING_MODE", "unmetered");
            let config: TroveConfig = TroveConfig::figment().extract()?;
            assert!(config.provider.is_configured());
            assert_eq!(config.provider.api_key, "test-key");
            assert_eq!(config.general.billing_mode, BillingMode::Unmetered);
            Ok(())
        });
    }
}
