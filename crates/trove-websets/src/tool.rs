//! The agent-invocable websets tool.
//!
//! One instance per conversation scope. Operations live in [`crate::ops`],
//! split by sub-resource; this module holds the shared construction, billing
//! and state plumbing, and the error-to-failure boundary every operation
//! passes through.

use std::sync::Arc;

use trove_billing::HttpCreditLedger;
use trove_config::{BillingMode, TroveConfig};
use trove_core::{ScopeContext, ToolResult, WebsetsState};
use trove_provider::{ProviderError, WebsetsClient};
use trove_state::StateStore;

use crate::error::WebsetsError;

/// Scope id used for tracked state when no conversation scope is attached
/// (CLI and local runs).
const LOCAL_SCOPE_ID: &str = "local";

/// Agent-facing websets tool.
pub struct WebsetsTool {
    pub(crate) client: Option<WebsetsClient>,
    pub(crate) ledger: Option<HttpCreditLedger>,
    pub(crate) store: Arc<StateStore>,
    pub(crate) scope: Option<ScopeContext>,
    pub(crate) billing_mode: BillingMode,
}

impl WebsetsTool {
    /// Build a tool instance from loaded configuration.
    ///
    /// A missing provider key does not fail construction; every operation
    /// then reports the not-configured message instead. The same applies to
    /// the ledger in metered mode.
    #[must_use]
    pub fn new(config: &TroveConfig, store: Arc<StateStore>, scope: Option<ScopeContext>) -> Self {
        let client = config.provider.is_configured().then(|| {
            WebsetsClient::new(
                &config.provider.base_url,
                &config.provider.api_key,
                config.provider.timeout_secs,
            )
        });
        let ledger = config
            .ledger
            .is_configured()
            .then(|| HttpCreditLedger::new(&config.ledger.base_url, &config.ledger.service_token));
        Self {
            client,
            ledger,
            store,
            scope,
            billing_mode: config.general.billing_mode,
        }
    }

    pub(crate) fn client(&self) -> Result<&WebsetsClient, WebsetsError> {
        self.client.as_ref().ok_or(WebsetsError::NotConfigured)
    }

    /// The ledger and scope to bill against, or `None` in unmetered mode.
    pub(crate) fn billing(
        &self,
    ) -> Result<Option<(&HttpCreditLedger, &ScopeContext)>, WebsetsError> {
        match self.billing_mode {
            BillingMode::Unmetered => Ok(None),
            BillingMode::Metered => {
                let ledger = self.ledger.as_ref().ok_or(WebsetsError::NoBillingContext)?;
                let scope = self.scope.as_ref().ok_or(WebsetsError::NoBillingContext)?;
                Ok(Some((ledger, scope)))
            }
        }
    }

    pub(crate) fn state_scope(&self) -> &str {
        self.scope
            .as_ref()
            .map_or(LOCAL_SCOPE_ID, |s| s.scope_id.as_str())
    }

    pub(crate) async fn load_state(&self) -> WebsetsState {
        self.store
            .load_websets_state_or_default(self.state_scope())
            .await
    }

    pub(crate) async fn save_state(&self, state: &WebsetsState) -> Result<(), WebsetsError> {
        self.store
            .save_websets_state(self.state_scope(), state)
            .await?;
        Ok(())
    }

    /// Convert an operation error into the agent-facing failure payload.
    /// `context` is the operation phrasing, e.g. `"create webset"`.
    pub(crate) fn failure(context: &str, err: &WebsetsError) -> ToolResult {
        let message = match err {
            WebsetsError::NotConfigured => {
                "Websets is not available. The search provider API key is not configured. \
                 Please contact your administrator to enable this feature."
                    .to_string()
            }
            WebsetsError::InvalidInput(message) => message.clone(),
            WebsetsError::NoBillingContext => {
                "No active session context for billing. This tool requires an active agent session."
                    .to_string()
            }
            WebsetsError::CreationExhausted { attempts, .. } => format!(
                "Failed to create webset after {attempts} attempts. \
                 The external_id may already exist and could not be retrieved."
            ),
            WebsetsError::InsufficientCredits { required } => format!(
                "Insufficient credits. This operation costs {required} credits. \
                 Please add credits to continue."
            ),
            WebsetsError::Provider(ProviderError::Auth { .. }) => {
                "Authentication failed with the search provider. \
                 Please check your API key configuration."
                    .to_string()
            }
            WebsetsError::Provider(ProviderError::BadRequest { .. }) => {
                "Invalid request to the search provider. Please check your query format."
                    .to_string()
            }
            other => format!("Failed to {context}: {other}"),
        };
        tracing::warn!(context, error = %err, "tool operation failed");
        ToolResult::fail(message)
    }
}

/// Map a frequency keyword to a cron expression; anything unrecognized is
/// passed through as a custom cron string.
#[must_use]
pub(crate) fn cron_for_frequency(frequency: &str) -> String {
    match frequency.to_lowercase().as_str() {
        "daily" => "0 9 * * *".to_string(),
        "weekly" => "0 9 * * 1".to_string(),
        "hourly" => "0 * * * *".to_string(),
        _ => frequency.to_string(),
    }
}
