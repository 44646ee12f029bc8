//! Thin CRUD client for the agent platform.
//!
//! Pure glue over the platform's REST surface: agents, threads, accounts.
//! No retries, no caching; callers own their failure handling.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::PlatformError;

/// Metadata marking an agent as the centrally-managed default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentMetadata {
    #[serde(default)]
    pub is_platform_default: bool,
    #[serde(default)]
    pub centrally_managed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_date: Option<String>,
}

/// An agent record as returned by the platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub agent_id: String,
    pub account_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub metadata: AgentMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Request body for agent creation.
#[derive(Debug, Clone, Serialize)]
pub struct CreateAgentRequest {
    pub account_id: String,
    pub name: String,
    pub description: String,
    pub is_default: bool,
    pub icon_name: String,
    pub icon_color: String,
    pub icon_background: String,
    pub metadata: AgentMetadata,
}

/// A platform account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub personal_account: bool,
}

/// A conversation thread owned by an account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreadRecord {
    pub thread_id: String,
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

/// HTTP client for the agent platform.
pub struct PlatformClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PlatformClient {
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent("trove/0.1")
                .timeout(Duration::from_secs(30))
                .build()
                .expect("reqwest client should build"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, PlatformError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp.text().await.unwrap_or_default();
        Err(PlatformError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Create an agent.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the request or parsing fails.
    pub async fn create_agent(
        &self,
        request: &CreateAgentRequest,
    ) -> Result<AgentRecord, PlatformError> {
        let resp = self
            .http
            .post(self.url("/agents"))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    /// Fetch one agent.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the request or parsing fails.
    pub async fn get_agent(&self, agent_id: &str) -> Result<AgentRecord, PlatformError> {
        let resp = self
            .http
            .get(self.url(&format!("/agents/{agent_id}")))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    /// List agents, optionally filtered to one account and to centrally
    /// managed defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the request or parsing fails.
    pub async fn list_agents(
        &self,
        account_id: Option<&str>,
        default_only: bool,
    ) -> Result<Vec<AgentRecord>, PlatformError> {
        let mut url = format!("/agents?default_only={default_only}");
        if let Some(account_id) = account_id {
            url.push_str(&format!("&account_id={account_id}"));
        }
        let resp = self
            .http
            .get(self.url(&url))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let page: Page<AgentRecord> = Self::check(resp).await?.json().await?;
        Ok(page.data)
    }

    /// Delete an agent.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the request fails.
    pub async fn delete_agent(&self, agent_id: &str) -> Result<(), PlatformError> {
        let resp = self
            .http
            .delete(self.url(&format!("/agents/{agent_id}")))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Create a thread for an account.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the request or parsing fails.
    pub async fn create_thread(&self, account_id: &str) -> Result<ThreadRecord, PlatformError> {
        let resp = self
            .http
            .post(self.url("/threads"))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "account_id": account_id }))
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    /// List threads for an account.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the request or parsing fails.
    pub async fn list_threads(&self, account_id: &str) -> Result<Vec<ThreadRecord>, PlatformError> {
        let resp = self
            .http
            .get(self.url(&format!("/threads?account_id={account_id}")))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let page: Page<ThreadRecord> = Self::check(resp).await?.json().await?;
        Ok(page.data)
    }

    /// List accounts, optionally restricted to personal accounts.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the request or parsing fails.
    pub async fn list_accounts(&self, personal_only: bool) -> Result<Vec<Account>, PlatformError> {
        let resp = self
            .http
            .get(self.url(&format!("/accounts?personal={personal_only}")))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let page: Page<Account> = Self::check(resp).await?.json().await?;
        Ok(page.data)
    }
}
