//! # trove-provider
//!
//! HTTP client for the search provider's Websets API.
//!
//! A webset is a provider-managed collection of entities matching a natural
//! language query, populated asynchronously. This crate wraps the provider's
//! REST surface for websets and their sub-resources (searches, enrichments,
//! monitors, items) with typed request/response structs and typed error
//! classification at the HTTP seam — callers match on
//! [`ProviderError::Conflict`] instead of grepping error text.

mod enrichments;
mod error;
mod http;
mod items;
mod monitors;
mod searches;
pub mod types;
mod websets;

pub use error::ProviderError;
pub use types::{
    Cadence, CreateEnrichmentParams, CreateMonitorParams, CreateSearchParams, CreateWebsetParams,
    Criterion, Entity, Enrichment, EnrichmentOption, ItemEnrichment, ItemEvaluation, ItemsPage,
    Monitor, MonitorBehavior, MonitorRun, MonitorSearchConfig, PreviewParams, PreviewResponse,
    Search, SearchProgress, UpdateMonitorParams, Webset, WebsetItem, WebsetList,
};

use std::time::Duration;

/// HTTP client for the provider's Websets API.
///
/// Cheap to clone is not a goal here; construct once and share by reference.
pub struct WebsetsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WebsetsClient {
    /// Create a client against the given base URL (no trailing slash).
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent("trove/0.1")
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .expect("reqwest client should build"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.get(self.url(path)).bearer_auth(&self.api_key)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.post(self.url(path)).bearer_auth(&self.api_key)
    }

    fn patch(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.patch(self.url(path)).bearer_auth(&self.api_key)
    }

    fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.delete(self.url(path)).bearer_auth(&self.api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_stripped() {
        let client = WebsetsClient::new("https://api.example.com/v0/", "key", 30);
        assert_eq!(client.url("/websets"), "https://api.example.com/v0/websets");
    }
}
