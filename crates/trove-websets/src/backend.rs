//! Seam over the provider operations the creation workflows depend on.
//!
//! `WebsetsClient` is the production implementation; workflow tests use
//! in-memory fakes to exercise the retry bound and rollback paths without a
//! network.

use trove_provider::{CreateWebsetParams, ProviderError, Webset, WebsetList, WebsetsClient};

/// Provider operations used by creation-with-dedup and charge rollback.
pub trait WebsetBackend {
    fn create(
        &self,
        params: &CreateWebsetParams,
    ) -> impl Future<Output = Result<Webset, ProviderError>> + Send;

    fn list(&self) -> impl Future<Output = Result<WebsetList, ProviderError>> + Send;

    /// Fetch a webset with searches and enrichments expanded.
    fn get_expanded(&self, id: &str)
    -> impl Future<Output = Result<Webset, ProviderError>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = Result<(), ProviderError>> + Send;
}

impl WebsetBackend for WebsetsClient {
    async fn create(&self, params: &CreateWebsetParams) -> Result<Webset, ProviderError> {
        self.create_webset(params).await
    }

    async fn list(&self) -> Result<WebsetList, ProviderError> {
        self.list_websets().await
    }

    async fn get_expanded(&self, id: &str) -> Result<Webset, ProviderError> {
        self.get_webset(id, &["searches", "enrichments"]).await
    }

    async fn delete(&self, id: &str) -> Result<(), ProviderError> {
        self.delete_webset(id).await
    }
}
