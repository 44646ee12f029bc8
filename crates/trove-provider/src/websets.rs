//! Webset create/get/list/delete/cancel/preview operations.

use crate::http::check_response;
use crate::types::{CreateWebsetParams, PreviewParams, PreviewResponse, Webset, WebsetList};
use crate::{ProviderError, WebsetsClient};

impl WebsetsClient {
    /// Create a webset. Conflicting `external_id` surfaces as
    /// [`ProviderError::Conflict`]; the creation workflow in `trove-websets`
    /// handles recovery.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] on transport failure, non-success status, or
    /// an unparseable response body.
    pub async fn create_webset(&self, params: &CreateWebsetParams) -> Result<Webset, ProviderError> {
        let alias = params.external_id.as_deref().unwrap_or_default();
        let resp = self.post("/websets").json(params).send().await?;
        let resp = check_response(resp, alias).await?;
        Ok(resp.json().await?)
    }

    /// Fetch a webset by id or external id, optionally expanding
    /// sub-resources (`searches`, `enrichments`, `monitors`, `items`).
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the request or parsing fails.
    pub async fn get_webset(&self, id: &str, expand: &[&str]) -> Result<Webset, ProviderError> {
        let mut req = self.get(&format!("/websets/{id}"));
        if !expand.is_empty() {
            req = req.query(&[("expand", expand.join(","))]);
        }
        let resp = check_response(req.send().await?, "").await?;
        Ok(resp.json().await?)
    }

    /// List websets. No ordering is guaranteed by the provider.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the request or parsing fails.
    pub async fn list_websets(&self) -> Result<WebsetList, ProviderError> {
        let resp = check_response(self.get("/websets").send().await?, "").await?;
        Ok(resp.json().await?)
    }

    /// Delete a webset. Idempotent on the provider side.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the request fails.
    pub async fn delete_webset(&self, id: &str) -> Result<(), ProviderError> {
        check_response(self.delete(&format!("/websets/{id}")).send().await?, "").await?;
        Ok(())
    }

    /// Cancel all running operations on a webset.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the request fails.
    pub async fn cancel_webset(&self, id: &str) -> Result<(), ProviderError> {
        check_response(
            self.post(&format!("/websets/{id}/cancel")).send().await?,
            "",
        )
        .await?;
        Ok(())
    }

    /// Preview what a query would detect (entity type, criteria, suggested
    /// enrichments, up to 10 sample items) without creating anything.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the request or parsing fails.
    pub async fn preview_webset(
        &self,
        params: &PreviewParams,
    ) -> Result<PreviewResponse, ProviderError> {
        let resp = self.post("/websets/preview").json(params).send().await?;
        let resp = check_response(resp, "").await?;
        Ok(resp.json().await?)
    }
}
