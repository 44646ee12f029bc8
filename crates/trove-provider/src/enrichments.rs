//! Enrichment sub-resource operations.

use crate::http::check_response;
use crate::types::{CreateEnrichmentParams, Enrichment};
use crate::{ProviderError, WebsetsClient};

impl WebsetsClient {
    /// Create an enrichment over all items in a webset.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the request or parsing fails.
    pub async fn create_enrichment(
        &self,
        webset_id: &str,
        params: &CreateEnrichmentParams,
    ) -> Result<Enrichment, ProviderError> {
        let resp = self
            .post(&format!("/websets/{webset_id}/enrichments"))
            .json(params)
            .send()
            .await?;
        let resp = check_response(resp, "").await?;
        Ok(resp.json().await?)
    }

    /// Fetch one enrichment.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the request or parsing fails.
    pub async fn get_enrichment(
        &self,
        webset_id: &str,
        enrichment_id: &str,
    ) -> Result<Enrichment, ProviderError> {
        let resp = self
            .get(&format!("/websets/{webset_id}/enrichments/{enrichment_id}"))
            .send()
            .await?;
        let resp = check_response(resp, "").await?;
        Ok(resp.json().await?)
    }

    /// Cancel a running enrichment.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the request fails.
    pub async fn cancel_enrichment(
        &self,
        webset_id: &str,
        enrichment_id: &str,
    ) -> Result<(), ProviderError> {
        check_response(
            self.post(&format!(
                "/websets/{webset_id}/enrichments/{enrichment_id}/cancel"
            ))
            .send()
            .await?,
            "",
        )
        .await?;
        Ok(())
    }
}
