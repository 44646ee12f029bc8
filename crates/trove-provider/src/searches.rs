//! Search sub-resource operations.

use crate::http::check_response;
use crate::types::{CreateSearchParams, Search};
use crate::{ProviderError, WebsetsClient};

impl WebsetsClient {
    /// Add a search to an existing webset.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the request or parsing fails.
    pub async fn create_search(
        &self,
        webset_id: &str,
        params: &CreateSearchParams,
    ) -> Result<Search, ProviderError> {
        let resp = self
            .post(&format!("/websets/{webset_id}/searches"))
            .json(params)
            .send()
            .await?;
        let resp = check_response(resp, "").await?;
        Ok(resp.json().await?)
    }

    /// Cancel a single running search.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the request fails.
    pub async fn cancel_search(
        &self,
        webset_id: &str,
        search_id: &str,
    ) -> Result<(), ProviderError> {
        check_response(
            self.post(&format!("/websets/{webset_id}/searches/{search_id}/cancel"))
                .send()
                .await?,
            "",
        )
        .await?;
        Ok(())
    }
}
