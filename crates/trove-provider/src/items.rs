//! Item sub-resource operations.

use crate::http::check_response;
use crate::types::{ItemsPage, WebsetItem};
use crate::{ProviderError, WebsetsClient};

impl WebsetsClient {
    /// List items with cursor-based pagination.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the request or parsing fails.
    pub async fn list_items(
        &self,
        webset_id: &str,
        limit: u64,
        cursor: Option<&str>,
    ) -> Result<ItemsPage, ProviderError> {
        let mut url = format!("/websets/{webset_id}/items?limit={limit}");
        if let Some(cursor) = cursor {
            url.push_str(&format!("&cursor={}", urlencoding::encode(cursor)));
        }
        let resp = check_response(self.get(&url).send().await?, "").await?;
        Ok(resp.json().await?)
    }

    /// Fetch one item.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the request or parsing fails.
    pub async fn get_item(
        &self,
        webset_id: &str,
        item_id: &str,
    ) -> Result<WebsetItem, ProviderError> {
        let resp = self
            .get(&format!("/websets/{webset_id}/items/{item_id}"))
            .send()
            .await?;
        let resp = check_response(resp, "").await?;
        Ok(resp.json().await?)
    }
}
