//! Monitor sub-resource operations.

use crate::http::check_response;
use crate::types::{CreateMonitorParams, Monitor, UpdateMonitorParams};
use crate::{ProviderError, WebsetsClient};

impl WebsetsClient {
    /// Create a monitor that re-runs a webset's search on a schedule.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the request or parsing fails.
    pub async fn create_monitor(
        &self,
        webset_id: &str,
        params: &CreateMonitorParams,
    ) -> Result<Monitor, ProviderError> {
        let resp = self
            .post(&format!("/websets/{webset_id}/monitors"))
            .json(params)
            .send()
            .await?;
        let resp = check_response(resp, "").await?;
        Ok(resp.json().await?)
    }

    /// Update a monitor's cadence.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the request or parsing fails.
    pub async fn update_monitor(
        &self,
        webset_id: &str,
        monitor_id: &str,
        params: &UpdateMonitorParams,
    ) -> Result<Monitor, ProviderError> {
        let resp = self
            .patch(&format!("/websets/{webset_id}/monitors/{monitor_id}"))
            .json(params)
            .send()
            .await?;
        let resp = check_response(resp, "").await?;
        Ok(resp.json().await?)
    }

    /// Delete a monitor.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if the request fails.
    pub async fn delete_monitor(
        &self,
        webset_id: &str,
        monitor_id: &str,
    ) -> Result<(), ProviderError> {
        check_response(
            self.delete(&format!("/websets/{webset_id}/monitors/{monitor_id}"))
                .send()
                .await?,
            "",
        )
        .await?;
        Ok(())
    }
}
