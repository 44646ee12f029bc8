//! Enrichment sub-resource operations: create, get, cancel.
//!
//! Enrichment cost scales with the number of items present at enrichment
//! time, so the item count is read back from the webset after the provider
//! accepts the enrichment.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use trove_billing::{BillableOperation, pricing};
use trove_core::ToolResult;
use trove_provider::{CreateEnrichmentParams, EnrichmentOption};

use crate::error::WebsetsError;
use crate::metered::{ChargeOutcome, charge};
use crate::tool::WebsetsTool;

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateEnrichmentArgs {
    pub webset_id: String,
    /// What to find or extract for each item.
    pub description: String,
    /// `text | date | number | options | email | phone | url`; auto-detected
    /// when omitted.
    #[serde(default)]
    pub format: Option<String>,
    /// Choice labels when `format` is `"options"`.
    #[serde(default)]
    pub options: Option<Vec<String>>,
}

impl WebsetsTool {
    /// Create an enrichment over every item in a webset. Charged per item
    /// after the provider accepts; not undone if the charge fails.
    pub async fn create_enrichment(&self, args: CreateEnrichmentArgs) -> ToolResult {
        match self.create_enrichment_inner(args).await {
            Ok(output) => ToolResult::ok(&output),
            Err(WebsetsError::InsufficientCredits { required }) => ToolResult::fail(format!(
                "Insufficient credits. This enrichment costs {required} credits ({} items).",
                required / pricing::ENRICHMENT_PER_ITEM_CREDITS
            )),
            Err(e) => Self::failure("create enrichment", &e),
        }
    }

    async fn create_enrichment_inner(
        &self,
        args: CreateEnrichmentArgs,
    ) -> Result<serde_json::Value, WebsetsError> {
        let client = self.client()?;
        if args.description.is_empty() {
            return Err(WebsetsError::InvalidInput(
                "Enrichment description is required.".to_string(),
            ));
        }
        let billing = self.billing()?;

        let params = CreateEnrichmentParams {
            description: args.description.clone(),
            format: args.format,
            options: args.options.map(|labels| {
                labels
                    .into_iter()
                    .map(|label| EnrichmentOption { label })
                    .collect()
            }),
            metadata: BTreeMap::new(),
        };
        let enrichment = client.create_enrichment(&args.webset_id, &params).await?;

        // Item count at enrichment time sets the price.
        let webset = client.get_webset(&args.webset_id, &[]).await?;
        let item_count = webset.found_count();

        let operation = BillableOperation::Enrichment { item_count };
        let cost_deducted = match billing {
            None => pricing::cost_label(operation.credits(), false),
            Some((ledger, scope)) => {
                let outcome = charge(
                    ledger,
                    self.billing_mode,
                    scope,
                    operation,
                    format!("Enrichment for webset: {item_count} items"),
                )
                .await;
                match outcome {
                    ChargeOutcome::Charged { cost_label }
                    | ChargeOutcome::Unmetered { cost_label } => cost_label,
                    ChargeOutcome::Declined { required_credits } => {
                        return Err(WebsetsError::InsufficientCredits {
                            required: required_credits,
                        });
                    }
                }
            }
        };

        tracing::info!(enrichment_id = %enrichment.id, webset_id = %args.webset_id, "created enrichment");

        Ok(json!({
            "enrichment_id": enrichment.id,
            "webset_id": args.webset_id,
            "status": enrichment.status_str(),
            "title": enrichment.title,
            "description": args.description,
            "format": enrichment.format,
            "item_count": item_count,
            "cost_deducted": cost_deducted,
        }))
    }

    /// Enrichment details and status.
    pub async fn get_enrichment(&self, webset_id: &str, enrichment_id: &str) -> ToolResult {
        match self.get_enrichment_inner(webset_id, enrichment_id).await {
            Ok(output) => ToolResult::ok(&output),
            Err(e) => Self::failure("get enrichment", &e),
        }
    }

    async fn get_enrichment_inner(
        &self,
        webset_id: &str,
        enrichment_id: &str,
    ) -> Result<serde_json::Value, WebsetsError> {
        let client = self.client()?;
        let enrichment = client.get_enrichment(webset_id, enrichment_id).await?;

        Ok(json!({
            "id": enrichment.id,
            "webset_id": webset_id,
            "status": enrichment.status_str(),
            "title": enrichment.title,
            "description": enrichment.description,
            "format": enrichment.format,
            "created_at": enrichment.created_at,
            "updated_at": enrichment.updated_at,
        }))
    }

    /// Cancel a running enrichment.
    pub async fn cancel_enrichment(&self, webset_id: &str, enrichment_id: &str) -> ToolResult {
        match self.cancel_enrichment_inner(webset_id, enrichment_id).await {
            Ok(output) => ToolResult::ok(&output),
            Err(e) => Self::failure("cancel enrichment", &e),
        }
    }

    async fn cancel_enrichment_inner(
        &self,
        webset_id: &str,
        enrichment_id: &str,
    ) -> Result<serde_json::Value, WebsetsError> {
        let client = self.client()?;
        client.cancel_enrichment(webset_id, enrichment_id).await?;

        Ok(json!({
            "webset_id": webset_id,
            "enrichment_id": enrichment_id,
            "cancelled": true,
        }))
    }
}
