//! Search sub-resource operations: create, list, cancel.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use trove_billing::{BillableOperation, pricing};
use trove_core::ToolResult;
use trove_provider::{CreateSearchParams, Criterion, Entity};

use crate::error::WebsetsError;
use crate::metered::{ChargeOutcome, charge};
use crate::tool::WebsetsTool;

fn default_count() -> u64 {
    10
}

fn default_behavior() -> String {
    "append".to_string()
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateSearchArgs {
    pub webset_id: String,
    pub query: String,
    #[serde(default = "default_count")]
    pub count: u64,
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub criteria: Option<Vec<String>>,
    /// `"append"` adds to existing items, `"override"` replaces them.
    #[serde(default = "default_behavior")]
    pub behavior: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CancelSearchArgs {
    pub webset_id: String,
    /// Specific search to cancel; omit to cancel all running operations on
    /// the webset.
    #[serde(default)]
    pub search_id: Option<String>,
}

impl WebsetsTool {
    /// Add a search to an existing webset to expand the collection. Charged
    /// after the provider accepts; not undone if the charge fails.
    pub async fn create_search(&self, args: CreateSearchArgs) -> ToolResult {
        match self.create_search_inner(args).await {
            Ok(output) => ToolResult::ok(&output),
            Err(WebsetsError::InsufficientCredits { required }) => ToolResult::fail(format!(
                "Insufficient credits. This search costs {required} credits."
            )),
            Err(e) => Self::failure("create search", &e),
        }
    }

    async fn create_search_inner(
        &self,
        args: CreateSearchArgs,
    ) -> Result<serde_json::Value, WebsetsError> {
        let client = self.client()?;
        if args.query.is_empty() {
            return Err(WebsetsError::InvalidInput(
                "Search query is required.".to_string(),
            ));
        }
        let billing = self.billing()?;

        let params = CreateSearchParams {
            query: args.query.clone(),
            count: args.count,
            entity: args.entity_type.map(|kind| Entity { kind }),
            criteria: args.criteria.map(|list| {
                list.into_iter()
                    .map(|description| Criterion { description })
                    .collect()
            }),
            recall: true,
            behavior: Some(args.behavior.clone()),
        };
        let search = client.create_search(&args.webset_id, &params).await?;

        let operation = BillableOperation::Search {
            requested_count: args.count,
        };
        let cost_deducted = match billing {
            None => pricing::cost_label(operation.credits(), false),
            Some((ledger, scope)) => {
                let outcome = charge(
                    ledger,
                    self.billing_mode,
                    scope,
                    operation,
                    format!("Search added to webset: {} results", args.count),
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

        Ok(json!({
            "search_id": search.id,
            "webset_id": args.webset_id,
            "status": search.status_str(),
            "query": args.query,
            "count": args.count,
            "behavior": args.behavior,
            "cost_deducted": cost_deducted,
        }))
    }

    /// List all searches attached to a webset.
    pub async fn list_searches(&self, webset_id: &str) -> ToolResult {
        match self.list_searches_inner(webset_id).await {
            Ok(output) => ToolResult::ok(&output),
            Err(e) => Self::failure("list searches", &e),
        }
    }

    async fn list_searches_inner(&self, webset_id: &str) -> Result<serde_json::Value, WebsetsError> {
        let client = self.client()?;
        let webset = client.get_webset(webset_id, &[]).await?;

        let searches: Vec<serde_json::Value> = webset
            .searches
            .iter()
            .map(|s| {
                json!({
                    "id": s.id,
                    "status": s.status_str(),
                    "query": s.query,
                    "entity_type": s.entity.as_ref().map(|e| &e.kind),
                    "count": s.count,
                    "progress": s.progress,
                    "behavior": s.behavior,
                    "created_at": s.created_at,
                })
            })
            .collect();

        Ok(json!({
            "webset_id": webset_id,
            "searches": searches,
            "total": searches.len(),
        }))
    }

    /// Cancel one search, or every running operation on the webset when no
    /// search id is given.
    pub async fn cancel_search(&self, args: CancelSearchArgs) -> ToolResult {
        match self.cancel_search_inner(&args).await {
            Ok(output) => ToolResult::ok(&output),
            Err(e) => Self::failure("cancel search", &e),
        }
    }

    async fn cancel_search_inner(
        &self,
        args: &CancelSearchArgs,
    ) -> Result<serde_json::Value, WebsetsError> {
        let client = self.client()?;
        match &args.search_id {
            Some(search_id) => client.cancel_search(&args.webset_id, search_id).await?,
            None => client.cancel_webset(&args.webset_id).await?,
        }

        Ok(json!({
            "webset_id": args.webset_id,
            "search_id": args.search_id,
            "cancelled": true,
        }))
    }
}
