//! Webset lifecycle operations: create, preview, list, get, delete.

use chrono::Utc;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use trove_billing::pricing;
use trove_core::{ToolResult, TrackedWebset};
use trove_provider::{
    CreateEnrichmentParams, CreateSearchParams, CreateWebsetParams, Criterion, Entity,
    PreviewParams, Webset,
};

use crate::dedup::create_with_dedup;
use crate::error::WebsetsError;
use crate::format::format_item;
use crate::metered::charge_for_creation;
use crate::progress::ProgressFlags;
use crate::tool::WebsetsTool;

fn default_count() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateWebsetArgs {
    /// Natural language description of the entities to collect.
    pub query: String,
    /// Entity type hint; auto-detected by the provider when omitted.
    #[serde(default)]
    pub entity_type: Option<String>,
    /// Number of results to find.
    #[serde(default = "default_count")]
    pub count: u64,
    /// Caller-chosen dedup alias, e.g. `sf_engineers_2026`.
    #[serde(default)]
    pub external_id: Option<String>,
    /// Additional search criteria descriptions.
    #[serde(default)]
    pub criteria: Option<Vec<String>>,
    /// What to extract from each result, as a single text enrichment.
    #[serde(default)]
    pub enrichment_description: Option<String>,
    /// Custom key-value pairs attached to the webset.
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PreviewWebsetArgs {
    pub query: String,
    #[serde(default)]
    pub entity_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListWebsetsArgs {
    /// Fetch latest status from the provider for each tracked webset.
    #[serde(default)]
    pub sync_with_api: bool,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetWebsetArgs {
    pub webset_id: String,
    /// Include the full item list.
    #[serde(default)]
    pub include_items: bool,
}

fn criteria_params(criteria: Option<&Vec<String>>) -> Option<Vec<Criterion>> {
    criteria.map(|list| {
        list.iter()
            .map(|c| Criterion {
                description: c.clone(),
            })
            .collect()
    })
}

fn searches_summary(webset: &Webset) -> serde_json::Value {
    json!(
        webset
            .searches
            .iter()
            .map(|s| {
                json!({
                    "id": s.id,
                    "status": s.status_str(),
                    "query": s.query,
                    "progress": {
                        "found": s.progress.as_ref().map_or(0, |p| p.found),
                        "completion": s.progress.as_ref().map_or(0.0, |p| p.completion),
                    },
                })
            })
            .collect::<Vec<_>>()
    )
}

impl WebsetsTool {
    /// Create a new webset: dedup-aware creation, upfront charge with
    /// rollback, tracked-state write, immediate return for polling.
    pub async fn create_webset(&self, args: CreateWebsetArgs) -> ToolResult {
        let count = args.count;
        match self.create_webset_inner(args).await {
            Ok(output) => ToolResult::ok(&output),
            Err(WebsetsError::InsufficientCredits { required }) => ToolResult::fail(format!(
                "Insufficient credits. This search costs {required} credits ({count} results). \
                 Please add credits to continue."
            )),
            Err(e) => Self::failure("create webset", &e),
        }
    }

    async fn create_webset_inner(
        &self,
        args: CreateWebsetArgs,
    ) -> Result<serde_json::Value, WebsetsError> {
        let client = self.client()?;
        if args.query.is_empty() {
            return Err(WebsetsError::InvalidInput(
                "Search query is required.".to_string(),
            ));
        }
        // Resolve billing upfront so nothing is created when the session
        // cannot be billed.
        let billing = self.billing()?;

        tracing::info!(query = %args.query, count = args.count, "creating webset");

        let params = CreateWebsetParams {
            search: CreateSearchParams {
                query: args.query.clone(),
                count: args.count,
                entity: args.entity_type.clone().map(|kind| Entity { kind }),
                criteria: criteria_params(args.criteria.as_ref()),
                recall: true,
                behavior: None,
            },
            enrichments: args.enrichment_description.clone().map(|description| {
                vec![CreateEnrichmentParams {
                    description,
                    format: Some("text".to_string()),
                    options: None,
                    metadata: BTreeMap::new(),
                }]
            }),
            external_id: args.external_id.clone(),
            metadata: args.metadata.clone(),
        };

        let outcome = create_with_dedup(client, params).await?;
        let webset = outcome.webset;

        let cost_deducted = match billing {
            None => pricing::cost_label(
                trove_billing::BillableOperation::Search {
                    requested_count: args.count,
                }
                .credits(),
                false,
            ),
            Some((ledger, scope)) => {
                charge_for_creation(
                    client,
                    ledger,
                    self.billing_mode,
                    scope,
                    &webset.id,
                    args.count,
                )
                .await?
            }
        };

        let item_count = webset.found_count();
        let status = webset.status_str();
        let entity_type = args.entity_type.clone().unwrap_or_else(|| {
            webset
                .primary_search()
                .and_then(|s| s.entity.as_ref())
                .map(|e| e.kind.clone())
                .unwrap_or_default()
        });

        let mut state = self.load_state().await;
        state.websets.insert(
            webset.id.clone(),
            TrackedWebset {
                id: webset.id.clone(),
                external_id: outcome.final_external_id.clone(),
                query: args.query.clone(),
                entity_type: entity_type.clone(),
                status: status.clone(),
                item_count,
                requested_count: args.count,
                created_at: webset
                    .created_at
                    .clone()
                    .unwrap_or_else(|| Utc::now().to_rfc3339()),
                updated_at: None,
                metadata: args.metadata,
            },
        );
        self.save_state(&state).await?;

        let flags = ProgressFlags::from_webset(&webset);
        tracing::info!(
            webset_id = %webset.id,
            status = ?status,
            recovered = outcome.recovered,
            "webset created, processing in background"
        );

        Ok(json!({
            "webset_id": webset.id,
            "external_id": outcome.final_external_id,
            "status": status,
            "query": args.query,
            "entity_type": if entity_type.is_empty() { json!("auto-detected") } else { json!(entity_type) },
            "item_count": item_count,
            "cost_deducted": cost_deducted,
            "is_processing": flags.is_processing,
            "progress": flags.progress,
            "message": if flags.is_processing {
                "Webset created! Results are being discovered in real-time."
            } else {
                "Webset ready"
            },
            "searches": searches_summary(&webset),
            "enrichments": webset.enrichments.iter().map(|e| json!({
                "id": e.id,
                "status": e.status_str(),
                "title": e.title,
                "description": e.description,
            })).collect::<Vec<_>>(),
        }))
    }

    /// Preview what a query will detect before creating a full webset.
    pub async fn preview_webset(&self, args: PreviewWebsetArgs) -> ToolResult {
        match self.preview_webset_inner(args).await {
            Ok(output) => ToolResult::ok(&output),
            Err(e) => Self::failure("preview webset", &e),
        }
    }

    async fn preview_webset_inner(
        &self,
        args: PreviewWebsetArgs,
    ) -> Result<serde_json::Value, WebsetsError> {
        let client = self.client()?;
        if args.query.is_empty() {
            return Err(WebsetsError::InvalidInput(
                "Search query is required.".to_string(),
            ));
        }

        let preview = client
            .preview_webset(&PreviewParams {
                search: CreateSearchParams {
                    query: args.query.clone(),
                    // Previews return at most 10 items.
                    count: 10,
                    entity: args.entity_type.map(|kind| Entity { kind }),
                    criteria: None,
                    recall: false,
                    behavior: None,
                },
            })
            .await?;

        Ok(json!({
            "query": args.query,
            "detected_entity": preview.search.entity.as_ref().map(|e| &e.kind),
            "detected_criteria": preview
                .search
                .criteria
                .iter()
                .map(|c| &c.description)
                .collect::<Vec<_>>(),
            "suggested_enrichments": preview.enrichments.iter().map(|e| json!({
                "description": e.description,
                "format": e.format,
            })).collect::<Vec<_>>(),
            "preview_items": preview
                .items
                .iter()
                .take(5)
                .map(format_item)
                .collect::<Vec<_>>(),
        }))
    }

    /// List tracked websets for this scope, optionally refreshed from the
    /// provider.
    pub async fn list_websets(&self, args: ListWebsetsArgs) -> ToolResult {
        let mut state = self.load_state().await;

        if args.sync_with_api
            && let Ok(client) = self.client()
        {
            let ids: Vec<String> = state.websets.keys().cloned().collect();
            for id in ids {
                // A webset may have been deleted out of band; skip quietly.
                let Ok(webset) = client.get_webset(&id, &[]).await else {
                    continue;
                };
                if let Some(tracked) = state.websets.get_mut(&id) {
                    tracked.status = webset.status_str();
                    tracked.item_count = webset.found_count();
                }
            }
            if let Err(e) = self.save_state(&state).await {
                tracing::warn!(error = %e, "failed to persist refreshed webset state");
            }
        }

        let websets: Vec<&TrackedWebset> = state.websets.values().collect();
        ToolResult::ok(&json!({
            "websets": websets,
            "total": websets.len(),
        }))
    }

    /// Full webset details, optionally including items.
    pub async fn get_webset(&self, args: GetWebsetArgs) -> ToolResult {
        match self.get_webset_inner(args).await {
            Ok(output) => ToolResult::ok(&output),
            Err(e) => Self::failure("get webset", &e),
        }
    }

    async fn get_webset_inner(
        &self,
        args: GetWebsetArgs,
    ) -> Result<serde_json::Value, WebsetsError> {
        let client = self.client()?;
        let expand: &[&str] = if args.include_items { &["items"] } else { &[] };
        let webset = client.get_webset(&args.webset_id, expand).await?;

        // Refresh the tracked record when this webset belongs to the scope.
        let mut state = self.load_state().await;
        if let Some(tracked) = state.websets.get_mut(&webset.id) {
            tracked.status = webset.status_str();
            tracked.item_count = webset.found_count();
            tracked.updated_at = webset.updated_at.clone();
            self.save_state(&state).await?;
        }

        Ok(json!({
            "id": webset.id,
            "external_id": webset.external_id,
            "status": webset.status_str(),
            "title": webset.title,
            "searches": webset.searches.iter().map(|s| json!({
                "id": s.id,
                "status": s.status_str(),
                "query": s.query,
                "entity_type": s.entity.as_ref().map(|e| &e.kind),
                "count": s.count,
                "progress": s.progress,
            })).collect::<Vec<_>>(),
            "enrichments": webset.enrichments.iter().map(|e| json!({
                "id": e.id,
                "status": e.status_str(),
                "title": e.title,
                "description": e.description,
                "format": e.format,
            })).collect::<Vec<_>>(),
            "monitors": webset.monitors.iter().map(|m| json!({
                "id": m.id,
                "status": m.status_str(),
                "next_run": m.next_run_at,
            })).collect::<Vec<_>>(),
            "items": webset.items.as_ref().map(|items| {
                items.iter().map(format_item).collect::<Vec<_>>()
            }),
            "created_at": webset.created_at,
            "updated_at": webset.updated_at,
        }))
    }

    /// Delete a webset remotely and drop its tracked record plus every
    /// monitor keyed to it.
    pub async fn delete_webset(&self, webset_id: &str) -> ToolResult {
        match self.delete_webset_inner(webset_id).await {
            Ok(output) => ToolResult::ok(&output),
            Err(e) => Self::failure("delete webset", &e),
        }
    }

    async fn delete_webset_inner(&self, webset_id: &str) -> Result<serde_json::Value, WebsetsError> {
        let client = self.client()?;
        client.delete_webset(webset_id).await?;

        let mut state = self.load_state().await;
        if state.remove_webset(webset_id) {
            self.save_state(&state).await?;
        }

        Ok(json!({
            "webset_id": webset_id,
            "deleted": true,
        }))
    }
}
