//! Wire types for the Websets API.
//!
//! The provider speaks camelCase JSON (`externalId`, `createdAt`,
//! `enrichmentId`). Status fields are kept as raw JSON values on the wire —
//! the provider has shipped both plain strings and enum-like objects — and
//! exposed as plain strings through [`trove_core::normalize_status`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use trove_core::normalize_status;

// ── Shared fragments ───────────────────────────────────────────────

/// Entity kind a search targets. Free-form: `company`, `person`,
/// `research_paper`, `article`, or anything descriptive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub kind: String,
}

/// One search criterion, phrased as a sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub description: String,
}

/// Search progress counters as reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchProgress {
    #[serde(default)]
    pub found: u64,
    #[serde(default)]
    pub analyzed: u64,
    /// Percent complete, 0-100.
    #[serde(default)]
    pub completion: f64,
    /// Provider estimate of seconds remaining, when it has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_left: Option<u64>,
}

// ── Resources ──────────────────────────────────────────────────────

/// A search operation attached to a webset. Never persisted locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Search {
    pub id: String,
    #[serde(default)]
    pub status: Option<serde_json::Value>,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub entity: Option<Entity>,
    #[serde(default)]
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub behavior: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub criteria: Vec<Criterion>,
    #[serde(default)]
    pub progress: Option<SearchProgress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Search {
    #[must_use]
    pub fn status_str(&self) -> Option<String> {
        normalize_status(self.status.as_ref())
    }
}

/// An enrichment task attached to a webset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrichment {
    pub id: String,
    #[serde(default)]
    pub status: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<EnrichmentOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Enrichment {
    #[must_use]
    pub fn status_str(&self) -> Option<String> {
        normalize_status(self.status.as_ref())
    }
}

/// One choice label for `format = "options"` enrichments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentOption {
    pub label: String,
}

/// Monitor run cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cadence {
    pub cron: String,
    #[serde(default)]
    pub timezone: String,
}

/// Outcome of a monitor's most recent run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorRun {
    #[serde(default)]
    pub status: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

/// A recurring re-run of a webset's search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    pub id: String,
    #[serde(default)]
    pub status: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webset_id: Option<String>,
    pub cadence: Cadence,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_run_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run: Option<MonitorRun>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Monitor {
    #[must_use]
    pub fn status_str(&self) -> Option<String> {
        normalize_status(self.status.as_ref())
    }
}

/// A criterion satisfaction judgment on an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEvaluation {
    #[serde(default)]
    pub criterion: String,
    /// `"yes" | "no" | "unclear"`.
    #[serde(default = "default_unclear")]
    pub satisfied: String,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<serde_json::Value>,
}

fn default_unclear() -> String {
    "unclear".to_string()
}

/// Enrichment extraction result on an item. `result` is an array; the first
/// element is the canonical extracted value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemEnrichment {
    #[serde(default)]
    pub enrichment_id: String,
    #[serde(default)]
    pub status: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub result: Vec<serde_json::Value>,
}

impl ItemEnrichment {
    #[must_use]
    pub fn status_str(&self) -> Option<String> {
        normalize_status(self.status.as_ref())
    }
}

/// A single entity in a webset. `properties` stays untyped here; shaping by
/// entity type happens in the result formatter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebsetItem {
    pub id: String,
    #[serde(default)]
    pub properties: serde_json::Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evaluations: Vec<ItemEvaluation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enrichments: Vec<ItemEnrichment>,
}

/// A provider-managed entity collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webset {
    pub id: String,
    #[serde(default)]
    pub status: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub searches: Vec<Search>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enrichments: Vec<Enrichment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub monitors: Vec<Monitor>,
    /// Present only when fetched with `expand=items`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<WebsetItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Webset {
    #[must_use]
    pub fn status_str(&self) -> Option<String> {
        normalize_status(self.status.as_ref())
    }

    /// The primary (first) search operation, if any.
    #[must_use]
    pub fn primary_search(&self) -> Option<&Search> {
        self.searches.first()
    }

    /// Items found so far, read from the primary search's progress.
    #[must_use]
    pub fn found_count(&self) -> u64 {
        self.primary_search()
            .and_then(|s| s.progress.as_ref())
            .map_or(0, |p| p.found)
    }
}

// ── Pagination envelopes ───────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsetList {
    #[serde(default)]
    pub data: Vec<Webset>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsPage {
    #[serde(default)]
    pub data: Vec<WebsetItem>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

// ── Request parameters ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSearchParams {
    pub query: String,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<Entity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<Vec<Criterion>>,
    /// Ask the provider for an estimate of total matches.
    pub recall: bool,
    /// `"append"` adds to existing items, `"override"` replaces them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavior: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnrichmentParams {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<EnrichmentOption>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebsetParams {
    pub search: CreateSearchParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrichments: Option<Vec<CreateEnrichmentParams>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Per-run search configuration for a monitor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorSearchConfig {
    pub count: u64,
    pub behavior: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<Vec<Criterion>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<Entity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorBehavior {
    #[serde(rename = "type")]
    pub kind: String,
    pub config: MonitorSearchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateMonitorParams {
    pub cadence: Cadence,
    pub behavior: MonitorBehavior,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateMonitorParams {
    pub cadence: Cadence,
}

/// Preview request: same search shape, capped at 10 items by the provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewParams {
    pub search: CreateSearchParams,
}

/// What the provider detected for a previewed query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSearch {
    #[serde(default)]
    pub entity: Option<Entity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub criteria: Vec<Criterion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewEnrichment {
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewResponse {
    #[serde(default)]
    pub search: PreviewSearch,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enrichments: Vec<PreviewEnrichment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<WebsetItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const WEBSET_FIXTURE: &str = r#"{
        "id": "ws_01j9xk",
        "status": "running",
        "externalId": "sf_ai_startups_2025",
        "title": "AI startups in San Francisco",
        "searches": [
            {
                "id": "wss_01j9xm",
                "status": "running",
                "query": "AI startups in San Francisco with Series A funding",
                "entity": {"type": "company"},
                "count": 100,
                "progress": {"found": 34, "analyzed": 51, "completion": 42.5, "timeLeft": 95},
                "createdAt": "2026-08-01T09:00:00Z"
            }
        ],
        "enrichments": [
            {
                "id": "wse_01j9xn",
                "status": {"state": "pending"},
                "description": "CEO email",
                "format": "email"
            }
        ],
        "createdAt": "2026-08-01T09:00:00Z",
        "updatedAt": "2026-08-01T09:02:10Z"
    }"#;

    #[test]
    fn parse_webset_fixture() {
        let webset: Webset = serde_json::from_str(WEBSET_FIXTURE).unwrap();
        assert_eq!(webset.id, "ws_01j9xk");
        assert_eq!(webset.status_str().as_deref(), Some("running"));
        assert_eq!(webset.external_id.as_deref(), Some("sf_ai_startups_2025"));
        assert_eq!(webset.found_count(), 34);

        let search = webset.primary_search().unwrap();
        assert_eq!(search.entity.as_ref().unwrap().kind, "company");
        assert_eq!(search.progress.as_ref().unwrap().time_left, Some(95));
    }

    #[test]
    fn object_status_normalized_to_text() {
        let webset: Webset = serde_json::from_str(WEBSET_FIXTURE).unwrap();
        let enrichment_status = webset.enrichments[0].status_str().unwrap();
        assert!(enrichment_status.contains("pending"));
    }

    #[test]
    fn create_params_wire_shape() {
        let params = CreateWebsetParams {
            search: CreateSearchParams {
                query: "CTOs at enterprise SaaS companies".to_string(),
                count: 50,
                entity: Some(Entity {
                    kind: "person".to_string(),
                }),
                criteria: Some(vec![Criterion {
                    description: "500+ employees".to_string(),
                }]),
                recall: true,
                behavior: None,
            },
            enrichments: None,
            external_id: Some("cto_prospects".to_string()),
            metadata: BTreeMap::new(),
        };
        let wire = serde_json::to_value(&params).unwrap();
        assert_eq!(wire["externalId"], "cto_prospects");
        assert_eq!(wire["search"]["entity"]["type"], "person");
        assert_eq!(wire["search"]["recall"], true);
        assert!(wire["search"].get("behavior").is_none());
    }

    #[test]
    fn items_page_defaults() {
        let page: ItemsPage = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(!page.has_more);
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn evaluation_satisfied_defaults_to_unclear() {
        let eval: ItemEvaluation =
            serde_json::from_str(r#"{"criterion": "Founded after 2020"}"#).unwrap();
        assert_eq!(eval.satisfied, "unclear");
    }
}
