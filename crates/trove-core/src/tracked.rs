//! Tracked resource records and the per-scope state document.
//!
//! The state document is a single JSON blob attached to a conversation scope
//! (see `trove-state` for the storage protocol). It holds only the resources
//! created through this tool; the provider remains the source of truth for
//! live status and items.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A webset created through the tool, cached in the scope document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrackedWebset {
    /// Provider-assigned id, immutable once created.
    pub id: String,
    /// Caller-chosen dedup alias, if one was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub query: String,
    #[serde(default)]
    pub entity_type: String,
    /// Normalized provider status string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub item_count: u64,
    /// Result count requested at creation time.
    #[serde(default)]
    pub requested_count: u64,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// A monitor created through the tool, cached in the scope document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TrackedMonitor {
    pub id: String,
    /// Owning webset. Deleting the webset cascades removal of this record.
    pub webset_id: String,
    pub frequency: String,
    pub cron: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_run: Option<String>,
    pub created_at: String,
}

/// The per-scope state document: `{"websets": {...}, "monitors": {...}}`.
///
/// Keyed by provider-assigned ids. Defaults to both maps empty when no
/// document exists for a scope yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WebsetsState {
    #[serde(default)]
    pub websets: BTreeMap<String, TrackedWebset>,
    #[serde(default)]
    pub monitors: BTreeMap<String, TrackedMonitor>,
}

impl WebsetsState {
    /// Remove a webset entry and cascade removal of every monitor whose
    /// `webset_id` matches. Returns `true` if anything was removed.
    pub fn remove_webset(&mut self, webset_id: &str) -> bool {
        let removed = self.websets.remove(webset_id).is_some();
        let before = self.monitors.len();
        self.monitors.retain(|_, m| m.webset_id != webset_id);
        removed || self.monitors.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn monitor(id: &str, webset_id: &str) -> TrackedMonitor {
        TrackedMonitor {
            id: id.to_string(),
            webset_id: webset_id.to_string(),
            frequency: "daily".to_string(),
            cron: "0 9 * * *".to_string(),
            next_run: None,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    fn webset(id: &str) -> TrackedWebset {
        TrackedWebset {
            id: id.to_string(),
            external_id: None,
            query: "test".to_string(),
            entity_type: "company".to_string(),
            status: Some("idle".to_string()),
            item_count: 0,
            requested_count: 10,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: None,
            metadata: BTreeMap::new(),
        }
    }

    #[test]
    fn empty_default_document() {
        let state = WebsetsState::default();
        assert!(state.websets.is_empty());
        assert!(state.monitors.is_empty());
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json, serde_json::json!({"websets": {}, "monitors": {}}));
    }

    #[test]
    fn remove_webset_cascades_monitors() {
        let mut state = WebsetsState::default();
        state.websets.insert("ws_1".to_string(), webset("ws_1"));
        state.websets.insert("ws_2".to_string(), webset("ws_2"));
        state.monitors.insert("mon_1".to_string(), monitor("mon_1", "ws_1"));
        state.monitors.insert("mon_2".to_string(), monitor("mon_2", "ws_1"));
        state.monitors.insert("mon_3".to_string(), monitor("mon_3", "ws_2"));

        assert!(state.remove_webset("ws_1"));

        assert!(!state.websets.contains_key("ws_1"));
        assert!(state.websets.contains_key("ws_2"));
        assert_eq!(state.monitors.len(), 1);
        assert!(state.monitors.contains_key("mon_3"));
    }

    #[test]
    fn remove_missing_webset_is_noop() {
        let mut state = WebsetsState::default();
        state.monitors.insert("mon_1".to_string(), monitor("mon_1", "ws_other"));
        assert!(!state.remove_webset("ws_absent"));
        assert_eq!(state.monitors.len(), 1);
    }

    #[test]
    fn document_roundtrip_tolerates_missing_fields() {
        let state: WebsetsState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, WebsetsState::default());
    }
}
