//! Advisory progress flags and human-readable status messages.
//!
//! Derived from the provider's webset and primary-search statuses. Advisory
//! only: `is_processing` and `is_complete` can both be false (cancelled or
//! errored websets) and a poll race can observe stale values, so callers must
//! not treat either flag as a guarantee.

use serde::Serialize;
use trove_core::is_active_status;
use trove_provider::{SearchProgress, Webset};

/// Processing-state summary of a webset, for polling callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProgressFlags {
    pub status: Option<String>,
    /// Primary-search status, when the webset has a search.
    pub search_status: Option<String>,
    pub is_processing: bool,
    pub is_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<SearchProgress>,
}

impl ProgressFlags {
    /// Derive flags from a webset as fetched from the provider.
    #[must_use]
    pub fn from_webset(webset: &Webset) -> Self {
        let status = webset.status_str();
        let primary = webset.primary_search();
        let search_status = primary.and_then(|s| s.status_str());
        let progress = primary.and_then(|s| s.progress.clone());

        let is_processing =
            is_active_status(status.as_deref()) || is_active_status(search_status.as_deref());
        let is_complete = status.as_deref() == Some("idle")
            && match search_status.as_deref() {
                None => true,
                Some(s) => s == "completed",
            };

        Self {
            status,
            search_status,
            is_processing,
            is_complete,
            progress,
        }
    }

    /// Human-readable status line for tool and polling output.
    #[must_use]
    pub fn status_message(&self) -> String {
        if self.is_complete {
            let found = self.progress.as_ref().map_or(0, |p| p.found);
            return format!("Search complete! Found {found} matching results.");
        }
        if is_active_status(self.status.as_deref()) {
            return match &self.progress {
                Some(p) => {
                    let mut msg = format!(
                        "Searching... {} results found ({}% complete)",
                        p.found, p.completion
                    );
                    if let Some(time_left) = p.time_left {
                        msg.push_str(&format!(" - ~{time_left}s remaining"));
                    }
                    msg
                }
                None => "Starting search...".to_string(),
            };
        }
        let status = self.status.as_deref().unwrap_or("unknown");
        format!("Status: {status}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use trove_provider::Search;

    fn webset(status: &str, search: Option<Search>) -> Webset {
        Webset {
            id: "ws_1".to_string(),
            status: Some(json!(status)),
            searches: search.into_iter().collect(),
            ..Webset::default()
        }
    }

    fn search(status: &str, progress: Option<SearchProgress>) -> Search {
        Search {
            id: "se_1".to_string(),
            status: Some(json!(status)),
            progress,
            ..Search::default()
        }
    }

    #[test]
    fn idle_with_completed_search_is_complete() {
        let flags = ProgressFlags::from_webset(&webset(
            "idle",
            Some(search(
                "completed",
                Some(SearchProgress {
                    found: 12,
                    analyzed: 40,
                    completion: 100.0,
                    time_left: None,
                }),
            )),
        ));
        assert!(flags.is_complete);
        assert!(!flags.is_processing);
        assert_eq!(
            flags.status_message(),
            "Search complete! Found 12 matching results."
        );
    }

    #[test]
    fn idle_without_search_is_complete() {
        let flags = ProgressFlags::from_webset(&webset("idle", None));
        assert!(flags.is_complete);
        assert_eq!(
            flags.status_message(),
            "Search complete! Found 0 matching results."
        );
    }

    #[test]
    fn idle_webset_with_running_search_still_processing() {
        let flags = ProgressFlags::from_webset(&webset("idle", Some(search("running", None))));
        assert!(flags.is_processing);
        assert!(!flags.is_complete);
    }

    #[test]
    fn running_with_progress_reports_counts() {
        let flags = ProgressFlags::from_webset(&webset(
            "running",
            Some(search(
                "running",
                Some(SearchProgress {
                    found: 5,
                    analyzed: 20,
                    completion: 45.0,
                    time_left: Some(30),
                }),
            )),
        ));
        assert!(flags.is_processing);
        assert_eq!(
            flags.status_message(),
            "Searching... 5 results found (45% complete) - ~30s remaining"
        );
    }

    #[test]
    fn pending_without_progress_is_starting() {
        let flags = ProgressFlags::from_webset(&webset("pending", None));
        assert_eq!(flags.status_message(), "Starting search...");
    }

    #[test]
    fn cancelled_is_neither_processing_nor_complete() {
        let flags = ProgressFlags::from_webset(&webset("cancelled", None));
        assert!(!flags.is_processing);
        assert!(!flags.is_complete);
        assert_eq!(flags.status_message(), "Status: cancelled");
    }
}
