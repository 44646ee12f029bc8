//! Monitor sub-resource operations: create, list, update, delete.
//!
//! Monitors re-run a webset's most recent search on a schedule. Frequency
//! keywords map to fixed cron expressions; anything else is passed through
//! as a custom cron string. Monitor creation is not charged.

use chrono::Utc;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use trove_core::{ToolResult, TrackedMonitor};
use trove_provider::{Cadence, CreateMonitorParams, MonitorBehavior, MonitorSearchConfig, UpdateMonitorParams};

use crate::error::WebsetsError;
use crate::tool::{WebsetsTool, cron_for_frequency};

fn default_frequency() -> String {
    "daily".to_string()
}

fn default_count() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateMonitorArgs {
    pub webset_id: String,
    /// `daily`, `weekly`, `hourly`, or a custom cron expression.
    #[serde(default = "default_frequency")]
    pub frequency: String,
    /// Max results to find per run.
    #[serde(default = "default_count")]
    pub count: u64,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UpdateMonitorArgs {
    pub webset_id: String,
    pub monitor_id: String,
    pub frequency: String,
}

impl WebsetsTool {
    /// Create a monitor that re-runs the webset's latest search on a
    /// schedule, and track it in the scope document.
    pub async fn create_monitor(&self, args: CreateMonitorArgs) -> ToolResult {
        match self.create_monitor_inner(args).await {
            Ok(output) => ToolResult::ok(&output),
            Err(e) => Self::failure("create monitor", &e),
        }
    }

    async fn create_monitor_inner(
        &self,
        args: CreateMonitorArgs,
    ) -> Result<serde_json::Value, WebsetsError> {
        let client = self.client()?;
        let cron = cron_for_frequency(&args.frequency);

        // Seed the monitor's search from the webset's most recent search.
        let webset = client.get_webset(&args.webset_id, &[]).await?;
        let last_search = webset.searches.last();

        let params = CreateMonitorParams {
            cadence: Cadence {
                cron: cron.clone(),
                timezone: "UTC".to_string(),
            },
            behavior: MonitorBehavior {
                kind: "search".to_string(),
                config: MonitorSearchConfig {
                    count: args.count,
                    behavior: "append".to_string(),
                    query: last_search
                        .map(|s| s.query.clone())
                        .filter(|q| !q.is_empty()),
                    criteria: last_search
                        .map(|s| s.criteria.clone())
                        .filter(|c| !c.is_empty()),
                    entity: last_search.and_then(|s| s.entity.clone()),
                },
            },
        };
        let monitor = client.create_monitor(&args.webset_id, &params).await?;

        let mut state = self.load_state().await;
        state.monitors.insert(
            monitor.id.clone(),
            TrackedMonitor {
                id: monitor.id.clone(),
                webset_id: args.webset_id.clone(),
                frequency: args.frequency.clone(),
                cron: monitor.cadence.cron.clone(),
                next_run: monitor.next_run_at.clone(),
                created_at: monitor
                    .created_at
                    .clone()
                    .unwrap_or_else(|| Utc::now().to_rfc3339()),
            },
        );
        self.save_state(&state).await?;

        tracing::info!(monitor_id = %monitor.id, webset_id = %args.webset_id, "created monitor");

        Ok(json!({
            "monitor_id": monitor.id,
            "webset_id": args.webset_id,
            "status": monitor.status_str(),
            "frequency": args.frequency,
            "cron": monitor.cadence.cron,
            "next_run": monitor.next_run_at,
            "count": args.count,
        }))
    }

    /// List monitors for one webset (live from the provider), or every
    /// monitor tracked in this scope when no webset is given.
    pub async fn list_monitors(&self, webset_id: Option<&str>) -> ToolResult {
        match self.list_monitors_inner(webset_id).await {
            Ok(output) => ToolResult::ok(&output),
            Err(e) => Self::failure("list monitors", &e),
        }
    }

    async fn list_monitors_inner(
        &self,
        webset_id: Option<&str>,
    ) -> Result<serde_json::Value, WebsetsError> {
        let monitors: Vec<serde_json::Value> = match webset_id {
            Some(webset_id) => {
                let client = self.client()?;
                let webset = client.get_webset(webset_id, &[]).await?;
                webset
                    .monitors
                    .iter()
                    .map(|m| {
                        json!({
                            "id": m.id,
                            "status": m.status_str(),
                            "webset_id": webset_id,
                            "cadence": m.cadence,
                            "next_run": m.next_run_at,
                            "last_run": m.last_run,
                        })
                    })
                    .collect()
            }
            None => {
                let state = self.load_state().await;
                state
                    .monitors
                    .values()
                    .map(|m| json!(m))
                    .collect()
            }
        };

        Ok(json!({
            "monitors": monitors,
            "total": monitors.len(),
        }))
    }

    /// Change a monitor's schedule.
    pub async fn update_monitor(&self, args: UpdateMonitorArgs) -> ToolResult {
        match self.update_monitor_inner(args).await {
            Ok(output) => ToolResult::ok(&output),
            Err(e) => Self::failure("update monitor", &e),
        }
    }

    async fn update_monitor_inner(
        &self,
        args: UpdateMonitorArgs,
    ) -> Result<serde_json::Value, WebsetsError> {
        let client = self.client()?;
        let cron = cron_for_frequency(&args.frequency);

        let monitor = client
            .update_monitor(
                &args.webset_id,
                &args.monitor_id,
                &UpdateMonitorParams {
                    cadence: Cadence {
                        cron: cron.clone(),
                        timezone: "UTC".to_string(),
                    },
                },
            )
            .await?;

        let mut state = self.load_state().await;
        if let Some(tracked) = state.monitors.get_mut(&args.monitor_id) {
            tracked.frequency = args.frequency.clone();
            tracked.cron = cron.clone();
            tracked.next_run = monitor.next_run_at.clone();
            self.save_state(&state).await?;
        }

        Ok(json!({
            "monitor_id": args.monitor_id,
            "webset_id": args.webset_id,
            "frequency": args.frequency,
            "cron": cron,
            "next_run": monitor.next_run_at,
        }))
    }

    /// Delete a monitor and stop tracking it.
    pub async fn delete_monitor(&self, webset_id: &str, monitor_id: &str) -> ToolResult {
        match self.delete_monitor_inner(webset_id, monitor_id).await {
            Ok(output) => ToolResult::ok(&output),
            Err(e) => Self::failure("delete monitor", &e),
        }
    }

    async fn delete_monitor_inner(
        &self,
        webset_id: &str,
        monitor_id: &str,
    ) -> Result<serde_json::Value, WebsetsError> {
        let client = self.client()?;
        client.delete_monitor(webset_id, monitor_id).await?;

        let mut state = self.load_state().await;
        if state.monitors.remove(monitor_id).is_some() {
            self.save_state(&state).await?;
        }

        Ok(json!({
            "monitor_id": monitor_id,
            "webset_id": webset_id,
            "deleted": true,
        }))
    }
}
