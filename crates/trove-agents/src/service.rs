//! Default-agent provisioning.
//!
//! Every account gets one centrally-managed default agent. The agent's
//! behavior is always loaded from central configuration at run time, so the
//! installed record carries only identity and marker metadata; no
//! per-install config sync is ever needed.

use chrono::{Duration, Utc};
use serde::Serialize;

use crate::error::PlatformError;
use crate::platform::{AgentMetadata, AgentRecord, CreateAgentRequest, PlatformClient};
use crate::tracker::{BeginOutcome, InstallTracker};

/// Central configuration for the default agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultAgentConfig {
    pub name: String,
    pub description: String,
    pub icon_name: String,
    pub icon_color: String,
    pub icon_background: String,
}

impl Default for DefaultAgentConfig {
    fn default() -> Self {
        Self {
            name: "Trove".to_string(),
            description: "Your default research assistant.".to_string(),
            icon_name: "sun".to_string(),
            icon_color: "#FFFFFF".to_string(),
            icon_background: "#000000".to_string(),
        }
    }
}

/// Platform operations the provisioning service depends on. Implemented by
/// [`PlatformClient`] in production and by in-memory fakes in tests.
pub trait AgentPlatform {
    fn personal_account_ids(&self)
    -> impl Future<Output = Result<Vec<String>, PlatformError>> + Send;

    /// All centrally-managed default agents, across accounts.
    fn default_agents(&self) -> impl Future<Output = Result<Vec<AgentRecord>, PlatformError>> + Send;

    /// The default agent for one account, if installed.
    fn find_default_agent(
        &self,
        account_id: &str,
    ) -> impl Future<Output = Result<Option<AgentRecord>, PlatformError>> + Send;

    fn create_default_agent(
        &self,
        account_id: &str,
        config: &DefaultAgentConfig,
    ) -> impl Future<Output = Result<AgentRecord, PlatformError>> + Send;

    fn delete_agent(&self, agent_id: &str)
    -> impl Future<Output = Result<(), PlatformError>> + Send;
}

impl AgentPlatform for PlatformClient {
    async fn personal_account_ids(&self) -> Result<Vec<String>, PlatformError> {
        Ok(self
            .list_accounts(true)
            .await?
            .into_iter()
            .map(|a| a.id)
            .collect())
    }

    async fn default_agents(&self) -> Result<Vec<AgentRecord>, PlatformError> {
        self.list_agents(None, true).await
    }

    async fn find_default_agent(
        &self,
        account_id: &str,
    ) -> Result<Option<AgentRecord>, PlatformError> {
        Ok(self
            .list_agents(Some(account_id), true)
            .await?
            .into_iter()
            .next())
    }

    async fn create_default_agent(
        &self,
        account_id: &str,
        config: &DefaultAgentConfig,
    ) -> Result<AgentRecord, PlatformError> {
        self.create_agent(&CreateAgentRequest {
            account_id: account_id.to_string(),
            name: config.name.clone(),
            description: config.description.clone(),
            is_default: true,
            icon_name: config.icon_name.clone(),
            icon_color: config.icon_color.clone(),
            icon_background: config.icon_background.clone(),
            metadata: AgentMetadata {
                is_platform_default: true,
                centrally_managed: true,
                installation_date: Some(Utc::now().to_rfc3339()),
            },
        })
        .await
    }

    async fn delete_agent(&self, agent_id: &str) -> Result<(), PlatformError> {
        Self::delete_agent(self, agent_id).await
    }
}

/// How an `ensure_installed` call resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// This call installed the agent.
    Installed { agent_id: String },
    /// The agent was already present (or a previous call finished it).
    AlreadyInstalled,
    /// Another caller is installing right now; nothing to do.
    InProgress,
}

/// Result of a bulk installation run. Per-account failures are collected,
/// never propagated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub installed_count: u64,
    pub failed_count: u64,
    pub details: Vec<String>,
}

/// Installation statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgentStats {
    pub total_agents: u64,
    /// Installs in the last 30 days.
    pub recent_installs: u64,
}

/// Provisioning service over the agent platform.
pub struct DefaultAgentService<P> {
    platform: P,
    tracker: InstallTracker,
    config: DefaultAgentConfig,
}

impl<P: AgentPlatform> DefaultAgentService<P> {
    #[must_use]
    pub fn new(platform: P, config: DefaultAgentConfig) -> Self {
        Self {
            platform,
            tracker: InstallTracker::new(),
            config,
        }
    }

    /// Idempotently make sure an account has its default agent. Safe to call
    /// on every session start; concurrent calls for the same account do at
    /// most one installation.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the platform lookup or creation fails;
    /// the account is then released for retry.
    pub async fn ensure_installed(&self, account_id: &str) -> Result<EnsureOutcome, PlatformError> {
        match self.tracker.begin(account_id) {
            BeginOutcome::AlreadyDone => return Ok(EnsureOutcome::AlreadyInstalled),
            BeginOutcome::Busy => return Ok(EnsureOutcome::InProgress),
            BeginOutcome::Started => {}
        }

        let result = self.ensure_claimed(account_id).await;
        self.tracker.finish(account_id, result.is_ok());
        result
    }

    async fn ensure_claimed(&self, account_id: &str) -> Result<EnsureOutcome, PlatformError> {
        if let Some(existing) = self.platform.find_default_agent(account_id).await? {
            tracing::debug!(account_id, agent_id = %existing.agent_id, "default agent already installed");
            return Ok(EnsureOutcome::AlreadyInstalled);
        }

        tracing::info!(account_id, "installing default agent");
        let agent = self
            .platform
            .create_default_agent(account_id, &self.config)
            .await?;
        tracing::info!(account_id, agent_id = %agent.agent_id, "installed default agent");
        Ok(EnsureOutcome::Installed {
            agent_id: agent.agent_id,
        })
    }

    /// Install (or with `replace_existing`, reinstall) for one account and
    /// return the agent id.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if any platform call fails.
    pub async fn install_for_user(
        &self,
        account_id: &str,
        replace_existing: bool,
    ) -> Result<String, PlatformError> {
        if let Some(existing) = self.platform.find_default_agent(account_id).await? {
            if replace_existing {
                self.platform.delete_agent(&existing.agent_id).await?;
                tracing::debug!(account_id, "deleted existing default agent for replacement");
            } else {
                tracing::debug!(account_id, agent_id = %existing.agent_id, "account already has default agent");
                return Ok(existing.agent_id);
            }
        }

        let agent = self
            .platform
            .create_default_agent(account_id, &self.config)
            .await?;
        self.tracker.finish(account_id, true);
        Ok(agent.agent_id)
    }

    /// Install for every personal account that does not yet have the default
    /// agent. Per-account failures are collected in the report.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] only if the initial account/agent listing
    /// fails.
    pub async fn install_for_all(&self) -> Result<InstallReport, PlatformError> {
        let all_accounts = self.platform.personal_account_ids().await?;
        let existing: std::collections::HashSet<String> = self
            .platform
            .default_agents()
            .await?
            .into_iter()
            .map(|a| a.account_id)
            .collect();

        let missing: Vec<&String> = all_accounts
            .iter()
            .filter(|id| !existing.contains(*id))
            .collect();
        if missing.is_empty() {
            return Ok(InstallReport {
                details: vec!["All accounts already have the default agent".to_string()],
                ..InstallReport::default()
            });
        }

        tracing::info!(count = missing.len(), "installing default agent for accounts");
        let mut report = InstallReport::default();
        for account_id in missing {
            match self
                .platform
                .create_default_agent(account_id, &self.config)
                .await
            {
                Ok(_) => {
                    self.tracker.finish(account_id, true);
                    report.installed_count += 1;
                }
                Err(e) => {
                    report.failed_count += 1;
                    let detail = format!("Failed to install for account {account_id}: {e}");
                    tracing::error!("{detail}");
                    report.details.push(detail);
                }
            }
        }
        if report.details.is_empty() {
            report.details.push(format!(
                "Successfully installed for {} accounts",
                report.installed_count
            ));
        }
        Ok(report)
    }

    /// Total and last-30-days install counts.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the agent listing fails.
    pub async fn stats(&self) -> Result<AgentStats, PlatformError> {
        let agents = self.platform.default_agents().await?;
        let cutoff = Utc::now() - Duration::days(30);
        let recent_installs = agents
            .iter()
            .filter_map(|a| a.created_at.as_deref())
            .filter_map(|t| chrono::DateTime::parse_from_rfc3339(t).ok())
            .filter(|t| *t >= cutoff)
            .count() as u64;
        Ok(AgentStats {
            total_agents: agents.len() as u64,
            recent_installs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakePlatform {
        accounts: Vec<String>,
        agents: Mutex<HashMap<String, AgentRecord>>,
        create_calls: Mutex<u32>,
        fail_creates_for: Option<String>,
    }

    impl FakePlatform {
        fn with_accounts(ids: &[&str]) -> Self {
            Self {
                accounts: ids.iter().map(ToString::to_string).collect(),
                ..Self::default()
            }
        }
    }

    impl AgentPlatform for FakePlatform {
        async fn personal_account_ids(&self) -> Result<Vec<String>, PlatformError> {
            Ok(self.accounts.clone())
        }

        async fn default_agents(&self) -> Result<Vec<AgentRecord>, PlatformError> {
            Ok(self.agents.lock().unwrap().values().cloned().collect())
        }

        async fn find_default_agent(
            &self,
            account_id: &str,
        ) -> Result<Option<AgentRecord>, PlatformError> {
            Ok(self.agents.lock().unwrap().get(account_id).cloned())
        }

        async fn create_default_agent(
            &self,
            account_id: &str,
            config: &DefaultAgentConfig,
        ) -> Result<AgentRecord, PlatformError> {
            *self.create_calls.lock().unwrap() += 1;
            if self.fail_creates_for.as_deref() == Some(account_id) {
                return Err(PlatformError::Api {
                    status: 500,
                    message: "boom".to_string(),
                });
            }
            let record = AgentRecord {
                agent_id: format!("agent_{account_id}"),
                account_id: account_id.to_string(),
                name: config.name.clone(),
                is_default: true,
                created_at: Some(Utc::now().to_rfc3339()),
                ..AgentRecord::default()
            };
            self.agents
                .lock()
                .unwrap()
                .insert(account_id.to_string(), record.clone());
            Ok(record)
        }

        async fn delete_agent(&self, agent_id: &str) -> Result<(), PlatformError> {
            self.agents
                .lock()
                .unwrap()
                .retain(|_, a| a.agent_id != agent_id);
            Ok(())
        }
    }

    fn service(platform: FakePlatform) -> DefaultAgentService<FakePlatform> {
        DefaultAgentService::new(platform, DefaultAgentConfig::default())
    }

    #[tokio::test]
    async fn ensure_installs_once_then_short_circuits() {
        let service = service(FakePlatform::with_accounts(&["acct-1"]));

        let first = service.ensure_installed("acct-1").await.unwrap();
        assert_eq!(
            first,
            EnsureOutcome::Installed {
                agent_id: "agent_acct-1".to_string()
            }
        );

        let second = service.ensure_installed("acct-1").await.unwrap();
        assert_eq!(second, EnsureOutcome::AlreadyInstalled);
        assert_eq!(*service.platform.create_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn ensure_with_preexisting_agent_creates_nothing() {
        let platform = FakePlatform::with_accounts(&["acct-1"]);
        platform.agents.lock().unwrap().insert(
            "acct-1".to_string(),
            AgentRecord {
                agent_id: "agent_old".to_string(),
                account_id: "acct-1".to_string(),
                ..AgentRecord::default()
            },
        );
        let service = service(platform);

        let outcome = service.ensure_installed("acct-1").await.unwrap();
        assert_eq!(outcome, EnsureOutcome::AlreadyInstalled);
        assert_eq!(*service.platform.create_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_ensure_releases_account_for_retry() {
        let mut platform = FakePlatform::with_accounts(&["acct-1"]);
        platform.fail_creates_for = Some("acct-1".to_string());
        let service = service(platform);

        assert!(service.ensure_installed("acct-1").await.is_err());
        // The failure released the claim; a retry attempts creation again.
        assert!(service.ensure_installed("acct-1").await.is_err());
        assert_eq!(*service.platform.create_calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn install_for_user_replaces_when_asked() {
        let platform = FakePlatform::with_accounts(&["acct-1"]);
        platform.agents.lock().unwrap().insert(
            "acct-1".to_string(),
            AgentRecord {
                agent_id: "agent_old".to_string(),
                account_id: "acct-1".to_string(),
                ..AgentRecord::default()
            },
        );
        let service = service(platform);

        let kept = service.install_for_user("acct-1", false).await.unwrap();
        assert_eq!(kept, "agent_old");

        let replaced = service.install_for_user("acct-1", true).await.unwrap();
        assert_eq!(replaced, "agent_acct-1");
    }

    #[tokio::test]
    async fn install_for_all_reports_mixed_outcomes() {
        let mut platform = FakePlatform::with_accounts(&["acct-1", "acct-2", "acct-3"]);
        platform.fail_creates_for = Some("acct-2".to_string());
        platform.agents.lock().unwrap().insert(
            "acct-3".to_string(),
            AgentRecord {
                agent_id: "agent_existing".to_string(),
                account_id: "acct-3".to_string(),
                ..AgentRecord::default()
            },
        );
        let service = service(platform);

        let report = service.install_for_all().await.unwrap();
        assert_eq!(report.installed_count, 1);
        assert_eq!(report.failed_count, 1);
        assert_eq!(report.details.len(), 1);
        assert!(report.details[0].contains("acct-2"));
    }

    #[tokio::test]
    async fn install_for_all_with_full_coverage_is_noop() {
        let platform = FakePlatform::with_accounts(&["acct-1"]);
        platform.agents.lock().unwrap().insert(
            "acct-1".to_string(),
            AgentRecord {
                agent_id: "agent_1".to_string(),
                account_id: "acct-1".to_string(),
                ..AgentRecord::default()
            },
        );
        let service = service(platform);

        let report = service.install_for_all().await.unwrap();
        assert_eq!(report.installed_count, 0);
        assert_eq!(report.failed_count, 0);
        assert_eq!(*service.platform.create_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn stats_count_recent_installs() {
        let platform = FakePlatform::with_accounts(&["acct-1", "acct-2"]);
        {
            let mut agents = platform.agents.lock().unwrap();
            agents.insert(
                "acct-1".to_string(),
                AgentRecord {
                    agent_id: "agent_1".to_string(),
                    account_id: "acct-1".to_string(),
                    created_at: Some(Utc::now().to_rfc3339()),
                    ..AgentRecord::default()
                },
            );
            agents.insert(
                "acct-2".to_string(),
                AgentRecord {
                    agent_id: "agent_2".to_string(),
                    account_id: "acct-2".to_string(),
                    created_at: Some("2020-01-01T00:00:00+00:00".to_string()),
                    ..AgentRecord::default()
                },
            );
        }
        let service = service(platform);

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total_agents, 2);
        assert_eq!(stats.recent_installs, 1);
    }
}
