//! Administrative default-agent commands.

use anyhow::{Context, bail};
use trove_agents::{DefaultAgentConfig, DefaultAgentService, PlatformClient};
use trove_config::TroveConfig;

use crate::cli::AgentsAction;

fn service(config: &TroveConfig) -> anyhow::Result<DefaultAgentService<PlatformClient>> {
    if config.platform.api_key.is_empty() {
        bail!("platform API key is not configured (set TROVE_PLATFORM__API_KEY)");
    }
    let client = PlatformClient::new(&config.platform.base_url, &config.platform.api_key);
    Ok(DefaultAgentService::new(client, DefaultAgentConfig::default()))
}

pub async fn handle(action: &AgentsAction, config: &TroveConfig) -> anyhow::Result<()> {
    let service = service(config)?;
    match action {
        AgentsAction::InstallAll => {
            let report = service
                .install_for_all()
                .await
                .context("bulk installation failed")?;
            println!("Installed: {}", report.installed_count);
            println!("Failed:    {}", report.failed_count);
            for detail in &report.details {
                println!("  {detail}");
            }
        }
        AgentsAction::InstallUser {
            account_id,
            replace,
        } => {
            let agent_id = service
                .install_for_user(account_id, *replace)
                .await
                .with_context(|| format!("installation failed for account {account_id}"))?;
            println!("Installed default agent {agent_id} for account {account_id}");
        }
        AgentsAction::Stats => {
            let stats = service.stats().await.context("failed to fetch stats")?;
            println!("Total default agents:  {}", stats.total_agents);
            println!("Installed last 30 days: {}", stats.recent_installs);
        }
    }
    Ok(())
}
