//! Webset inspection commands.

use anyhow::{Context, bail};
use trove_config::TroveConfig;
use trove_http::status_response;
use trove_provider::WebsetsClient;

use crate::cli::WebsetAction;

pub async fn handle(action: &WebsetAction, config: &TroveConfig) -> anyhow::Result<()> {
    let WebsetAction::Status {
        webset_id,
        no_items,
        item_limit,
    } = action;

    if !config.provider.is_configured() {
        bail!("search provider API key is not configured (set TROVE_PROVIDER__API_KEY)");
    }
    let client = WebsetsClient::new(
        &config.provider.base_url,
        &config.provider.api_key,
        config.provider.timeout_secs,
    );

    let include_items = !no_items;
    let expand: &[&str] = if include_items { &["items"] } else { &[] };
    let webset = client
        .get_webset(webset_id, expand)
        .await
        .with_context(|| format!("failed to fetch webset {webset_id}"))?;

    let response = status_response(&webset, include_items, *item_limit);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
