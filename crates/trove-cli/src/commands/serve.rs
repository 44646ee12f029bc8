//! Status server command.

use anyhow::Context;
use trove_config::TroveConfig;
use trove_http::AppState;

pub async fn handle(bind: Option<&str>, config: &TroveConfig) -> anyhow::Result<()> {
    let bind = bind.unwrap_or(&config.general.http_bind);
    let state = AppState::from_config(config);
    trove_http::serve(bind, state)
        .await
        .with_context(|| format!("status server failed on {bind}"))
}
