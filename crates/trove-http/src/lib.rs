//! # trove-http
//!
//! HTTP polling surface for webset status. One endpoint: the frontend polls
//! `GET /websets/{id}/status` for live progress while a webset is being
//! populated, instead of holding a request open against the provider.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use trove_config::TroveConfig;
use trove_provider::{SearchProgress, Webset, WebsetsClient};
use trove_websets::{FormattedItem, ProgressFlags, format_item};

const MIN_ITEM_LIMIT: u64 = 1;
const MAX_ITEM_LIMIT: u64 = 100;

// --- Error handling ---

pub enum AppError {
    /// Provider credentials absent; the service cannot answer.
    NotConfigured,
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            Self::NotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Websets service not available".to_string(),
            ),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, Json(serde_json::json!({ "error": msg }))).into_response()
    }
}

// --- State and routing ---

#[derive(Clone)]
pub struct AppState {
    client: Option<Arc<WebsetsClient>>,
}

impl AppState {
    /// Build shared state from loaded configuration. A missing provider key
    /// leaves the client unset; requests then get 503.
    #[must_use]
    pub fn from_config(config: &TroveConfig) -> Self {
        let client = config.provider.is_configured().then(|| {
            Arc::new(WebsetsClient::new(
                &config.provider.base_url,
                &config.provider.api_key,
                config.provider.timeout_secs,
            ))
        });
        Self { client }
    }
}

#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/websets/{webset_id}/status", get(poll_webset_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
///
/// # Errors
///
/// Returns an I/O error if the address cannot be bound or the server fails.
pub async fn serve(bind: &str, state: AppState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(addr = %listener.local_addr()?, "serving webset status endpoint");
    axum::serve(listener, router(state)).await
}

// --- The polling endpoint ---

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    /// Include items found so far.
    #[serde(default = "default_include_items")]
    pub include_items: bool,
    /// Max items to return, 1 to 100.
    #[serde(default = "default_item_limit")]
    pub item_limit: u64,
}

fn default_include_items() -> bool {
    true
}

const fn default_item_limit() -> u64 {
    20
}

#[derive(Debug, Serialize)]
pub struct WebsetStatusResponse {
    pub webset_id: String,
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_status: Option<String>,
    pub is_processing: bool,
    pub is_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<SearchProgress>,
    pub items_found: u64,
    pub items_returned: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<FormattedItem>>,
    pub message: String,
}

async fn poll_webset_status(
    State(state): State<AppState>,
    Path(webset_id): Path<String>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<WebsetStatusResponse>, AppError> {
    if !(MIN_ITEM_LIMIT..=MAX_ITEM_LIMIT).contains(&query.item_limit) {
        return Err(AppError::BadRequest(format!(
            "item_limit must be between {MIN_ITEM_LIMIT} and {MAX_ITEM_LIMIT}"
        )));
    }
    let client = state.client.as_ref().ok_or(AppError::NotConfigured)?;

    let expand: &[&str] = if query.include_items { &["items"] } else { &[] };
    let webset = client
        .get_webset(&webset_id, expand)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to poll webset status: {e}")))?;

    let response = status_response(&webset, query.include_items, query.item_limit);
    tracing::debug!(
        webset_id = %response.webset_id,
        status = ?response.status,
        found = response.items_found,
        "polled webset status"
    );
    Ok(Json(response))
}

/// Assemble the polling payload from a fetched webset.
#[must_use]
pub fn status_response(webset: &Webset, include_items: bool, item_limit: u64) -> WebsetStatusResponse {
    let flags = ProgressFlags::from_webset(webset);
    let message = flags.status_message();

    let items: Option<Vec<FormattedItem>> = include_items.then(|| {
        webset
            .items
            .as_deref()
            .unwrap_or_default()
            .iter()
            .take(item_limit as usize)
            .map(format_item)
            .collect()
    });
    let items_returned = items.as_ref().map_or(0, Vec::len) as u64;
    let items_found = flags
        .progress
        .as_ref()
        .map_or(items_returned, |p| p.found);

    WebsetStatusResponse {
        webset_id: webset.id.clone(),
        status: flags.status.clone(),
        search_status: flags.search_status.clone(),
        is_processing: flags.is_processing,
        is_complete: flags.is_complete,
        progress: flags.progress,
        items_found,
        items_returned,
        items,
        message,
    }
}
