//! Shared HTTP response helpers for the Websets client.
//!
//! Centralizes status-code classification (409 conflict, 401/403 auth,
//! 400 bad request, 404 not found, other non-success → [`ProviderError::Api`])
//! so resource modules stay focused on request construction and response
//! mapping.

use crate::error::ProviderError;

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success. `external_id` is threaded in so
/// a 409 can name the colliding alias; pass an empty string for requests that
/// cannot conflict.
pub async fn check_response(
    resp: reqwest::Response,
    external_id: &str,
) -> Result<reqwest::Response, ProviderError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp.text().await.unwrap_or_default();
    Err(match status.as_u16() {
        409 => ProviderError::Conflict {
            external_id: external_id.to_string(),
        },
        401 | 403 => ProviderError::Auth { message },
        400 => ProviderError::BadRequest { message },
        404 => ProviderError::NotFound { message },
        code => ProviderError::Api {
            status: code,
            message,
        },
    })
}
