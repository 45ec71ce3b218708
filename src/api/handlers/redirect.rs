//! Handlers for short URL resolution.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short key to its destination.
///
/// # Endpoint
///
/// `GET /url/{short_key}`
///
/// # Responses
///
/// - **301 Moved Permanently** with `Location` set to the original URL
/// - **404 Not Found** for unknown and expired keys alike
///
/// Resolution has no side effects.
pub async fn redirect_handler(
    Path(short_key): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let link = state.link_service.resolve(&short_key).await?;

    let location = HeaderValue::from_str(&location_value(&link.original_url)).map_err(|e| {
        tracing::error!(short_key = %short_key, error = %e, "destination is not a valid header value");
        AppError::internal("Internal server error")
    })?;

    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response())
}

/// Percent-encodes the bytes a header value cannot carry.
///
/// Only control characters other than tab are touched, so printable and
/// non-ASCII URLs pass through unchanged.
fn location_value(url: &str) -> String {
    let mut encoded = String::with_capacity(url.len());

    for c in url.chars() {
        if c.is_ascii_control() && c != '\t' {
            encoded.push_str(&format!("%{:02X}", c as u8));
        } else {
            encoded.push(c);
        }
    }

    encoded
}

/// Answers `GET /url` and `GET /url/` where no key was given.
pub async fn missing_key_handler() -> AppError {
    AppError::bad_request("Short key is required", json!({}))
}
