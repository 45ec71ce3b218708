//! Handler for link shortening endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::extract::MaybeUser;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL that expires after 24 hours.
///
/// # Endpoint
///
/// `POST /url/shorten`
///
/// # Ownership
///
/// A valid token in `Authorization` attributes the link to its user. Without
/// one, or with an invalid one, the link is created anonymously.
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com" }
/// ```
///
/// # Response
///
/// ```json
/// { "shortUrl": "http://localhost:8080/url/aB3x_9Zq" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the body is malformed or the URL is empty.
pub async fn shorten_handler(
    State(state): State<AppState>,
    MaybeUser(owner_id): MaybeUser,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let link = state.link_service.shorten(&payload.url, owner_id).await?;

    Ok(Json(ShortenResponse {
        short_url: state.link_service.short_url(&link.short_key),
    }))
}
