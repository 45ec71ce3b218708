//! Handlers for account registration and login.

use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use validator::Validate;

use crate::api::dto::auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new account.
///
/// # Endpoint
///
/// `POST /auth/register`
///
/// # Request Body
///
/// ```json
/// { "username": "alice", "password": "secret123" }
/// ```
///
/// # Responses
///
/// - **201 Created** with `{ "id": 1, "username": "alice" }`
/// - **400 Bad Request** if the body is malformed or a field is empty
/// - **409 Conflict** if the username is taken
pub async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let user = state
        .auth_service
        .register(&payload.username, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            username: user.username,
        }),
    ))
}

/// Exchanges credentials for a bearer token valid for 24 hours.
///
/// # Endpoint
///
/// `POST /auth/login`
///
/// # Responses
///
/// - **200 OK** with `{ "token": "<jwt>" }`
/// - **400 Bad Request** if the body is malformed
/// - **401 Unauthorized** for an unknown user or a wrong password
pub async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(payload) = payload?;

    let token = state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(LoginResponse { token }))
}
