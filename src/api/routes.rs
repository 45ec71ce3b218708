//! API route table.

use crate::api::handlers::{
    health_handler, login_handler, metrics_handler, missing_key_handler, redirect_handler, register_handler,
    shorten_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All public routes.
///
/// # Endpoints
///
/// - `POST /auth/register`    - Create an account
/// - `POST /auth/login`       - Exchange credentials for a bearer token
/// - `POST /url/shorten`      - Create a short link (token optional)
/// - `GET  /url/{short_key}`  - Resolve a short link
/// - `GET  /url`, `/url/`     - Missing key (400)
/// - `GET  /health`           - Health check
/// - `GET  /metrics`          - Prometheus counters
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/url/shorten", post(shorten_handler))
        .route("/url/{short_key}", get(redirect_handler))
        .route("/url", get(missing_key_handler))
        .route("/url/", get(missing_key_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
}
