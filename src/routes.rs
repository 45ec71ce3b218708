//! Top-level router wiring routes and middleware.
//!
//! # Middleware (outermost first)
//!
//! - **Tracing** - Structured request/response logging
//! - **Admission** - Global token bucket shared by all routes and clients
//! - **CORS** - Origin allow-list and preflight handling

use crate::api;
use crate::api::middleware::{admission, cors, tracing};
use crate::state::AppState;
use axum::{Router, middleware};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `allowed_origins` - origins permitted by the CORS layer
pub fn app_router(state: AppState, allowed_origins: &[String]) -> Router {
    let admission_gate = state.admission.clone();

    api::routes::public_routes()
        .with_state(state)
        .layer(cors::layer(allowed_origins))
        .layer(middleware::from_fn_with_state(
            admission_gate,
            admission::layer,
        ))
        .layer(tracing::layer())
}
