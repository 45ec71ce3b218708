//! Admission middleware gating every request on the global rate budget.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::application::admission::AdmissionController;
use crate::error::AppError;

/// Waits for a cell from the shared bucket before passing the request on.
///
/// Applied to the whole router so that no handler runs unadmitted. If the
/// client goes away while waiting, the wait is dropped with the request.
///
/// # Errors
///
/// Returns `429 Too Many Requests` if no capacity frees up within the
/// controller's maximum wait.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/url/shorten", post(shorten_handler))
///     .layer(middleware::from_fn_with_state(admission, admission::layer));
/// ```
pub async fn layer(
    State(admission): State<AdmissionController>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    admission.admit().await?;
    Ok(next.run(req).await)
}
