//! Shared application state injected into handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use crate::application::admission::AdmissionController;
use crate::application::services::{AuthService, LinkService};
use crate::infrastructure::persistence::{PgLinkRepository, PgUserRepository};

/// Application state cloned into every request.
///
/// Everything here is built once in [`crate::server::run`].
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService<PgUserRepository>>,
    pub link_service: Arc<LinkService<PgLinkRepository>>,
    pub admission: AdmissionController,
    pub metrics: PrometheusHandle,
}
