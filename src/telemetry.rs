//! Metrics recorder and counter names.
//!
//! Counters are recorded through the `metrics` facade and rendered in
//! Prometheus text format at `GET /metrics`.

use anyhow::{Context, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const USERS_REGISTERED: &str = "users_registered_total";
pub const LOGINS_FAILED: &str = "logins_failed_total";
pub const LINKS_CREATED: &str = "links_created_total";
pub const SHORT_KEY_COLLISIONS: &str = "short_key_collisions_total";
pub const ADMISSION_REJECTED: &str = "admission_rejected_total";

/// Installs the process-wide Prometheus recorder.
///
/// # Errors
///
/// Fails if a global recorder is already installed.
pub fn install_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install metrics recorder")?;

    describe_counters();
    Ok(handle)
}

fn describe_counters() {
    metrics::describe_counter!(USERS_REGISTERED, "Accounts created");
    metrics::describe_counter!(LOGINS_FAILED, "Logins rejected for bad credentials");
    metrics::describe_counter!(LINKS_CREATED, "Short links stored");
    metrics::describe_counter!(SHORT_KEY_COLLISIONS, "Generated keys that were already taken");
    metrics::describe_counter!(ADMISSION_REJECTED, "Requests refused after waiting for capacity");
}
