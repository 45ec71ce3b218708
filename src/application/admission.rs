//! Global request admission using a shared token bucket.
//!
//! One [`AdmissionController`] is built at startup and shared by every request,
//! across all routes and clients. The bucket holds `requests` cells and
//! refills one cell every `window / requests`, so exactly `requests` calls fit
//! into a window from a full bucket.

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde_json::json;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use crate::error::AppError;
use crate::telemetry;

/// Shared admission gate.
///
/// Cloning is cheap; all clones draw from the same bucket.
#[derive(Clone)]
pub struct AdmissionController {
    limiter: Arc<DefaultDirectRateLimiter>,
    max_wait: Duration,
}

impl AdmissionController {
    /// Builds a controller allowing `requests` per `window`.
    ///
    /// Requests over budget wait up to `max_wait` for a cell.
    ///
    /// # Errors
    ///
    /// Fails if `requests` is zero or `window / requests` rounds to zero.
    pub fn new(requests: u32, window: Duration, max_wait: Duration) -> anyhow::Result<Self> {
        let burst = NonZeroU32::new(requests)
            .ok_or_else(|| anyhow::anyhow!("rate limit request count must be positive"))?;
        let quota = Quota::with_period(window / requests)
            .ok_or_else(|| anyhow::anyhow!("rate limit window is too small"))?
            .allow_burst(burst);

        Ok(Self {
            limiter: Arc::new(RateLimiter::direct(quota)),
            max_wait,
        })
    }

    /// Takes one cell without waiting.
    ///
    /// Returns `false` if the bucket is currently empty.
    #[cfg(test)]
    fn try_admit(&self) -> bool {
        self.limiter.check().is_ok()
    }

    /// Takes one cell, suspending until capacity frees up.
    ///
    /// Dropping the returned future abandons the wait without consuming a cell.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RateLimited`] if no cell became available within `max_wait`.
    pub async fn admit(&self) -> Result<(), AppError> {
        match tokio::time::timeout(self.max_wait, self.limiter.until_ready()).await {
            Ok(()) => Ok(()),
            Err(_) => {
                metrics::counter!(telemetry::ADMISSION_REJECTED).increment(1);
                tracing::warn!(
                    max_wait_ms = self.max_wait.as_millis() as u64,
                    "request rejected by admission controller"
                );
                Err(AppError::rate_limited(
                    "Rate limit exceeded",
                    json!({ "retry": "later" }),
                ))
            }
        }
    }
}
