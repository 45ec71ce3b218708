#![allow(dead_code)]

use axum::Router;
use chrono::{DateTime, Utc};
use linkgate::application::admission::AdmissionController;
use linkgate::application::services::{AuthService, LinkService, TokenService};
use linkgate::infrastructure::persistence::{PgLinkRepository, PgUserRepository};
use linkgate::routes::app_router;
use linkgate::state::AppState;
use linkgate::telemetry;
use linkgate::utils::password::hash_password;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

pub const TEST_SECRET: &str = "test-jwt-secret";
pub const TEST_BASE_URL: &str = "http://localhost:8080";
pub const TEST_ORIGIN: &str = "http://localhost:3000";

pub async fn create_test_user(pool: &PgPool, username: &str, password: &str) -> i64 {
    let password_hash = hash_password(password).unwrap();

    sqlx::query_scalar("INSERT INTO users (username, password_hash) VALUES ($1, $2) RETURNING id")
        .bind(username)
        .bind(password_hash)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn create_test_link(pool: &PgPool, key: &str, url: &str, owner_id: Option<i64>) {
    sqlx::query("INSERT INTO urls (short_key, original_url, user_id) VALUES ($1, $2, $3)")
        .bind(key)
        .bind(url)
        .bind(owner_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn create_expired_link(pool: &PgPool, key: &str, url: &str) {
    sqlx::query(
        "INSERT INTO urls (short_key, original_url, created_at, expires_at) \
         VALUES ($1, $2, NOW() - INTERVAL '25 hours', NOW() - INTERVAL '1 hour')",
    )
    .bind(key)
    .bind(url)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn link_owner(pool: &PgPool, key: &str) -> Option<i64> {
    sqlx::query_scalar("SELECT user_id FROM urls WHERE short_key = $1")
        .bind(key)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn link_expiry(pool: &PgPool, key: &str) -> (DateTime<Utc>, DateTime<Utc>) {
    sqlx::query_as("SELECT created_at, expires_at FROM urls WHERE short_key = $1")
        .bind(key)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn count_links(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM urls")
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Extracts the key from a returned short URL.
pub fn key_of(short_url: &str) -> &str {
    short_url.rsplit('/').next().unwrap()
}

pub fn test_tokens() -> Arc<TokenService> {
    Arc::new(TokenService::new(TEST_SECRET))
}

/// Handle to the process-wide recorder, installed on first use.
pub fn test_metrics() -> PrometheusHandle {
    static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
    HANDLE
        .get_or_init(|| telemetry::install_recorder().unwrap())
        .clone()
}

/// State with an admission budget no test comes close to.
pub fn create_test_state(pool: PgPool) -> AppState {
    let admission =
        AdmissionController::new(10_000, Duration::from_secs(60), Duration::from_secs(1)).unwrap();
    create_test_state_with_admission(pool, admission)
}

pub fn create_test_state_with_admission(pool: PgPool, admission: AdmissionController) -> AppState {
    let pool = Arc::new(pool);

    let user_repo = Arc::new(PgUserRepository::new(pool.clone()));
    let link_repo = Arc::new(PgLinkRepository::new(pool));

    AppState {
        auth_service: Arc::new(AuthService::new(user_repo, test_tokens())),
        link_service: Arc::new(LinkService::new(link_repo, TEST_BASE_URL)),
        admission,
        metrics: test_metrics(),
    }
}

pub fn test_app(pool: PgPool) -> Router {
    app_router(create_test_state(pool), &[TEST_ORIGIN.to_string()])
}
