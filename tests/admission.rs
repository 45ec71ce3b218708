mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use linkgate::application::admission::AdmissionController;
use linkgate::routes::app_router;
use sqlx::PgPool;
use std::time::{Duration, Instant};

fn server_with_budget(pool: PgPool, requests: u32, window: Duration, max_wait: Duration) -> TestServer {
    let admission = AdmissionController::new(requests, window, max_wait).unwrap();
    let state = common::create_test_state_with_admission(pool, admission);
    TestServer::new(app_router(state, &[common::TEST_ORIGIN.to_string()])).unwrap()
}

#[sqlx::test]
async fn test_budget_exhausted_returns_429(pool: PgPool) {
    let server = server_with_budget(pool, 3, Duration::from_secs(60), Duration::from_millis(50));

    for _ in 0..3 {
        server.get("/health").await.assert_status_ok();
    }

    let response = server.get("/health").await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "rate_limited");
}

#[sqlx::test]
async fn test_budget_is_shared_across_routes(pool: PgPool) {
    let server = server_with_budget(pool, 2, Duration::from_secs(60), Duration::from_millis(50));

    server.get("/health").await.assert_status_ok();
    server.get("/url/nokey123").await.assert_status_not_found();

    let response = server.get("/url/").await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[sqlx::test]
async fn test_over_budget_request_waits_for_capacity(pool: PgPool) {
    // One cell every 100ms.
    let server = server_with_budget(pool, 2, Duration::from_millis(200), Duration::from_secs(2));

    server.get("/health").await.assert_status_ok();
    server.get("/health").await.assert_status_ok();

    let start = Instant::now();
    server.get("/health").await.assert_status_ok();
    assert!(start.elapsed() >= Duration::from_millis(50));
}

#[sqlx::test]
async fn test_cors_preflight_for_allowed_origin(pool: PgPool) {
    let server = TestServer::new(common::test_app(pool)).unwrap();

    let response = server
        .method(axum::http::Method::OPTIONS, "/url/shorten")
        .add_header("Origin", common::TEST_ORIGIN)
        .add_header("Access-Control-Request-Method", "POST")
        .add_header("Access-Control-Request-Headers", "content-type,authorization")
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.header("access-control-allow-origin"),
        common::TEST_ORIGIN
    );
}

#[sqlx::test]
async fn test_cors_foreign_origin_gets_no_allow_header(pool: PgPool) {
    let server = TestServer::new(common::test_app(pool)).unwrap();

    let response = server
        .get("/health")
        .add_header("Origin", "https://evil.example")
        .await;

    response.assert_status_ok();
    assert!(
        response
            .maybe_header("access-control-allow-origin")
            .is_none()
    );
}
