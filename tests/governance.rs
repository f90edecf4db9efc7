mod common;

use std::time::{Duration, Instant};

use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use common::{
    ANN_EMAIL, ANN_PASSWORD, InMemoryWorkouts, access_token, error_code, spawn_app,
    spawn_app_with, test_config,
};
use serde_json::{Value, json};

const FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

fn credentials() -> Value {
    json!({ "email": ANN_EMAIL, "password": ANN_PASSWORD })
}

#[tokio::test]
async fn test_auth_routes_rate_limited_per_client() {
    let mut config = test_config();
    config.behind_proxy = true;
    config.auth_rate_limit_burst = 2.0;
    config.auth_rate_limit_rps = 0.001;
    let app = spawn_app(config);

    for _ in 0..2 {
        app.server
            .post("/auth/login")
            .add_header(FORWARDED_FOR, HeaderValue::from_static("10.0.0.1"))
            .json(&credentials())
            .await
            .assert_status_ok();
    }

    let limited = app
        .server
        .post("/auth/login")
        .add_header(FORWARDED_FOR, HeaderValue::from_static("10.0.0.1"))
        .json(&credentials())
        .await;
    limited.assert_status(StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(error_code(&limited.json::<Value>()), "rate_limited");

    // another client has its own bucket
    app.server
        .post("/auth/login")
        .add_header(FORWARDED_FOR, HeaderValue::from_static("10.0.0.2, 172.16.0.1"))
        .json(&credentials())
        .await
        .assert_status_ok();

    assert_eq!(app.state.public_limiter.tracked_clients(), 2);
}

#[tokio::test]
async fn test_forwarded_for_ignored_without_proxy() {
    let mut config = test_config();
    config.auth_rate_limit_burst = 1.0;
    config.auth_rate_limit_rps = 0.001;
    let app = spawn_app(config);

    app.server
        .post("/auth/login")
        .add_header(FORWARDED_FOR, HeaderValue::from_static("10.0.0.1"))
        .json(&credentials())
        .await
        .assert_status_ok();

    app.server
        .post("/auth/login")
        .add_header(FORWARDED_FOR, HeaderValue::from_static("10.0.0.2"))
        .json(&credentials())
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_route_classes_have_separate_limits() {
    let mut config = test_config();
    config.auth_rate_limit_burst = 1.0;
    config.auth_rate_limit_rps = 0.001;
    let app = spawn_app(config);

    let token = access_token(&app.server, ANN_EMAIL, ANN_PASSWORD).await;

    app.server
        .post("/auth/login")
        .json(&credentials())
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);

    app.server
        .get("/me")
        .authorization_bearer(token)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_rate_limit_applies_before_authentication() {
    let mut config = test_config();
    config.rate_limit_burst = 1.0;
    config.rate_limit_rps = 0.001;
    let app = spawn_app(config);

    app.server.get("/me").await.assert_status_unauthorized();
    app.server
        .get("/me")
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_health_is_not_governed() {
    let mut config = test_config();
    config.rate_limit_burst = 1.0;
    config.rate_limit_rps = 0.001;
    config.auth_rate_limit_burst = 1.0;
    config.auth_rate_limit_rps = 0.001;
    let app = spawn_app(config);

    for _ in 0..5 {
        app.server.get("/health").await.assert_status_ok();
    }
}

#[tokio::test]
async fn test_slow_handler_answers_408() {
    let mut config = test_config();
    config.request_timeout_seconds = 1;
    let app = spawn_app_with(config, InMemoryWorkouts::with_latency(Duration::from_secs(5)));
    let token = access_token(&app.server, ANN_EMAIL, ANN_PASSWORD).await;

    let started = Instant::now();
    let response = app.server.get("/workouts").authorization_bearer(token).await;
    let elapsed = started.elapsed();

    response.assert_status(StatusCode::REQUEST_TIMEOUT);
    assert_eq!(error_code(&response.json::<Value>()), "request_timeout");
    assert!(elapsed >= Duration::from_millis(900), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(4), "{elapsed:?}");
}

#[tokio::test]
async fn test_oversized_declared_body_rejected_before_authentication() {
    let mut config = test_config();
    config.max_body_bytes = 64;
    let app = spawn_app(config);
    let body = vec![b'x'; 256];

    let response = app
        .server
        .post("/workouts")
        .add_header(header::CONTENT_LENGTH, HeaderValue::from(body.len()))
        .add_header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .bytes(body.into())
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    let json = response.json::<Value>();
    assert_eq!(error_code(&json), "payload_too_large");
    assert_eq!(json["error"]["details"]["limit_bytes"], 64);
}

#[tokio::test]
async fn test_oversized_body_rejected_for_authenticated_caller() {
    let mut config = test_config();
    config.max_body_bytes = 64;
    let app = spawn_app(config);
    let token = access_token(&app.server, ANN_EMAIL, ANN_PASSWORD).await;

    let response = app
        .server
        .post("/workouts")
        .authorization_bearer(token)
        .json(&json!({
            "title": "x".repeat(150),
            "workout_date": "2024-03-01"
        }))
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(error_code(&response.json::<Value>()), "payload_too_large");
    assert_eq!(app.workouts.len(), 0);
}

#[tokio::test]
async fn test_small_body_passes_limit() {
    let mut config = test_config();
    config.max_body_bytes = 256;
    let app = spawn_app(config);
    let token = access_token(&app.server, ANN_EMAIL, ANN_PASSWORD).await;

    app.server
        .post("/workouts")
        .authorization_bearer(token)
        .json(&json!({ "title": "Run", "workout_date": "2024-03-01" }))
        .await
        .assert_status(StatusCode::CREATED);
}
