mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_LENGTH, ORIGIN};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use reverb_gateway::infrastructure::engines::{MockVendorClient, MockVerbatimEngine};
use reverb_gateway::presentation::AccessPolicy;

use common::{audio_request_body, build_app, post_json};

fn guarded_policy() -> AccessPolicy {
    AccessPolicy {
        auth_token: Some("secret-token".to_string()),
        ..AccessPolicy::default()
    }
}

fn guarded_app() -> axum::Router {
    build_app(
        Arc::new(MockVerbatimEngine::default()),
        None,
        None,
        guarded_policy(),
    )
}

#[tokio::test]
async fn given_missing_token_when_ensemble_then_returns_unauthorized() {
    let app = guarded_app();

    let response = app
        .oneshot(post_json("/ensemble", audio_request_body()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn given_wrong_token_when_ensemble_then_returns_unauthorized() {
    let app = guarded_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ensemble")
                .header("content-type", "application/json")
                .header(AUTHORIZATION, "Bearer wrong-token")
                .body(Body::from(audio_request_body()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn given_malformed_auth_header_when_ensemble_then_returns_unauthorized() {
    let app = guarded_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ensemble")
                .header("content-type", "application/json")
                .header(AUTHORIZATION, "Token secret-token")
                .body(Body::from(audio_request_body()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn given_valid_token_when_ensemble_then_request_proceeds() {
    let app = guarded_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ensemble")
                .header("content-type", "application/json")
                .header(AUTHORIZATION, "Bearer secret-token")
                .body(Body::from(audio_request_body()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn given_auth_enabled_when_health_then_no_token_needed() {
    let app = guarded_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn given_oversized_declared_body_then_rejected_before_auth() {
    let policy = AccessPolicy {
        auth_token: Some("secret-token".to_string()),
        max_body_bytes: 1024,
        ..AccessPolicy::default()
    };
    let app = build_app(Arc::new(MockVerbatimEngine::default()), None, None, policy);

    // No valid token: a 413 (not 401) proves the size guard runs first.
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ensemble")
                .header("content-type", "application/json")
                .header(CONTENT_LENGTH, "2048")
                .header(AUTHORIZATION, "Bearer wrong-token")
                .body(Body::from(audio_request_body()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn given_declared_body_within_ceiling_then_request_proceeds() {
    let policy = AccessPolicy {
        max_body_bytes: 4096,
        ..AccessPolicy::default()
    };
    let app = build_app(Arc::new(MockVerbatimEngine::default()), None, None, policy);

    let body = audio_request_body();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ensemble")
                .header("content-type", "application/json")
                .header(CONTENT_LENGTH, body.len().to_string())
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn given_allowed_origin_when_preflight_then_no_token_needed() {
    let app = guarded_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/ensemble")
                .header(ORIGIN, "http://localhost:8080")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:8080"
    );
}

#[tokio::test]
async fn given_null_origin_when_preflight_then_allowed() {
    let app = guarded_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/ensemble")
                .header(ORIGIN, "null")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "null");
}

#[tokio::test]
async fn given_unlisted_origin_when_preflight_then_no_allow_header() {
    let app = guarded_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/ensemble")
                .header(ORIGIN, "http://evil.example")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(!response
        .headers()
        .contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn given_spent_quota_when_gpu_endpoint_then_returns_too_many_requests() {
    let policy = AccessPolicy {
        rate_quota: 2,
        rate_window: Duration::from_secs(60),
        ..AccessPolicy::default()
    };
    let app = build_app(
        Arc::new(MockVerbatimEngine::default()),
        None,
        Some(Arc::new(MockVendorClient::default())),
        policy,
    );

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(post_json("/ensemble", audio_request_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(post_json("/ensemble", audio_request_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // Vendor group has its own window; health is never limited.
    let response = app
        .clone()
        .oneshot(post_json("/deepgram", audio_request_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
