mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use tower::ServiceExt;

use reverb_gateway::infrastructure::engines::{
    ConcurrencyProbe, MockTimestampedEngine, MockVerbatimEngine,
};
use reverb_gateway::presentation::AccessPolicy;

use common::{audio_request_body, build_app, post_json};

#[tokio::test]
async fn given_concurrent_gpu_requests_then_inference_never_overlaps() {
    let probe = Arc::new(ConcurrencyProbe::default());
    let primary = Arc::new(MockVerbatimEngine {
        delay: Duration::from_millis(20),
        probe: Some(Arc::clone(&probe)),
        ..Default::default()
    });
    let secondary = Arc::new(MockTimestampedEngine {
        delay: Duration::from_millis(20),
        probe: Some(Arc::clone(&probe)),
        ..Default::default()
    });
    let app = build_app(primary, Some(secondary), None, AccessPolicy::default());

    let (a, b, c) = tokio::join!(
        app.clone().oneshot(post_json("/ensemble", audio_request_body())),
        app.clone().oneshot(post_json("/parakeet", audio_request_body())),
        app.clone().oneshot(post_json("/ensemble", audio_request_body())),
    );

    assert_eq!(a.unwrap().status(), StatusCode::OK);
    assert_eq!(b.unwrap().status(), StatusCode::OK);
    assert_eq!(c.unwrap().status(), StatusCode::OK);

    // Five inference calls total (two passes per ensemble plus one secondary),
    // never more than one on the device at a time.
    assert_eq!(probe.peak(), 1);
}

#[tokio::test]
async fn given_failed_inference_then_permit_is_released_for_next_request() {
    let primary = Arc::new(MockVerbatimEngine {
        fail: true,
        ..Default::default()
    });
    let secondary = Arc::new(MockTimestampedEngine::default());
    let app = build_app(primary, Some(secondary), None, AccessPolicy::default());

    let response = app
        .clone()
        .oneshot(post_json("/ensemble", audio_request_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // A stuck permit would hang this request forever.
    let response = tokio::time::timeout(
        Duration::from_secs(5),
        app.oneshot(post_json("/parakeet", audio_request_body())),
    )
    .await
    .expect("GPU permit was not released after a failed pass")
    .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
