#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use http_body_util::BodyExt;

use reverb_gateway::application::ports::{TimestampedEngine, VendorSttClient, VerbatimEngine};
use reverb_gateway::application::services::{CrossValidationService, EnsembleService};
use reverb_gateway::infrastructure::engines::{
    MockTimestampedEngine, MockTranscoder, MockVendorClient, MockVerbatimEngine, ModelRegistry,
    PrimaryEngineConfig,
};
use reverb_gateway::infrastructure::gpu::{GpuMonitor, GpuScheduler};
use reverb_gateway::presentation::middleware::FixedWindowLimiter;
use reverb_gateway::presentation::{create_router, AccessPolicy, AppState};

/// Router over the real pipeline with every external dependency replaced by
/// the crate's test doubles. The GPU query tool points at a path that cannot
/// exist, so health reports `gpu: null` instead of shelling out.
pub fn build_app(
    primary: Arc<MockVerbatimEngine>,
    secondary: Option<Arc<MockTimestampedEngine>>,
    vendor: Option<Arc<MockVendorClient>>,
    policy: AccessPolicy,
) -> Router {
    let primary_dyn: Arc<dyn VerbatimEngine> = primary;
    let secondary_dyn: Option<Arc<dyn TimestampedEngine>> =
        secondary.map(|s| s as Arc<dyn TimestampedEngine>);
    let vendor_dyn: Option<Arc<dyn VendorSttClient>> =
        vendor.map(|v| v as Arc<dyn VendorSttClient>);

    let registry = Arc::new(ModelRegistry::preloaded(
        primary_dyn,
        secondary_dyn,
        vendor_dyn.is_some(),
    ));

    build_app_with_registry(registry, vendor_dyn, policy)
}

/// Like [`build_app`] but with a cold registry: no engine handles resolved,
/// no secondary backend, so health sees an unloaded model.
pub fn build_cold_app(policy: AccessPolicy) -> Router {
    let registry = Arc::new(ModelRegistry::new(
        PrimaryEngineConfig {
            command: "/nonexistent/reverb-serve".to_string(),
            model: "reverb_asr_v1".to_string(),
        },
        None,
        "parakeet-tdt-0.6b-v2",
        false,
    ));
    build_app_with_registry(registry, None, policy)
}

fn build_app_with_registry(
    registry: Arc<ModelRegistry>,
    vendor: Option<Arc<dyn VendorSttClient>>,
    policy: AccessPolicy,
) -> Router {
    let scheduler = Arc::new(GpuScheduler::new());

    let state = AppState {
        ensemble: Arc::new(EnsembleService::new(
            Arc::clone(&registry),
            Arc::clone(&scheduler),
        )),
        cross_validation: Arc::new(CrossValidationService::new(
            vendor,
            Arc::clone(&registry),
            Arc::clone(&scheduler),
            Arc::new(MockTranscoder),
        )),
        registry,
        gpu_monitor: Arc::new(GpuMonitor::new("/nonexistent/nvidia-smi")),
        limiter: Arc::new(FixedWindowLimiter::new(
            policy.rate_quota,
            policy.rate_window,
        )),
        policy: Arc::new(policy),
    };

    create_router(state)
}

pub fn default_app() -> Router {
    build_app(
        Arc::new(MockVerbatimEngine::default()),
        Some(Arc::new(MockTimestampedEngine::default())),
        Some(Arc::new(MockVendorClient::default())),
        AccessPolicy::default(),
    )
}

pub fn audio_request_body() -> String {
    let encoded = BASE64_STANDARD.encode(b"RIFF fake wav payload");
    format!(r#"{{"audio_base64":"{encoded}"}}"#)
}

pub fn post_json(path: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

pub async fn response_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
