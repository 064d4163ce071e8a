use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::infrastructure::gpu::GpuInfo;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// "ok" once the primary model is resident, "ready" while the service is
    /// up but still waiting for the first request to trigger the load.
    pub status: &'static str,
    pub model_loaded: bool,
    pub gpu: Option<GpuInfo>,
    pub deepgram_configured: bool,
    pub parakeet_configured: bool,
}

/// Health check with GPU state and backend availability flags. Exempt from
/// auth and rate limiting so monitoring and client connectivity probes never
/// need a secret.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let gpu = match state.gpu_monitor.probe().await {
        Ok(info) => Some(info),
        Err(e) => {
            tracing::warn!(error = %e, "GPU probe failed during health check");
            None
        }
    };

    let model_loaded = state.registry.primary_loaded();

    Json(HealthResponse {
        status: if model_loaded { "ok" } else { "ready" },
        model_loaded,
        gpu,
        deepgram_configured: state.registry.vendor_configured(),
        parakeet_configured: state.registry.secondary_available(),
    })
}
