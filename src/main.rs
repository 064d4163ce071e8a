use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use reverb_gateway::application::ports::VendorSttClient;
use reverb_gateway::application::services::{CrossValidationService, EnsembleService};
use reverb_gateway::infrastructure::audio::FfmpegTranscoder;
use reverb_gateway::infrastructure::engines::{DeepgramClient, ModelRegistry, PrimaryEngineConfig};
use reverb_gateway::infrastructure::gpu::{GpuMonitor, GpuScheduler};
use reverb_gateway::infrastructure::observability::{init_tracing, TracingConfig};
use reverb_gateway::presentation::middleware::FixedWindowLimiter;
use reverb_gateway::presentation::{create_router, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();
    init_tracing(TracingConfig::default(), settings.server.port);

    // Every other guarantee depends on the GPU being there; refuse to start
    // without one. The model itself is not pre-loaded: the first request
    // triggers the load, so health checks work immediately.
    let gpu_monitor = Arc::new(GpuMonitor::from_env());
    if let Err(e) = gpu_monitor.verify_at_startup().await {
        tracing::error!(error = %e, "No usable GPU, refusing to start");
        std::process::exit(1);
    }

    let scheduler = Arc::new(GpuScheduler::new());

    let vendor: Option<Arc<dyn VendorSttClient>> = match settings.vendor.api_key.clone() {
        Some(key) => Some(Arc::new(DeepgramClient::new(
            key,
            settings.vendor.base_url.clone(),
        ))),
        None => {
            tracing::warn!("DEEPGRAM_API_KEY not set, vendor endpoints disabled");
            None
        }
    };

    let registry = Arc::new(ModelRegistry::new(
        PrimaryEngineConfig {
            command: settings.engines.reverb_command.clone(),
            model: settings.engines.reverb_model.clone(),
        },
        settings.engines.parakeet_command.as_deref(),
        &settings.engines.parakeet_model,
        vendor.is_some(),
    ));

    let state = AppState {
        ensemble: Arc::new(EnsembleService::new(
            Arc::clone(&registry),
            Arc::clone(&scheduler),
        )),
        cross_validation: Arc::new(CrossValidationService::new(
            vendor,
            Arc::clone(&registry),
            Arc::clone(&scheduler),
            Arc::new(FfmpegTranscoder::from_env()),
        )),
        registry,
        gpu_monitor,
        limiter: Arc::new(FixedWindowLimiter::new(
            settings.access.rate_quota,
            settings.access.rate_window,
        )),
        policy: Arc::new(settings.access.clone()),
    };

    let router = create_router(state);

    let addr = SocketAddr::new(settings.server.host.parse()?, settings.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
