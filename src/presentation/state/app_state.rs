use std::sync::Arc;

use crate::application::services::{CrossValidationService, EnsembleService};
use crate::infrastructure::engines::ModelRegistry;
use crate::infrastructure::gpu::GpuMonitor;
use crate::presentation::config::AccessPolicy;
use crate::presentation::middleware::FixedWindowLimiter;

/// Everything a handler needs, built once at startup. Model handles and the
/// GPU permit live behind these Arcs; cloning the state is cheap.
#[derive(Clone)]
pub struct AppState {
    pub ensemble: Arc<EnsembleService>,
    pub cross_validation: Arc<CrossValidationService>,
    pub registry: Arc<ModelRegistry>,
    pub gpu_monitor: Arc<GpuMonitor>,
    pub policy: Arc<AccessPolicy>,
    pub limiter: Arc<FixedWindowLimiter>,
}
