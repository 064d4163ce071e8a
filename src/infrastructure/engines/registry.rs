use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::application::ports::{EngineError, TimestampedEngine, VerbatimEngine};

use super::{ParakeetCliEngine, ReverbSidecarEngine};

/// How the primary engine sidecar is launched on first use.
#[derive(Debug, Clone)]
pub struct PrimaryEngineConfig {
    pub command: String,
    pub model: String,
}

/// Process-wide registry of model handles and backend availability flags.
///
/// Constructed once at startup and passed by handle to request handlers, with
/// no hidden globals. The primary handle is a lazy once-only load: the first
/// request pays for it, later requests share it, and it is never torn down.
/// Availability probes are computed at construction and queried as plain
/// booleans; they never trigger a full model load.
pub struct ModelRegistry {
    primary_config: PrimaryEngineConfig,
    primary: OnceCell<Arc<dyn VerbatimEngine>>,
    secondary: Option<Arc<dyn TimestampedEngine>>,
    vendor_configured: bool,
}

impl ModelRegistry {
    /// Production construction. `parakeet_command` of `None`, or a command
    /// that fails the version probe, marks the secondary backend unavailable.
    pub fn new(
        primary_config: PrimaryEngineConfig,
        parakeet_command: Option<&str>,
        parakeet_model: &str,
        vendor_configured: bool,
    ) -> Self {
        let secondary: Option<Arc<dyn TimestampedEngine>> = match parakeet_command {
            Some(command) if ParakeetCliEngine::probe(command) => {
                Some(Arc::new(ParakeetCliEngine::new(command, parakeet_model)))
            }
            Some(command) => {
                tracing::warn!(command, "Secondary recognizer probe failed, backend disabled");
                None
            }
            None => None,
        };

        Self {
            primary_config,
            primary: OnceCell::new(),
            secondary,
            vendor_configured,
        }
    }

    /// Registry with pre-resolved engine handles; used by tests and by any
    /// embedding that manages engine lifecycles itself.
    pub fn preloaded(
        primary: Arc<dyn VerbatimEngine>,
        secondary: Option<Arc<dyn TimestampedEngine>>,
        vendor_configured: bool,
    ) -> Self {
        Self {
            primary_config: PrimaryEngineConfig {
                command: String::new(),
                model: String::new(),
            },
            primary: OnceCell::new_with(Some(primary)),
            secondary,
            vendor_configured,
        }
    }

    /// Idempotent lazy load of the primary model. A load failure is a
    /// request-time error; the next call retries.
    pub async fn primary(&self) -> Result<Arc<dyn VerbatimEngine>, EngineError> {
        let engine = self
            .primary
            .get_or_try_init(|| async {
                let engine = ReverbSidecarEngine::spawn(
                    &self.primary_config.command,
                    &self.primary_config.model,
                )
                .await?;
                Ok::<Arc<dyn VerbatimEngine>, EngineError>(Arc::new(engine))
            })
            .await?;
        Ok(Arc::clone(engine))
    }

    /// Whether the primary model singleton is resident in memory.
    pub fn primary_loaded(&self) -> bool {
        self.primary.initialized()
    }

    pub fn secondary(&self) -> Result<Arc<dyn TimestampedEngine>, EngineError> {
        self.secondary
            .as_ref()
            .map(Arc::clone)
            .ok_or_else(|| EngineError::Unavailable("secondary recognizer".to_string()))
    }

    pub fn secondary_available(&self) -> bool {
        self.secondary.is_some()
    }

    pub fn vendor_configured(&self) -> bool {
        self.vendor_configured
    }
}
