use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{EngineError, VerbatimEngine};
use crate::domain::{EngineKind, TranscriptResult};
use crate::infrastructure::engines::ModelRegistry;
use crate::infrastructure::gpu::GpuScheduler;
use crate::infrastructure::normalize::parse_ctm;

/// Verbatim and clean transcripts of the same audio, time-aligned by sharing
/// one source clip. Diffing them to localize disfluencies is the downstream
/// consumer's job, not the gateway's.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsemblePair {
    pub verbatim: TranscriptResult,
    pub clean: TranscriptResult,
}

/// Runs the dual-pass verbatim/clean contrast against the primary engine.
pub struct EnsembleService {
    registry: Arc<ModelRegistry>,
    scheduler: Arc<GpuScheduler>,
}

impl EnsembleService {
    pub fn new(registry: Arc<ModelRegistry>, scheduler: Arc<GpuScheduler>) -> Self {
        Self {
            registry,
            scheduler,
        }
    }

    /// Transcribes one clip twice: verbatimicity 1.0 (preserve disfluencies)
    /// then 0.0 (suppress them). Each pass acquires the GPU permit
    /// independently, so unrelated requests may interleave between passes.
    /// Any pass failure aborts the whole request.
    #[tracing::instrument(skip(self, audio), fields(bytes = audio.len()))]
    pub async fn transcribe_dual_pass(&self, audio: &[u8]) -> Result<EnsemblePair, EngineError> {
        // The primary engine consumes audio through a file path. The temp
        // file is removed when this binding drops, on every exit path.
        let mut temp_audio = tempfile::Builder::new()
            .prefix("ensemble-")
            .suffix(".wav")
            .tempfile()
            .map_err(|e| EngineError::InferenceFailed(format!("temp file: {e}")))?;
        temp_audio
            .write_all(audio)
            .map_err(|e| EngineError::InferenceFailed(format!("temp file write: {e}")))?;

        let engine = self.registry.primary().await?;

        let verbatim = self.run_pass(&engine, temp_audio.path(), 1.0).await?;
        let clean = self.run_pass(&engine, temp_audio.path(), 0.0).await?;

        Ok(EnsemblePair { verbatim, clean })
    }

    async fn run_pass(
        &self,
        engine: &Arc<dyn VerbatimEngine>,
        audio_path: &Path,
        verbatimicity: f64,
    ) -> Result<TranscriptResult, EngineError> {
        let ctm = {
            let _permit = self.scheduler.acquire().await;
            let ctm = engine.transcribe(audio_path, verbatimicity).await?;
            engine.release_gpu_cache().await;
            ctm
        };

        let words = parse_ctm(&ctm, engine.confidence_mode());
        tracing::debug!(verbatimicity, words = words.len(), "Pass complete");

        Ok(TranscriptResult::from_words(
            EngineKind::Reverb,
            Some(verbatimicity),
            words,
        ))
    }
}
