use std::path::Path;

use async_trait::async_trait;

/// How per-word confidence values from the primary engine should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceMode {
    /// The backend runs attention rescoring and emits genuine per-word
    /// probabilities; parsed values are used verbatim.
    Rescoring,
    /// The backend's confidence field is unusable. The normalizer substitutes
    /// a documented type-based default instead.
    Legacy,
}

/// Primary local model with the verbatimicity control knob.
///
/// The engine consumes audio through a file path (its native input contract)
/// and emits a CTM-style line-oriented transcript, one line per word.
#[async_trait]
pub trait VerbatimEngine: Send + Sync {
    /// Runs one transcription pass. `verbatimicity` selects between
    /// disfluency-preserving (1.0) and disfluency-suppressing (0.0) decoding.
    async fn transcribe(&self, audio_path: &Path, verbatimicity: f64) -> Result<String, EngineError>;

    fn confidence_mode(&self) -> ConfidenceMode;

    /// Drops any VRAM caches the backend retains after an inference call.
    /// Called while the GPU permit is still held, so peak memory across a
    /// sequence of requests stays bounded. Best effort; failures are logged,
    /// not surfaced.
    async fn release_gpu_cache(&self);
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("inference failed: {0}")]
    InferenceFailed(String),
    #[error("backend not available: {0}")]
    Unavailable(String),
}
