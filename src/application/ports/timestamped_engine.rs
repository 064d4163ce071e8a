use std::path::Path;

use async_trait::async_trait;

use super::EngineError;

/// One word with native timing from the secondary engine. No confidence
/// field: the engine's standard output path does not expose one.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedWord {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

/// Native output of the secondary engine. `words` is `None` in the degraded
/// output mode where the backend yields no word-level timestamps at all.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampedOutput {
    pub transcript: String,
    pub words: Option<Vec<TimedWord>>,
}

/// Secondary local model used for cross-validation. Expects audio already
/// down-mixed to mono 16 kHz.
#[async_trait]
pub trait TimestampedEngine: Send + Sync {
    async fn transcribe(&self, audio_path: &Path) -> Result<TimestampedOutput, EngineError>;

    /// See [`super::VerbatimEngine::release_gpu_cache`].
    async fn release_gpu_cache(&self);
}
