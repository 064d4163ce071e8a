use std::path::Path;

use async_trait::async_trait;

/// External audio transcoding step. The gateway never resamples audio itself;
/// engines that require a specific layout get it from this collaborator.
#[async_trait]
pub trait AudioTranscoder: Send + Sync {
    /// Down-mixes `input` to mono 16 kHz PCM WAV at `output`.
    async fn to_mono_16k(&self, input: &Path, output: &Path) -> Result<(), TranscodeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("transcoder binary not available: {0}")]
    BinaryMissing(String),
    #[error("transcode failed: {0}")]
    Failed(String),
}
