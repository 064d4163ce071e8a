use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{AudioTranscoder, TranscodeError};

const TARGET_SAMPLE_RATE: u32 = 16_000;

/// External transcode via ffmpeg. The gateway treats preprocessing
/// correctness as ffmpeg's problem; this adapter only shapes the invocation.
pub struct FfmpegTranscoder {
    ffmpeg_bin: String,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg_bin: impl Into<String>) -> Self {
        Self {
            ffmpeg_bin: ffmpeg_bin.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(std::env::var("FFMPEG_BIN").unwrap_or_else(|_| "ffmpeg".to_string()))
    }
}

#[async_trait]
impl AudioTranscoder for FfmpegTranscoder {
    #[tracing::instrument(skip(self, input, output))]
    async fn to_mono_16k(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        let status = Command::new(&self.ffmpeg_bin)
            .arg("-y")
            .arg("-i")
            .arg(input)
            .arg("-ac")
            .arg("1")
            .arg("-ar")
            .arg(TARGET_SAMPLE_RATE.to_string())
            .arg("-f")
            .arg("wav")
            .arg(output)
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .await
            .map_err(|e| TranscodeError::BinaryMissing(format!("{}: {e}", self.ffmpeg_bin)))?;

        if !status.success() {
            return Err(TranscodeError::Failed(format!(
                "ffmpeg exited with {status}"
            )));
        }
        Ok(())
    }
}
