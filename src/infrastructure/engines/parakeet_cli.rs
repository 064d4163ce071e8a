use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use crate::application::ports::{EngineError, TimedWord, TimestampedEngine, TimestampedOutput};

/// Secondary-engine adapter: invokes the recognizer binary once per call and
/// parses its JSON output. The model is loaded and torn down inside the child
/// process, so there is no cache to release from here.
pub struct ParakeetCliEngine {
    command: String,
    model: String,
}

#[derive(Deserialize)]
struct CliOutput {
    text: String,
    /// Absent in the degraded output mode without word timestamps.
    #[serde(default)]
    words: Option<Vec<CliWord>>,
}

#[derive(Deserialize)]
struct CliWord {
    word: String,
    start: f64,
    end: f64,
}

impl ParakeetCliEngine {
    pub fn new(command: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            model: model.into(),
        }
    }

    /// Cheap capability probe: resolves the binary without loading a model.
    /// The result is cached by the registry at startup.
    pub fn probe(command: &str) -> bool {
        std::process::Command::new(command)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl TimestampedEngine for ParakeetCliEngine {
    #[tracing::instrument(skip(self, audio_path))]
    async fn transcribe(&self, audio_path: &Path) -> Result<TimestampedOutput, EngineError> {
        let output = Command::new(&self.command)
            .arg("--model")
            .arg(&self.model)
            .arg("--timestamps")
            .arg(audio_path)
            .output()
            .await
            .map_err(|e| EngineError::Unavailable(format!("{}: {e}", self.command)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::InferenceFailed(stderr.trim().to_string()));
        }

        let parsed: CliOutput = serde_json::from_slice(&output.stdout)
            .map_err(|e| EngineError::InferenceFailed(format!("bad recognizer output: {e}")))?;

        if parsed.words.is_none() {
            tracing::warn!("Recognizer returned no word timestamps, degraded output mode");
        }

        Ok(TimestampedOutput {
            transcript: parsed.text,
            words: parsed.words.map(|words| {
                words
                    .into_iter()
                    .map(|w| TimedWord {
                        word: w.word,
                        start: w.start,
                        end: w.end,
                    })
                    .collect()
            }),
        })
    }

    async fn release_gpu_cache(&self) {
        // Per-call child process; VRAM is returned when it exits.
    }
}
