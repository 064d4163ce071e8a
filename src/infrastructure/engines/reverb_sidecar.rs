use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;

use crate::application::ports::{ConfidenceMode, EngineError, VerbatimEngine};

/// Primary-engine adapter: a long-lived sidecar process that holds the model
/// in VRAM and answers line-delimited JSON requests on stdin/stdout.
///
/// Spawning the sidecar is the one-time expensive model load; the handle
/// lives for the rest of the process and is shared by all requests. Requests
/// are serialized here too (one stdin/stdout pair), but real mutual exclusion
/// is the GPU scheduler's job: callers hold a permit around `transcribe`.
pub struct ReverbSidecarEngine {
    stdin: Mutex<ChildStdin>,
    stdout: Mutex<BufReader<ChildStdout>>,
    confidence_mode: ConfidenceMode,
    _child: Child,
}

#[derive(Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum SidecarRequest<'a> {
    Transcribe {
        audio_path: &'a str,
        verbatimicity: f64,
    },
    /// Tells the sidecar to drop its CUDA allocator caches.
    ClearCache,
}

#[derive(Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum SidecarResponse {
    Ok {
        #[serde(default)]
        ctm: String,
    },
    Error {
        message: String,
    },
}

#[derive(Deserialize)]
struct ReadyEvent {
    event: String,
    #[serde(default)]
    rescoring: bool,
}

impl ReverbSidecarEngine {
    /// Spawns the sidecar and blocks until it reports the model resident.
    /// A failure here surfaces as a request-time error, not a startup error:
    /// the registry retries the load on the next request.
    pub async fn spawn(command: &str, model: &str) -> Result<Self, EngineError> {
        tracing::info!(command, model, "Loading primary ASR model via sidecar");

        let mut child = Command::new(command)
            .arg("--model")
            .arg(model)
            .arg("--serve")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| EngineError::ModelLoadFailed(format!("{command}: {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::ModelLoadFailed("sidecar stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::ModelLoadFailed("sidecar stdout unavailable".to_string()))?;
        let mut stdout = BufReader::new(stdout);

        // The sidecar prints a single ready event once weights are in VRAM.
        let mut line = String::new();
        stdout
            .read_line(&mut line)
            .await
            .map_err(|e| EngineError::ModelLoadFailed(format!("reading ready event: {e}")))?;
        let ready: ReadyEvent = serde_json::from_str(&line)
            .map_err(|e| EngineError::ModelLoadFailed(format!("bad ready event {line:?}: {e}")))?;
        if ready.event != "ready" {
            return Err(EngineError::ModelLoadFailed(format!(
                "unexpected first event: {}",
                ready.event
            )));
        }

        let confidence_mode = if ready.rescoring {
            ConfidenceMode::Rescoring
        } else {
            ConfidenceMode::Legacy
        };
        tracing::info!(model, ?confidence_mode, "Primary ASR model loaded");

        Ok(Self {
            stdin: Mutex::new(stdin),
            stdout: Mutex::new(stdout),
            confidence_mode,
            _child: child,
        })
    }

    async fn request(&self, request: SidecarRequest<'_>) -> Result<SidecarResponse, EngineError> {
        let payload = serde_json::to_string(&request)
            .map_err(|e| EngineError::InferenceFailed(format!("encode request: {e}")))?;

        {
            let mut stdin = self.stdin.lock().await;
            stdin
                .write_all(payload.as_bytes())
                .await
                .map_err(|e| EngineError::InferenceFailed(format!("sidecar stdin: {e}")))?;
            stdin
                .write_all(b"\n")
                .await
                .map_err(|e| EngineError::InferenceFailed(format!("sidecar stdin: {e}")))?;
            stdin
                .flush()
                .await
                .map_err(|e| EngineError::InferenceFailed(format!("sidecar stdin: {e}")))?;
        }

        let mut line = String::new();
        let read = {
            let mut stdout = self.stdout.lock().await;
            stdout
                .read_line(&mut line)
                .await
                .map_err(|e| EngineError::InferenceFailed(format!("sidecar stdout: {e}")))?
        };
        if read == 0 {
            return Err(EngineError::InferenceFailed(
                "sidecar closed stdout (process may have crashed)".to_string(),
            ));
        }

        serde_json::from_str(&line)
            .map_err(|e| EngineError::InferenceFailed(format!("bad sidecar response {line:?}: {e}")))
    }
}

#[async_trait]
impl VerbatimEngine for ReverbSidecarEngine {
    #[tracing::instrument(skip(self, audio_path), fields(verbatimicity))]
    async fn transcribe(&self, audio_path: &Path, verbatimicity: f64) -> Result<String, EngineError> {
        let path = audio_path
            .to_str()
            .ok_or_else(|| EngineError::InferenceFailed("non-UTF-8 audio path".to_string()))?;

        match self
            .request(SidecarRequest::Transcribe {
                audio_path: path,
                verbatimicity,
            })
            .await?
        {
            SidecarResponse::Ok { ctm } => Ok(ctm),
            SidecarResponse::Error { message } => Err(EngineError::InferenceFailed(message)),
        }
    }

    fn confidence_mode(&self) -> ConfidenceMode {
        self.confidence_mode
    }

    async fn release_gpu_cache(&self) {
        match self.request(SidecarRequest::ClearCache).await {
            Ok(SidecarResponse::Ok { .. }) => {}
            Ok(SidecarResponse::Error { message }) => {
                tracing::warn!(message, "GPU cache release reported an error");
            }
            Err(e) => {
                tracing::warn!(error = %e, "GPU cache release failed");
            }
        }
    }
}
