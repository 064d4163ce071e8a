use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::{TranscriptResult, WordToken};
use crate::presentation::state::AppState;

use super::{decode_audio_base64, ApiError};

#[derive(Deserialize)]
pub struct AudioBody {
    pub audio_base64: String,
}

#[derive(Serialize)]
pub struct EnsembleResponse {
    pub verbatim: PassBody,
    pub clean: PassBody,
}

#[derive(Serialize)]
pub struct PassBody {
    pub words: Vec<WordToken>,
    pub transcript: String,
    pub verbatimicity: f64,
}

impl From<TranscriptResult> for PassBody {
    fn from(result: TranscriptResult) -> Self {
        Self {
            verbatimicity: result.verbatimicity.unwrap_or_default(),
            words: result.words,
            transcript: result.transcript,
        }
    }
}

/// Dual-pass transcription: the same clip decoded verbatim (v=1.0) and clean
/// (v=0.0), returned side by side for downstream disfluency comparison.
#[tracing::instrument(skip(state, body))]
pub async fn ensemble_handler(
    State(state): State<AppState>,
    body: Result<Json<AudioBody>, JsonRejection>,
) -> Result<Json<EnsembleResponse>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::Validation(e.body_text()))?;
    let audio = decode_audio_base64(body.audio_base64).await?;

    let pair = state.ensemble.transcribe_dual_pass(&audio).await?;

    Ok(Json(EnsembleResponse {
        verbatim: pair.verbatim.into(),
        clean: pair.clean.into(),
    }))
}
