use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::domain::EngineKind;
use crate::infrastructure::normalize::{normalize_timestamped, WireWord};
use crate::presentation::state::AppState;

use super::ensemble::AudioBody;
use super::{decode_audio_base64, ApiError};

#[derive(Serialize)]
pub struct ParakeetResponse {
    pub words: Vec<WireWord>,
    pub transcript: String,
    pub model: &'static str,
}

/// Secondary local-engine cross-validation proxy. Responds 503 when the
/// backend is not installed; degraded output (no word timestamps) still
/// yields a usable transcript.
#[tracing::instrument(skip(state, body))]
pub async fn parakeet_handler(
    State(state): State<AppState>,
    body: Result<Json<AudioBody>, JsonRejection>,
) -> Result<Json<ParakeetResponse>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::Validation(e.body_text()))?;
    let audio = decode_audio_base64(body.audio_base64).await?;

    let output = state.cross_validation.secondary_transcribe(&audio).await?;

    Ok(Json(ParakeetResponse {
        words: normalize_timestamped(&output),
        transcript: output.transcript,
        model: EngineKind::Parakeet.model_name(),
    }))
}
