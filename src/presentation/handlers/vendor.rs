use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::EngineKind;
use crate::infrastructure::normalize::{normalize_vendor_words, WireWord};
use crate::presentation::state::AppState;

use super::ensemble::AudioBody;
use super::{decode_audio_base64, ApiError};

#[derive(Serialize)]
pub struct VendorResponse {
    pub words: Vec<WireWord>,
    pub transcript: String,
    pub model: &'static str,
}

/// Remote-vendor cross-validation proxy with fixed model and language.
#[tracing::instrument(skip(state, body))]
pub async fn deepgram_handler(
    State(state): State<AppState>,
    body: Result<Json<AudioBody>, JsonRejection>,
) -> Result<Json<VendorResponse>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::Validation(e.body_text()))?;
    let audio = decode_audio_base64(body.audio_base64).await?;

    let result = state.cross_validation.vendor_transcribe(&audio).await?;

    Ok(Json(VendorResponse {
        words: normalize_vendor_words(&result.words),
        transcript: result.transcript,
        model: EngineKind::Deepgram.model_name(),
    }))
}

#[derive(Deserialize)]
pub struct MazeBody {
    pub audio_base64: String,
    #[serde(default)]
    pub keyterms: Vec<String>,
}

#[derive(Serialize)]
pub struct MazeResponse {
    pub transcript: String,
    pub confidence: f64,
}

/// Short-clip keyterm mode: biases the vendor toward a small closed
/// vocabulary and falls back to one unboosted attempt on failure.
#[tracing::instrument(skip(state, body))]
pub async fn maze_handler(
    State(state): State<AppState>,
    body: Result<Json<MazeBody>, JsonRejection>,
) -> Result<Json<MazeResponse>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::Validation(e.body_text()))?;
    let audio = decode_audio_base64(body.audio_base64).await?;

    let result = state
        .cross_validation
        .vendor_transcribe_with_keyterms(&audio, &body.keyterms)
        .await?;

    Ok(Json(MazeResponse {
        transcript: result.transcript,
        confidence: result.confidence,
    }))
}
