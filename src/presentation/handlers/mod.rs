mod ensemble;
mod error;
mod health;
mod parakeet;
mod vendor;

pub use ensemble::ensemble_handler;
pub use error::ApiError;
pub use health::health_handler;
pub use parakeet::parakeet_handler;
pub use vendor::{deepgram_handler, maze_handler};

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

/// Decodes the request's base64 audio off the request loop; clips run to tens
/// of megabytes encoded.
pub(crate) async fn decode_audio_base64(audio_base64: String) -> Result<Vec<u8>, ApiError> {
    let decoded = tokio::task::spawn_blocking(move || {
        BASE64_STANDARD.decode(audio_base64.trim().as_bytes())
    })
    .await
    .map_err(|e| ApiError::Inference(format!("decode task: {e}")))?
    .map_err(|_| ApiError::Validation("audio_base64 is not valid base64".to_string()))?;

    if decoded.is_empty() {
        return Err(ApiError::Validation("audio payload is empty".to_string()));
    }
    Ok(decoded)
}
