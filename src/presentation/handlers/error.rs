use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::application::ports::{EngineError, VendorError};

/// Error taxonomy surfaced to HTTP callers. Every variant renders as a small
/// JSON object with a human-readable message; stack traces and backend
/// internals stay in the server logs.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("rate limit exceeded, retry later")]
    RateLimited,
    #[error("{0} backend not configured")]
    BackendUnavailable(String),
    #[error("{0}")]
    Inference(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Unavailable(backend) => ApiError::BackendUnavailable(backend),
            EngineError::ModelLoadFailed(msg) => ApiError::Inference(format!("model load: {msg}")),
            EngineError::InferenceFailed(msg) => ApiError::Inference(msg),
        }
    }
}

impl From<VendorError> for ApiError {
    fn from(e: VendorError) -> Self {
        match e {
            VendorError::NotConfigured => ApiError::BackendUnavailable("deepgram".to_string()),
            VendorError::RequestFailed(msg) | VendorError::MalformedResponse(msg) => {
                ApiError::Inference(msg)
            }
        }
    }
}
