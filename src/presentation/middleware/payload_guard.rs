use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::CONTENT_LENGTH;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::presentation::config::AccessPolicy;
use crate::presentation::handlers::ApiError;

/// Rejects oversized requests from the declared `Content-Length`, before the
/// body is read and before auth or rate limiting run.
pub async fn payload_guard(
    State(policy): State<Arc<AccessPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let declared = request
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    if let Some(length) = declared {
        if length > policy.max_body_bytes {
            tracing::warn!(
                declared = length,
                ceiling = policy.max_body_bytes,
                path = %request.uri().path(),
                "Rejected oversized payload"
            );
            return ApiError::PayloadTooLarge.into_response();
        }
    }

    next.run(request).await
}
