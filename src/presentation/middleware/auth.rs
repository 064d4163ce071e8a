use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::presentation::config::AccessPolicy;
use crate::presentation::handlers::ApiError;

/// Bearer-token check, active only when a token is configured. The health
/// check and CORS preflight stay reachable without a secret so monitoring and
/// browser connectivity probes never need one.
pub async fn bearer_auth(
    State(policy): State<Arc<AccessPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = policy.auth_token.as_deref() else {
        return next.run(request).await;
    };

    if request.method() == Method::OPTIONS || request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let caller = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    // Malformed header and wrong token are distinguished in logs only; the
    // caller sees the same 401 either way.
    match presented {
        None => {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                caller = %caller,
                "Rejected request with missing or malformed Authorization header"
            );
            ApiError::Unauthorized.into_response()
        }
        Some(token) if token != expected => {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                caller = %caller,
                "Rejected request with incorrect bearer token"
            );
            ApiError::Unauthorized.into_response()
        }
        Some(_) => next.run(request).await,
    }
}
