use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::config::AccessPolicy;
use crate::presentation::handlers::{
    deepgram_handler, ensemble_handler, health_handler, maze_handler, parakeet_handler,
};
use crate::presentation::middleware::{bearer_auth, payload_guard, rate_limit};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.policy);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Layers run outside-in, so the access pipeline order is: request id,
    // CORS, size guard, auth, rate limit. The size guard must come before
    // auth and rate limiting; the router is the single place encoding that.
    Router::new()
        .route("/health", get(health_handler))
        .route("/ensemble", post(ensemble_handler))
        .route("/deepgram", post(deepgram_handler))
        .route("/parakeet", post(parakeet_handler))
        .route("/maze", post(maze_handler))
        .layer(middleware::from_fn_with_state(
            state.limiter.clone(),
            rate_limit,
        ))
        .layer(middleware::from_fn_with_state(
            state.policy.clone(),
            bearer_auth,
        ))
        .layer(middleware::from_fn_with_state(
            state.policy.clone(),
            payload_guard,
        ))
        .layer(trace_layer)
        .layer(cors)
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Allow-list CORS. `"null"` is a literal allowed value: file-based local
/// clients send it as their origin. Requests without an Origin header are
/// not CORS requests and pass untouched.
fn cors_layer(policy: &AccessPolicy) -> CorsLayer {
    let origins: Vec<HeaderValue> = policy
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}
