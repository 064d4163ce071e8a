use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::presentation::handlers::ApiError;

/// Fixed-window counter keyed per logical endpoint group. Global, not
/// per-caller: the deployment serves a handful of trusted clients and the
/// quota protects the GPU and the vendor account, not fairness.
pub struct FixedWindowLimiter {
    quota: u32,
    window: Duration,
    windows: Mutex<HashMap<&'static str, WindowState>>,
}

struct WindowState {
    started: Instant,
    count: u32,
}

impl FixedWindowLimiter {
    pub fn new(quota: u32, window: Duration) -> Self {
        Self {
            quota,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Counts one request against `group`. Returns false once the quota for
    /// the current window is spent.
    pub fn try_acquire(&self, group: &'static str) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock().expect("rate limiter lock poisoned");
        let state = windows.entry(group).or_insert(WindowState {
            started: now,
            count: 0,
        });

        if now.duration_since(state.started) >= self.window {
            state.started = now;
            state.count = 0;
        }

        if state.count < self.quota {
            state.count += 1;
            true
        } else {
            false
        }
    }
}

/// Maps a request path to its rate-limit group. Paths outside both groups
/// (health, preflight) are never limited.
pub fn endpoint_group(path: &str) -> Option<&'static str> {
    match path {
        "/ensemble" | "/parakeet" => Some("gpu"),
        "/deepgram" | "/maze" => Some("vendor"),
        _ => None,
    }
}

pub async fn rate_limit(
    State(limiter): State<Arc<FixedWindowLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(group) = endpoint_group(request.uri().path()) {
        if !limiter.try_acquire(group) {
            tracing::warn!(group, path = %request.uri().path(), "Rate limit exceeded");
            return ApiError::RateLimited.into_response();
        }
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_exhausts_within_one_window() {
        let limiter = FixedWindowLimiter::new(3, Duration::from_secs(60));
        assert!(limiter.try_acquire("gpu"));
        assert!(limiter.try_acquire("gpu"));
        assert!(limiter.try_acquire("gpu"));
        assert!(!limiter.try_acquire("gpu"));
    }

    #[test]
    fn groups_are_counted_independently() {
        let limiter = FixedWindowLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.try_acquire("gpu"));
        assert!(limiter.try_acquire("vendor"));
        assert!(!limiter.try_acquire("gpu"));
    }

    #[test]
    fn window_expiry_resets_the_counter() {
        let limiter = FixedWindowLimiter::new(1, Duration::ZERO);
        assert!(limiter.try_acquire("gpu"));
        // zero-length window: every call starts a fresh one
        assert!(limiter.try_acquire("gpu"));
    }

    #[test]
    fn health_path_is_never_limited() {
        assert_eq!(endpoint_group("/health"), None);
        assert_eq!(endpoint_group("/ensemble"), Some("gpu"));
        assert_eq!(endpoint_group("/maze"), Some("vendor"));
    }
}
