use std::time::Duration;

/// Origins allowed when `GATEWAY_ALLOWED_ORIGINS` is unset. `"null"` is what
/// browsers send for `file://` clients, which the local deployment relies on.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost",
    "http://localhost:8080",
    "http://127.0.0.1",
    "http://127.0.0.1:8080",
    "null",
];

/// Sized to comfortably hold a base64-encoded clip of several minutes.
const DEFAULT_MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;
const DEFAULT_RATE_QUOTA: u32 = 10;
const DEFAULT_RATE_WINDOW_SECS: u64 = 60;

/// Immutable request-interception configuration, read once at startup and
/// never mutated at runtime.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    pub allowed_origins: Vec<String>,
    /// `None` disables bearer auth entirely.
    pub auth_token: Option<String>,
    pub max_body_bytes: u64,
    /// Fixed-window quota per logical endpoint group, not per caller: the
    /// deployment model is a small number of trusted clients.
    pub rate_quota: u32,
    pub rate_window: Duration,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            auth_token: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            rate_quota: DEFAULT_RATE_QUOTA,
            rate_window: Duration::from_secs(DEFAULT_RATE_WINDOW_SECS),
        }
    }
}

impl AccessPolicy {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let allowed_origins = match std::env::var("GATEWAY_ALLOWED_ORIGINS") {
            Ok(csv) if !csv.trim().is_empty() => csv
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            _ => defaults.allowed_origins,
        };

        let auth_token = std::env::var("GATEWAY_AUTH_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let max_body_bytes = std::env::var("GATEWAY_MAX_BODY_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_body_bytes);

        let rate_quota = std::env::var("GATEWAY_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.rate_quota);

        let rate_window = std::env::var("GATEWAY_RATE_WINDOW_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.rate_window);

        Self {
            allowed_origins,
            auth_token,
            max_body_bytes,
            rate_quota,
            rate_window,
        }
    }
}
