use super::AccessPolicy;

const DEFAULT_PORT: u16 = 8765;

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub access: AccessPolicy,
    pub engines: EngineSettings,
    pub vendor: VendorSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Sidecar command hosting the primary model.
    pub reverb_command: String,
    pub reverb_model: String,
    /// Secondary recognizer binary; `None` disables that backend.
    pub parakeet_command: Option<String>,
    pub parakeet_model: String,
}

#[derive(Debug, Clone)]
pub struct VendorSettings {
    /// Absence disables the vendor endpoints gracefully (503, not a crash).
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            server: ServerSettings {
                host: std::env::var("GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("GATEWAY_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(DEFAULT_PORT),
            },
            access: AccessPolicy::from_env(),
            engines: EngineSettings {
                reverb_command: std::env::var("REVERB_BIN")
                    .unwrap_or_else(|_| "reverb-sidecar".to_string()),
                reverb_model: std::env::var("REVERB_MODEL")
                    .unwrap_or_else(|_| "reverb_asr_v1".to_string()),
                parakeet_command: std::env::var("PARAKEET_BIN")
                    .ok()
                    .filter(|v| !v.trim().is_empty()),
                parakeet_model: std::env::var("PARAKEET_MODEL")
                    .unwrap_or_else(|_| "parakeet-tdt-0.6b-v2".to_string()),
            },
            vendor: VendorSettings {
                api_key: std::env::var("DEEPGRAM_API_KEY")
                    .ok()
                    .filter(|v| !v.trim().is_empty()),
                base_url: std::env::var("DEEPGRAM_BASE_URL").ok(),
            },
        }
    }
}
