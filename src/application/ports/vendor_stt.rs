use async_trait::async_trait;

/// One word from the vendor response; times are plain seconds, confidence is
/// a genuine per-word probability.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorWord {
    pub word: String,
    pub start: f64,
    pub end: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VendorTranscription {
    pub transcript: String,
    /// Utterance-level confidence reported by the vendor.
    pub confidence: f64,
    pub words: Vec<VendorWord>,
}

/// Remote vendor STT engine, called over HTTP. Performs no local GPU work,
/// so callers do not take the GPU permit.
#[async_trait]
pub trait VendorSttClient: Send + Sync {
    /// Transcribes one audio clip. `keyterms` biases recognition toward a
    /// short closed vocabulary; pass an empty slice for no boosting.
    async fn transcribe(
        &self,
        audio: &[u8],
        keyterms: &[String],
    ) -> Result<VendorTranscription, VendorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum VendorError {
    #[error("vendor API key not configured")]
    NotConfigured,
    #[error("vendor request failed: {0}")]
    RequestFailed(String),
    #[error("vendor returned malformed response: {0}")]
    MalformedResponse(String),
}
