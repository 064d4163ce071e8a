use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{VendorError, VendorSttClient, VendorTranscription, VendorWord};

const DEFAULT_BASE_URL: &str = "https://api.deepgram.com";
const VENDOR_MODEL: &str = "nova-3";
const VENDOR_LANGUAGE: &str = "en";

/// Remote vendor STT client. The browser cannot call the vendor directly
/// (no CORS), so the gateway proxies it with fixed model and language
/// parameters.
pub struct DeepgramClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Deserialize)]
struct ListenResponse {
    results: ListenResults,
}

#[derive(Deserialize)]
struct ListenResults {
    channels: Vec<ListenChannel>,
}

#[derive(Deserialize)]
struct ListenChannel {
    alternatives: Vec<ListenAlternative>,
}

#[derive(Deserialize)]
struct ListenAlternative {
    transcript: String,
    confidence: f64,
    #[serde(default)]
    words: Vec<ListenWord>,
}

#[derive(Deserialize)]
struct ListenWord {
    word: String,
    start: f64,
    end: f64,
    confidence: f64,
}

impl DeepgramClient {
    pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }
}

#[async_trait]
impl VendorSttClient for DeepgramClient {
    #[tracing::instrument(skip(self, audio), fields(bytes = audio.len(), keyterms = keyterms.len()))]
    async fn transcribe(
        &self,
        audio: &[u8],
        keyterms: &[String],
    ) -> Result<VendorTranscription, VendorError> {
        let mut query: Vec<(&str, String)> = vec![
            ("model", VENDOR_MODEL.to_string()),
            ("language", VENDOR_LANGUAGE.to_string()),
            ("punctuate", "false".to_string()),
            ("smart_format", "false".to_string()),
        ];
        for term in keyterms {
            query.push(("keyterm", term.clone()));
        }

        let response = self
            .client
            .post(format!("{}/v1/listen", self.base_url))
            .query(&query)
            .header("Authorization", format!("Token {}", self.api_key))
            .header("Content-Type", "audio/wav")
            .body(audio.to_vec())
            .send()
            .await
            .map_err(|e| VendorError::RequestFailed(format!("request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Vendor STT returned an error");
            return Err(VendorError::RequestFailed(format!("{status}: {body}")));
        }

        let parsed: ListenResponse = response
            .json()
            .await
            .map_err(|e| VendorError::MalformedResponse(e.to_string()))?;

        let alternative = parsed
            .results
            .channels
            .first()
            .and_then(|c| c.alternatives.first())
            .ok_or_else(|| VendorError::MalformedResponse("no alternatives".to_string()))?;

        Ok(VendorTranscription {
            transcript: alternative.transcript.clone(),
            confidence: alternative.confidence,
            words: alternative
                .words
                .iter()
                .map(|w| VendorWord {
                    word: w.word.clone(),
                    start: w.start,
                    end: w.end,
                    confidence: w.confidence,
                })
                .collect(),
        })
    }
}
