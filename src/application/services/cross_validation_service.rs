use std::io::Write;
use std::sync::Arc;

use crate::application::ports::{
    AudioTranscoder, EngineError, TimestampedOutput, VendorError, VendorSttClient,
    VendorTranscription,
};
use crate::infrastructure::engines::ModelRegistry;
use crate::infrastructure::gpu::GpuScheduler;

/// Invokes the two independent cross-validation engines: the remote vendor
/// (no GPU permit needed) and the secondary local model (permit required).
pub struct CrossValidationService {
    vendor: Option<Arc<dyn VendorSttClient>>,
    registry: Arc<ModelRegistry>,
    scheduler: Arc<GpuScheduler>,
    transcoder: Arc<dyn AudioTranscoder>,
}

impl CrossValidationService {
    pub fn new(
        vendor: Option<Arc<dyn VendorSttClient>>,
        registry: Arc<ModelRegistry>,
        scheduler: Arc<GpuScheduler>,
        transcoder: Arc<dyn AudioTranscoder>,
    ) -> Self {
        Self {
            vendor,
            registry,
            scheduler,
            transcoder,
        }
    }

    fn vendor(&self) -> Result<&Arc<dyn VendorSttClient>, VendorError> {
        self.vendor.as_ref().ok_or(VendorError::NotConfigured)
    }

    /// Plain vendor transcription with fixed model and language parameters.
    pub async fn vendor_transcribe(&self, audio: &[u8]) -> Result<VendorTranscription, VendorError> {
        self.vendor()?.transcribe(audio, &[]).await
    }

    /// Keyterm-boosted vendor transcription for short single-word clips. If
    /// the boosted call fails, retries exactly once without boosting; the
    /// retry itself is never retried.
    #[tracing::instrument(skip(self, audio), fields(keyterms = keyterms.len()))]
    pub async fn vendor_transcribe_with_keyterms(
        &self,
        audio: &[u8],
        keyterms: &[String],
    ) -> Result<VendorTranscription, VendorError> {
        let vendor = self.vendor()?;
        if keyterms.is_empty() {
            return vendor.transcribe(audio, &[]).await;
        }
        match vendor.transcribe(audio, keyterms).await {
            Ok(result) => Ok(result),
            Err(e) => {
                tracing::warn!(error = %e, "Boosted vendor call failed, retrying once without keyterms");
                vendor.transcribe(audio, &[]).await
            }
        }
    }

    /// Secondary local engine. The clip is down-mixed to mono 16 kHz by the
    /// external transcoder first (outside the GPU permit), then the inference
    /// call runs under the permit. Temp files are removed on every exit path.
    #[tracing::instrument(skip(self, audio), fields(bytes = audio.len()))]
    pub async fn secondary_transcribe(&self, audio: &[u8]) -> Result<TimestampedOutput, EngineError> {
        let engine = self.registry.secondary()?;

        let mut source = tempfile::Builder::new()
            .prefix("xval-src-")
            .suffix(".wav")
            .tempfile()
            .map_err(|e| EngineError::InferenceFailed(format!("temp file: {e}")))?;
        source
            .write_all(audio)
            .map_err(|e| EngineError::InferenceFailed(format!("temp file write: {e}")))?;

        let mono = tempfile::Builder::new()
            .prefix("xval-mono-")
            .suffix(".wav")
            .tempfile()
            .map_err(|e| EngineError::InferenceFailed(format!("temp file: {e}")))?;

        self.transcoder
            .to_mono_16k(source.path(), mono.path())
            .await
            .map_err(|e| EngineError::InferenceFailed(format!("transcode: {e}")))?;

        let output = {
            let _permit = self.scheduler.acquire().await;
            let output = engine.transcribe(mono.path()).await?;
            engine.release_gpu_cache().await;
            output
        };

        Ok(output)
    }
}
