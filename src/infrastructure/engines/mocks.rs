//! Hand-rolled engine doubles for router and service tests. Exported from the
//! crate so integration tests can drive the real router without any model
//! binary, vendor account, or GPU.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application::ports::{
    AudioTranscoder, ConfidenceMode, EngineError, TimestampedEngine, TimestampedOutput,
    TranscodeError, VendorError, VendorSttClient, VendorTranscription, VerbatimEngine,
};

/// Counts concurrently executing inference calls across engines. Wraps the
/// GPU permit from the outside: if serialization ever breaks, `peak` exceeds 1.
#[derive(Default)]
pub struct ConcurrencyProbe {
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl ConcurrencyProbe {
    pub fn enter(self: &Arc<Self>) -> ProbeGuard {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        ProbeGuard {
            probe: Arc::clone(self),
        }
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

pub struct ProbeGuard {
    probe: Arc<ConcurrencyProbe>,
}

impl Drop for ProbeGuard {
    fn drop(&mut self) {
        self.probe.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Primary-engine double emitting canned CTM text per pass.
pub struct MockVerbatimEngine {
    pub ctm_verbatim: String,
    pub ctm_clean: String,
    pub mode: ConfidenceMode,
    pub delay: Duration,
    pub fail: bool,
    pub probe: Option<Arc<ConcurrencyProbe>>,
    /// Audio paths observed by `transcribe`, for temp-file cleanup checks.
    pub seen_paths: Mutex<Vec<PathBuf>>,
}

impl Default for MockVerbatimEngine {
    fn default() -> Self {
        Self {
            ctm_verbatim: "clip 1 0.00 0.20 um 0.70\nclip 1 0.30 0.50 grocery 0.87".to_string(),
            ctm_clean: "clip 1 0.30 0.50 grocery 0.87".to_string(),
            mode: ConfidenceMode::Rescoring,
            delay: Duration::ZERO,
            fail: false,
            probe: None,
            seen_paths: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl VerbatimEngine for MockVerbatimEngine {
    async fn transcribe(&self, audio_path: &Path, verbatimicity: f64) -> Result<String, EngineError> {
        self.seen_paths.lock().await.push(audio_path.to_path_buf());
        let _guard = self.probe.as_ref().map(ConcurrencyProbe::enter);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(EngineError::InferenceFailed("mock inference failure".to_string()));
        }
        if verbatimicity >= 0.5 {
            Ok(self.ctm_verbatim.clone())
        } else {
            Ok(self.ctm_clean.clone())
        }
    }

    fn confidence_mode(&self) -> ConfidenceMode {
        self.mode
    }

    async fn release_gpu_cache(&self) {}
}

/// Secondary-engine double.
pub struct MockTimestampedEngine {
    pub output: TimestampedOutput,
    pub delay: Duration,
    pub probe: Option<Arc<ConcurrencyProbe>>,
}

impl Default for MockTimestampedEngine {
    fn default() -> Self {
        Self {
            output: TimestampedOutput {
                transcript: "grocery store".to_string(),
                words: None,
            },
            delay: Duration::ZERO,
            probe: None,
        }
    }
}

#[async_trait]
impl TimestampedEngine for MockTimestampedEngine {
    async fn transcribe(&self, _audio_path: &Path) -> Result<TimestampedOutput, EngineError> {
        let _guard = self.probe.as_ref().map(ConcurrencyProbe::enter);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.output.clone())
    }

    async fn release_gpu_cache(&self) {}
}

/// Vendor double. `fail_with_keyterms` makes boosted calls error so tests can
/// observe the single automatic retry without boosting.
pub struct MockVendorClient {
    pub response: VendorTranscription,
    pub fail_with_keyterms: bool,
    pub fail_always: bool,
    /// Keyterm sets in call order.
    pub calls: Mutex<Vec<Vec<String>>>,
}

impl Default for MockVendorClient {
    fn default() -> Self {
        Self {
            response: VendorTranscription {
                transcript: "grocery".to_string(),
                confidence: 0.94,
                words: vec![],
            },
            fail_with_keyterms: false,
            fail_always: false,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl VendorSttClient for MockVendorClient {
    async fn transcribe(
        &self,
        _audio: &[u8],
        keyterms: &[String],
    ) -> Result<VendorTranscription, VendorError> {
        self.calls.lock().await.push(keyterms.to_vec());
        if self.fail_always || (self.fail_with_keyterms && !keyterms.is_empty()) {
            return Err(VendorError::RequestFailed("mock vendor failure".to_string()));
        }
        Ok(self.response.clone())
    }
}

/// Transcoder double: plain byte copy, no resampling.
pub struct MockTranscoder;

#[async_trait]
impl AudioTranscoder for MockTranscoder {
    async fn to_mono_16k(&self, input: &Path, output: &Path) -> Result<(), TranscodeError> {
        tokio::fs::copy(input, output)
            .await
            .map(|_| ())
            .map_err(|e| TranscodeError::Failed(e.to_string()))
    }
}
