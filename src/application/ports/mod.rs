mod timestamped_engine;
mod transcoder;
mod vendor_stt;
mod verbatim_engine;

pub use timestamped_engine::{TimedWord, TimestampedEngine, TimestampedOutput};
pub use transcoder::{AudioTranscoder, TranscodeError};
pub use vendor_stt::{VendorError, VendorSttClient, VendorTranscription, VendorWord};
pub use verbatim_engine::{ConfidenceMode, EngineError, VerbatimEngine};
