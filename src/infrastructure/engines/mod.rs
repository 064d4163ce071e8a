mod deepgram_client;
mod mocks;
mod parakeet_cli;
mod registry;
mod reverb_sidecar;

pub use deepgram_client::DeepgramClient;
pub use mocks::{
    ConcurrencyProbe, MockTimestampedEngine, MockTranscoder, MockVendorClient, MockVerbatimEngine,
};
pub use parakeet_cli::ParakeetCliEngine;
pub use registry::{ModelRegistry, PrimaryEngineConfig};
pub use reverb_sidecar::ReverbSidecarEngine;
