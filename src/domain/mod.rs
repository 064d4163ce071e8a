mod transcript;
mod word_token;

pub use transcript::{EngineKind, TranscriptResult};
pub use word_token::WordToken;
