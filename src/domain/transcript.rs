use super::WordToken;

/// Identity of the engine a transcript came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    /// Primary local model with the verbatimicity control knob.
    Reverb,
    /// Remote vendor model, called over HTTP.
    Deepgram,
    /// Secondary local model with native word timestamps.
    Parakeet,
}

impl EngineKind {
    pub fn model_name(&self) -> &'static str {
        match self {
            EngineKind::Reverb => "reverb_asr_v1",
            EngineKind::Deepgram => "nova-3",
            EngineKind::Parakeet => "parakeet-tdt-0.6b-v2",
        }
    }
}

/// A normalized transcription: ordered word tokens plus the derived full text
/// and provenance metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptResult {
    pub engine: EngineKind,
    /// Only meaningful for the primary engine: 1.0 preserves disfluencies,
    /// 0.0 removes them.
    pub verbatimicity: Option<f64>,
    pub words: Vec<WordToken>,
    pub transcript: String,
}

impl TranscriptResult {
    /// Builds a result from word tokens; the full transcript is the join of
    /// the word texts.
    pub fn from_words(engine: EngineKind, verbatimicity: Option<f64>, words: Vec<WordToken>) -> Self {
        let transcript = words
            .iter()
            .map(|w| w.word.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            engine,
            verbatimicity,
            words,
            transcript,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_is_join_of_word_texts() {
        let words = vec![
            WordToken::new("the", 0.0, 0.2, 0.9),
            WordToken::new("grocery", 0.3, 0.8, 0.87),
            WordToken::new("store", 0.8, 1.2, 0.92),
        ];
        let result = TranscriptResult::from_words(EngineKind::Reverb, Some(1.0), words);
        assert_eq!(result.transcript, "the grocery store");
    }

    #[test]
    fn empty_word_list_yields_empty_transcript() {
        let result = TranscriptResult::from_words(EngineKind::Parakeet, None, vec![]);
        assert_eq!(result.transcript, "");
        assert!(result.words.is_empty());
    }
}
