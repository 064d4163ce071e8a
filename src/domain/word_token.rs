use serde::{Deserialize, Serialize};

/// A single recognized word with timing and confidence.
///
/// Invariant: `end_time >= start_time`. Tokens belonging to one transcript are
/// produced in non-decreasing `start_time` order; gaps between words are
/// normal, overlaps are tolerated because no engine forbids them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordToken {
    pub word: String,
    pub start_time: f64,
    pub end_time: f64,
    /// Probability in [0, 1]. 0.0 means "no confidence available", not
    /// "certainly wrong"; see the normalizer's confidence modes.
    pub confidence: f64,
}

impl WordToken {
    pub fn new(word: impl Into<String>, start_time: f64, end_time: f64, confidence: f64) -> Self {
        Self {
            word: word.into(),
            start_time,
            end_time,
            confidence,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}
