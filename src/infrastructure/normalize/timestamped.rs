use crate::application::ports::TimestampedOutput;

use super::vendor::{format_seconds, WireWord};

/// The secondary engine's standard output exposes no per-word confidence, so
/// every word carries this constant rather than a fabricated score. Known
/// limitation of that backend, not a measurement.
const SECONDARY_ENGINE_CONFIDENCE: f64 = 1.0;

/// Normalizes the secondary engine's output into wire words.
///
/// Degraded mode: when the backend yields no word-level timestamps at all,
/// the plain transcript is split on whitespace and every word gets
/// zero-valued timing fields, so the caller still receives a usable
/// transcript instead of a failure.
pub fn normalize_timestamped(output: &TimestampedOutput) -> Vec<WireWord> {
    match &output.words {
        Some(words) => words
            .iter()
            .map(|w| WireWord {
                word: w.word.clone(),
                start_time: format_seconds(w.start),
                end_time: format_seconds(w.end),
                confidence: SECONDARY_ENGINE_CONFIDENCE,
            })
            .collect(),
        None => output
            .transcript
            .split_whitespace()
            .map(|word| WireWord {
                word: word.to_string(),
                start_time: format_seconds(0.0),
                end_time: format_seconds(0.0),
                confidence: SECONDARY_ENGINE_CONFIDENCE,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use crate::application::ports::TimedWord;

    use super::*;

    #[test]
    fn native_timestamps_carry_constant_confidence() {
        let output = TimestampedOutput {
            transcript: "hello world".to_string(),
            words: Some(vec![
                TimedWord {
                    word: "hello".to_string(),
                    start: 0.1,
                    end: 0.4,
                },
                TimedWord {
                    word: "world".to_string(),
                    start: 0.5,
                    end: 0.9,
                },
            ]),
        };
        let wire = normalize_timestamped(&output);
        assert_eq!(wire.len(), 2);
        assert!(wire.iter().all(|w| w.confidence == 1.0));
        assert_eq!(wire[0].start_time, "0.100s");
    }

    #[test]
    fn missing_timestamps_fall_back_to_whitespace_split() {
        let output = TimestampedOutput {
            transcript: "fell back to plain text".to_string(),
            words: None,
        };
        let wire = normalize_timestamped(&output);
        assert_eq!(wire.len(), 5);
        assert!(wire.iter().all(|w| w.start_time == "0.000s" && w.end_time == "0.000s"));
        assert_eq!(wire[1].word, "back");
    }
}
