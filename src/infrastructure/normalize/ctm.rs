use crate::application::ports::ConfidenceMode;
use crate::domain::WordToken;

/// Filler words that get the low legacy-confidence default.
const FILLER_WORDS: &[&str] = &["um", "uh", "er", "ah", "mm", "hmm"];

/// Legacy-mode default for filler words.
const LEGACY_FILLER_CONFIDENCE: f64 = 0.7;
/// Legacy-mode default for everything else.
const LEGACY_CONTENT_CONFIDENCE: f64 = 0.9;

/// Parses the primary engine's CTM-style output into word tokens.
///
/// One line per word: `file channel start duration word [confidence]`. Lines
/// with fewer than 5 whitespace-separated fields are discarded.
///
/// Confidence depends on the backend's capability:
/// - `Rescoring`: the parsed value is a genuine per-word probability and is
///   used verbatim; an absent field maps to 0.0 ("no confidence available").
/// - `Legacy`: the backend's confidence output is unusable, so a documented
///   type-based default is substituted: 0.7 for filler words, 0.9 otherwise.
///   This is an explicit fallback for a backend defect, not a real score.
pub fn parse_ctm(ctm: &str, mode: ConfidenceMode) -> Vec<WordToken> {
    ctm.lines().filter_map(|line| parse_line(line, mode)).collect()
}

fn parse_line(line: &str, mode: ConfidenceMode) -> Option<WordToken> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 5 {
        return None;
    }

    let start: f64 = fields[2].parse().ok()?;
    let duration: f64 = fields[3].parse().ok()?;
    let word = fields[4];

    let parsed_confidence = fields.get(5).and_then(|f| f.parse::<f64>().ok());
    let confidence = match mode {
        ConfidenceMode::Rescoring => parsed_confidence.unwrap_or(0.0),
        ConfidenceMode::Legacy => legacy_confidence(word),
    };

    Some(WordToken::new(word, start, start + duration, confidence))
}

fn legacy_confidence(word: &str) -> f64 {
    let lowered = word.to_lowercase();
    if FILLER_WORDS.contains(&lowered.as_str()) {
        LEGACY_FILLER_CONFIDENCE
    } else {
        LEGACY_CONTENT_CONFIDENCE
    }
}
