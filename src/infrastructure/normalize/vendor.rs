use serde::Serialize;

use crate::application::ports::VendorWord;

/// Word shape on the cross-validation wire. Time fields are suffixed-string
/// seconds (`"1.230s"`), not numeric floats; browser clients parse that exact
/// format, so it is part of the endpoint contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireWord {
    pub word: String,
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
    pub confidence: f64,
}

/// Formats seconds in the wire's suffixed-string form.
pub fn format_seconds(seconds: f64) -> String {
    format!("{seconds:.3}s")
}

/// Vendor words carry real per-word confidence; normalization is field
/// renaming plus the wire time format, nothing else.
pub fn normalize_vendor_words(words: &[VendorWord]) -> Vec<WireWord> {
    words
        .iter()
        .map(|w| WireWord {
            word: w.word.clone(),
            start_time: format_seconds(w.start),
            end_time: format_seconds(w.end),
            confidence: w.confidence,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_format_is_three_decimals_with_suffix() {
        assert_eq!(format_seconds(1.23), "1.230s");
        assert_eq!(format_seconds(0.0), "0.000s");
        assert_eq!(format_seconds(12.3456), "12.346s");
    }

    #[test]
    fn vendor_confidence_passes_through_unchanged() {
        let words = vec![VendorWord {
            word: "grocery".to_string(),
            start: 0.5,
            end: 0.8,
            confidence: 0.87,
        }];
        let wire = normalize_vendor_words(&words);
        assert_eq!(wire[0].confidence, 0.87);
        assert_eq!(wire[0].start_time, "0.500s");
        assert_eq!(wire[0].end_time, "0.800s");
    }
}
