use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::confidence::to_percent;
use crate::geometry::BoundingPolygon;
use crate::line::RecognizedLine;

/// Reported when the engine finds nothing on the image.
pub const NO_TEXT_MESSAGE: &str = "No text detected in image";

/// A recognized line after fraction shorthand has been rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanitizedLine {
    pub text: String,
    /// The engine's text before sanitization.
    pub original: String,
    /// Percentage (0–100), two decimals.
    pub confidence: f64,
    pub bbox: BoundingPolygon,
}

impl SanitizedLine {
    pub fn from_recognized(line: &RecognizedLine, sanitized: String) -> Self {
        Self {
            text: sanitized,
            original: line.text.clone(),
            confidence: to_percent(line.confidence),
            bbox: line.bbox,
        }
    }
}

/// Output of a full-bill extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Sanitized line texts joined by single spaces.
    pub raw_text: String,
    pub lines: Vec<SanitizedLine>,
    pub confidence: f64,
    pub phone_numbers: Vec<String>,
    /// Matched substrings, unvalidated.
    pub dates: Vec<String>,
    pub amounts: Vec<f64>,
    pub total_lines: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ExtractionResult {
    /// The well-formed result for an image with no recognizable text.
    pub fn empty() -> Self {
        Self {
            raw_text: String::new(),
            lines: vec![],
            confidence: 0.0,
            phone_numbers: vec![],
            dates: vec![],
            amounts: vec![],
            total_lines: 0,
            message: Some(NO_TEXT_MESSAGE.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementEntry {
    pub value: String,
    pub confidence: f64,
}

/// A non-empty line on which no `<CODE><value>` pair was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnknownValue {
    pub text: String,
    pub confidence: f64,
}

/// Output of a measurement extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResult {
    /// Uppercase code → value; a later line overwrites an earlier one.
    pub measurements: BTreeMap<String, MeasurementEntry>,
    pub unknown_values: Vec<UnknownValue>,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MeasurementResult {
    pub fn empty() -> Self {
        Self {
            measurements: BTreeMap::new(),
            unknown_values: vec![],
            confidence: 0.0,
            message: Some(NO_TEXT_MESSAGE.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_line_keeps_original_and_scales_confidence() {
        let line = RecognizedLine::new(BoundingPolygon::default(), "CH 38½", 0.9);
        let s = SanitizedLine::from_recognized(&line, "CH 38.5".into());
        assert_eq!(s.text, "CH 38.5");
        assert_eq!(s.original, "CH 38½");
        assert_eq!(s.confidence, 90.0);
    }

    #[test]
    fn empty_extraction_serializes_message() {
        let json = serde_json::to_value(ExtractionResult::empty()).unwrap();
        assert_eq!(json["message"], NO_TEXT_MESSAGE);
        assert_eq!(json["raw_text"], "");
        assert_eq!(json["total_lines"], 0);
        assert!(json["phone_numbers"].as_array().unwrap().is_empty());
    }

    #[test]
    fn message_omitted_when_absent() {
        let r = MeasurementResult { message: None, ..MeasurementResult::empty() };
        let json = serde_json::to_value(r).unwrap();
        assert!(json.get("message").is_none());
        assert!(json["measurements"].as_object().unwrap().is_empty());
        assert!(json["unknown_values"].as_array().unwrap().is_empty());
    }

    #[test]
    fn measurement_codes_serialize_sorted() {
        let mut r = MeasurementResult { message: None, ..MeasurementResult::empty() };
        for code in ["SL", "CH", "LEN"] {
            r.measurements
                .insert(code.into(), MeasurementEntry { value: "40".into(), confidence: 90.0 });
        }
        let json = serde_json::to_string(&r).unwrap();
        let at = |code: &str| json.find(&format!("\"{code}\":")).unwrap();
        assert!(at("CH") < at("LEN"));
        assert!(at("LEN") < at("SL"));
    }
}
