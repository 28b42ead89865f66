use serde::{Deserialize, Serialize};

use crate::geometry::BoundingPolygon;

/// One line of text as reported by the OCR engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedLine {
    pub bbox: BoundingPolygon,
    pub text: String,
    /// Engine certainty (0.0–1.0).
    pub confidence: f64,
}

impl RecognizedLine {
    pub fn new(bbox: BoundingPolygon, text: impl Into<String>, confidence: f64) -> Self {
        Self { bbox, text: text.into(), confidence: confidence.clamp(0.0, 1.0) }
    }
}
