use std::sync::Arc;
use std::time::Instant;

use tailorscan_core::{ExtractionResult, MeasurementResult, RecognizedLine, SanitizedLine};
use thiserror::Error;

use crate::confidence;
use crate::extract::Extractor;
use crate::hash;
use crate::measurements::parse_measurements;
use crate::preprocess;
use crate::recognizer::{OcrBackend, OcrError};
use crate::sanitize::sanitize;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("missing image")]
    MissingImage,
    #[error("Image preprocessing failed: {0}")]
    Preprocess(#[from] crate::preprocess::PreprocessError),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
}

/// Orchestrates: validate → preprocess → OCR → extract.
///
/// The engine is shared by every request for the life of the process.
/// Each call runs synchronously start to finish; callers on an async runtime
/// should move it onto a blocking thread.
pub struct BillPipeline {
    engine: Arc<dyn OcrBackend>,
}

impl BillPipeline {
    pub fn new(engine: Arc<dyn OcrBackend>) -> Self {
        Self { engine }
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Full-bill extraction: sanitized lines plus phone numbers, dates and
    /// amounts found anywhere on the bill.
    pub fn full_extraction(&self, data: &[u8]) -> Result<ExtractionResult, PipelineError> {
        let lines = self.recognize(data)?;
        Ok(assemble_extraction(&lines))
    }

    /// Measurement extraction: `<CODE><value>` pairs per line.
    pub fn measurement_extraction(&self, data: &[u8]) -> Result<MeasurementResult, PipelineError> {
        let lines = self.recognize(data)?;
        Ok(assemble_measurements(&lines))
    }

    fn recognize(&self, data: &[u8]) -> Result<Vec<RecognizedLine>, PipelineError> {
        if data.is_empty() {
            return Err(PipelineError::MissingImage);
        }
        let started = Instant::now();
        let fingerprint = hash::fingerprint(data);

        let image = preprocess::prepare_for_ocr_from_bytes(data)?;
        tracing::debug!(
            %fingerprint,
            width = image.width(),
            height = image.height(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "image normalized"
        );

        let lines = self.engine.recognize(&image)?;
        tracing::info!(
            %fingerprint,
            bytes = data.len(),
            lines = lines.len(),
            engine = self.engine.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "bill recognized"
        );
        Ok(lines)
    }
}

/// Build the full-extraction result from the engine's lines.
pub fn assemble_extraction(lines: &[RecognizedLine]) -> ExtractionResult {
    if lines.is_empty() {
        return ExtractionResult::empty();
    }

    let sanitized: Vec<SanitizedLine> = lines
        .iter()
        .map(|l| SanitizedLine::from_recognized(l, sanitize(&l.text)))
        .collect();
    let raw_text = sanitized
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();

    ExtractionResult {
        phone_numbers: Extractor::phone_numbers(&raw_text),
        dates: Extractor::dates(&raw_text),
        amounts: Extractor::amounts(&raw_text),
        confidence: confidence::aggregate(lines),
        total_lines: sanitized.len(),
        lines: sanitized,
        raw_text,
        message: None,
    }
}

/// Build the measurement result from the engine's lines.
pub fn assemble_measurements(lines: &[RecognizedLine]) -> MeasurementResult {
    if lines.is_empty() {
        return MeasurementResult::empty();
    }
    let parsed = parse_measurements(lines);
    MeasurementResult {
        measurements: parsed.measurements,
        unknown_values: parsed.unknown_values,
        confidence: confidence::aggregate(lines),
        message: None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
