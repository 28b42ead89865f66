use image::GrayImage;
use tailorscan_core::RecognizedLine;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
    #[error("Tesseract not available; build with `tesseract` feature")]
    NotAvailable,
}

/// Abstraction over an OCR backend.
///
/// Implementations take a normalized single-channel image and return the
/// recognized lines in reading order. An empty vector means no text was
/// found, which is not an error. One instance is shared by every request, so
/// a backend whose engine is not reentrant must serialize calls itself.
pub trait OcrBackend: Send + Sync {
    fn recognize(&self, image: &GrayImage) -> Result<Vec<RecognizedLine>, OcrError>;

    /// Reported by the health endpoint.
    fn name(&self) -> &str;
}

// ── Mock backend (always available, used for tests) ───────────────────────────

/// Returns a pre-set list of lines, useful for unit testing the extraction
/// pipeline without a real engine installed.
pub struct MockRecognizer {
    pub lines: Vec<RecognizedLine>,
}

impl MockRecognizer {
    pub fn new(lines: Vec<RecognizedLine>) -> Self {
        Self { lines }
    }

    /// A recognizer that never finds any text.
    pub fn empty() -> Self {
        Self { lines: vec![] }
    }
}

impl OcrBackend for MockRecognizer {
    fn recognize(&self, _image: &GrayImage) -> Result<Vec<RecognizedLine>, OcrError> {
        Ok(self.lines.clone())
    }

    fn name(&self) -> &str {
        "Mock"
    }
}

// ── Tesseract backend (optional, gated behind `tesseract` feature) ─────────────

#[cfg(feature = "tesseract")]
pub mod tesseract_backend {
    use std::sync::Mutex;

    use image::GrayImage;
    use leptess::LepTess;
    use tailorscan_core::RecognizedLine;

    use super::{OcrBackend, OcrError};
    use crate::preprocess::encode_png;
    use crate::tsv;

    /// Tesseract behind a mutex: the API handle keeps per-image state and
    /// cannot be driven from two threads at once.
    pub struct TesseractRecognizer {
        engine: Mutex<LepTess>,
    }

    impl TesseractRecognizer {
        /// Load the language models. `languages` are Tesseract codes such as
        /// `eng` or `hin`.
        pub fn new(data_path: Option<&str>, languages: &[String]) -> Result<Self, OcrError> {
            let lang = languages.join("+");
            let engine =
                LepTess::new(data_path, &lang).map_err(|e| OcrError::Engine(e.to_string()))?;
            tracing::info!(%lang, "Tesseract engine loaded");
            Ok(Self { engine: Mutex::new(engine) })
        }
    }

    impl OcrBackend for TesseractRecognizer {
        fn recognize(&self, image: &GrayImage) -> Result<Vec<RecognizedLine>, OcrError> {
            let png = encode_png(image).map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            let mut lt = self
                .engine
                .lock()
                .map_err(|_| OcrError::Engine("engine lock poisoned".into()))?;
            lt.set_image_from_mem(&png)
                .map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            let tsv = lt.get_tsv_text(0).map_err(|e| OcrError::Engine(e.to_string()))?;
            Ok(tsv::parse_lines(&tsv))
        }

        fn name(&self) -> &str {
            "Tesseract"
        }
    }
}
