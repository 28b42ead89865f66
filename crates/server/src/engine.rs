use std::sync::Arc;

use tailorscan_ocr::{MockRecognizer, OcrBackend, OcrError};

use crate::config::{Acceleration, Backend, EngineConfig};

/// Load the configured OCR engine. Called once at startup; model loading
/// dominates startup time, and the returned instance serves every request.
pub fn build_engine(config: &EngineConfig) -> Result<Arc<dyn OcrBackend>, OcrError> {
    match config.backend {
        Backend::Tesseract => build_tesseract(config),
        Backend::Mock => {
            tracing::warn!("mock OCR backend selected; every image will report no text");
            Ok(Arc::new(MockRecognizer::empty()))
        }
    }
}

fn build_tesseract(config: &EngineConfig) -> Result<Arc<dyn OcrBackend>, OcrError> {
    if config.acceleration == Acceleration::Gpu {
        tracing::warn!("GPU acceleration requested; Tesseract runs on the CPU");
    }

    #[cfg(feature = "tesseract")]
    {
        let recognizer = tailorscan_ocr::TesseractRecognizer::new(
            config.data_path.as_deref(),
            &config.languages,
        )?;
        Ok(Arc::new(recognizer))
    }

    #[cfg(not(feature = "tesseract"))]
    {
        tracing::error!(
            languages = ?config.languages,
            data_path = ?config.data_path,
            "no OCR engine compiled in"
        );
        Err(OcrError::NotAvailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "tesseract"))]
    #[test]
    fn without_engine_feature_startup_fails() {
        let err = build_engine(&EngineConfig::default()).err().unwrap();
        assert!(matches!(err, OcrError::NotAvailable));
    }

    #[test]
    fn mock_backend_needs_no_engine() {
        let config = EngineConfig { backend: Backend::Mock, ..EngineConfig::default() };
        let engine = build_engine(&config).unwrap();
        assert_eq!(engine.name(), "Mock");
    }
}
