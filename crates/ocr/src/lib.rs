pub mod confidence;
pub mod extract;
pub mod hash;
pub mod measurements;
pub mod pipeline;
pub mod preprocess;
pub mod recognizer;
pub mod sanitize;
pub mod tsv;

pub use extract::Extractor;
pub use hash::fingerprint;
pub use measurements::{parse_measurements, ParsedMeasurements};
pub use pipeline::{assemble_extraction, assemble_measurements, BillPipeline, PipelineError};
pub use preprocess::{encode_png, prepare_for_ocr_from_bytes, PreprocessError};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError};
pub use sanitize::sanitize;

#[cfg(feature = "tesseract")]
pub use recognizer::tesseract_backend::TesseractRecognizer;
