use std::sync::Arc;

use tailorscan_ocr::{BillPipeline, OcrBackend};

/// Shared across requests; the only process-wide state is the engine.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<BillPipeline>,
}

impl AppState {
    pub fn new(engine: Arc<dyn OcrBackend>) -> Self {
        Self { pipeline: Arc::new(BillPipeline::new(engine)) }
    }
}
