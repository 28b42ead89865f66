use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tailorscan_ocr::PipelineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("No image file provided")]
    MissingImage,
    #[error("Invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),
    #[error(transparent)]
    Pipeline(PipelineError),
    #[error("Processing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<PipelineError> for AppError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::MissingImage => AppError::MissingImage,
            other => AppError::Pipeline(other),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingImage => StatusCode::BAD_REQUEST,
            // axum picks the code; 413 when the upload limit was hit.
            AppError::Multipart(e) => e.status(),
            AppError::Pipeline(_) | AppError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        (status, Json(ErrorBody { success: false, error: self.to_string() })).into_response()
    }
}
