use axum::body::{Body, Bytes};
use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::Request;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tailorscan_core::{ExtractionResult, MeasurementResult};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub const SERVICE_NAME: &str = "Tailor Bill OCR";

/// Multipart field carrying the bill photo.
const IMAGE_FIELD: &str = "image";

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> Envelope<T> {
    fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub success: bool,
    pub message: &'static str,
    pub service: &'static str,
    pub engine: String,
}

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/extract", post(extract))
        .route("/extract-measurements", post(extract_measurements))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                request_id = %Uuid::new_v4(),
                method = %req.method(),
                path = %req.uri().path(),
            )
        }))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        success: true,
        message: "OCR Service is running",
        service: SERVICE_NAME,
        engine: state.pipeline.engine_name().to_string(),
    })
}

async fn extract(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Envelope<ExtractionResult>>, AppError> {
    let image = read_image(multipart).await?;
    let pipeline = state.pipeline.clone();
    let data = tokio::task::spawn_blocking(move || pipeline.full_extraction(&image)).await??;
    Ok(Json(Envelope::ok(data)))
}

async fn extract_measurements(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Envelope<MeasurementResult>>, AppError> {
    let image = read_image(multipart).await?;
    let pipeline = state.pipeline.clone();
    let data =
        tokio::task::spawn_blocking(move || pipeline.measurement_extraction(&image)).await??;
    Ok(Json(Envelope::ok(data)))
}

/// Pull the `image` field out of the upload. A body that is not multipart
/// at all counts as a missing image.
async fn read_image(multipart: Result<Multipart, MultipartRejection>) -> Result<Bytes, AppError> {
    let Ok(mut multipart) = multipart else {
        return Err(AppError::MissingImage);
    };
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(IMAGE_FIELD) {
            return Ok(field.bytes().await?);
        }
    }
    Err(AppError::MissingImage)
}
