use anyhow::{Context, Result};
use tokio::net::TcpListener;

mod config;
mod engine;
mod error;
mod routes;
mod state;
mod telemetry;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    telemetry::init(&config.logging)?;

    // Model loading is the slow part of startup; do it before accepting traffic.
    let engine = engine::build_engine(&config.engine).context("Failed to initialize OCR engine")?;
    let state = AppState::new(engine);
    tracing::info!(engine = state.pipeline.engine_name(), "OCR engine ready");

    let app = routes::router(state, config.server.max_upload_bytes);
    let listener = TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    tracing::info!(bind = %config.server.bind, "OCR service listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        return std::future::pending().await;
    }
    tracing::info!("Shutting down");
}
