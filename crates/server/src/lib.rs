//! Web form for the hydration predictor.
//!
//! A single page accepts a serial-monitor screenshot and/or manually typed
//! values. Uploads go through OCR, line grouping and value extraction; once
//! all four sensor values are present and non-zero, both classifiers run and
//! the page shows their labels, recommendations and a bar chart.

pub mod chart;
pub mod config;
pub mod error;
pub mod form;
pub mod handlers;
pub mod render;
pub mod telemetry;

use axum::{
    body::Bytes,
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use hydrosense_model::{LabeledModel, ModelError, Predictor};
use hydrosense_ocr::{OcrBackend, OcrResult, ScreenshotPipeline};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::{ModelPaths, OcrConfig, ServerConfig};
use crate::error::ApiError;
pub use handlers::*;

pub type Pipeline = ScreenshotPipeline<Box<dyn OcrBackend>>;

/// Load-once artifacts shared by every request. Nothing in here is mutated
/// after startup.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub predictor: Arc<Predictor>,
}

impl AppState {
    pub fn new(pipeline: Pipeline, predictor: Predictor) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            predictor: Arc::new(predictor),
        }
    }

    /// OCR is CPU-bound and blocking, so it runs off the async workers.
    pub async fn run_ocr(&self, image: Bytes) -> Result<OcrResult, ApiError> {
        tracing::info!(bytes = image.len(), "running OCR on upload");
        let pipeline = Arc::clone(&self.pipeline);
        let result = tokio::task::spawn_blocking(move || pipeline.process_bytes(&image)).await??;
        Ok(result)
    }
}

/// Pick the OCR engine compiled into this binary.
pub fn build_pipeline(ocr: &OcrConfig) -> Pipeline {
    ScreenshotPipeline::new(build_recognizer(ocr), ocr.preprocess_options())
}

#[cfg(feature = "tesseract")]
fn build_recognizer(ocr: &OcrConfig) -> Box<dyn OcrBackend> {
    let data_path = ocr
        .tessdata_dir
        .as_ref()
        .map(|p| p.to_string_lossy().into_owned());
    Box::new(hydrosense_ocr::TesseractRecognizer::new(data_path, &ocr.language))
}

#[cfg(not(feature = "tesseract"))]
fn build_recognizer(_ocr: &OcrConfig) -> Box<dyn OcrBackend> {
    tracing::warn!("built without the `tesseract` feature; uploads need manual entry");
    Box::new(hydrosense_ocr::UnavailableRecognizer)
}

pub fn load_predictor(paths: &ModelPaths) -> Result<Predictor, ModelError> {
    let hydration = LabeledModel::load(&paths.hydration_model, &paths.hydration_labels)?;
    let season = LabeledModel::load(&paths.season_model, &paths.season_labels)?;
    tracing::info!("classifier artifacts loaded");
    Ok(Predictor::new(hydration, season))
}

/// Build the router with all endpoints
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/analyze", post(analyze))
        .route("/api/extract", post(extract_lines))
        .route("/api/predict", post(predict))
        .route("/health", get(health_check))
        // Size is enforced by the tower-http layer instead of axum's 2 MB default.
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: &ServerConfig, state: AppState) -> Result<(), std::io::Error> {
    tracing::info!("Starting web form on {}", config.bind_addr);

    let app = build_router(state, config.max_upload_bytes);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    axum::serve(listener, app).await
}
