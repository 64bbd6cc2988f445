//! HTTP request handlers for the web form and its JSON endpoints.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use hydrosense_core::SensorReadings;
use hydrosense_model::Prediction;
use hydrosense_ocr::{analyze_lines, OcrResult};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::chart;
use crate::error::ApiError;
use crate::form::AnalyzeForm;
use crate::render::{self, AnalysisView, Outcome};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub lines: Vec<String>,
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Empty upload / manual-entry form.
pub async fn index() -> Html<String> {
    Html(render::index_page())
}

/// One full round: OCR the upload (if any), apply manual entries, and
/// predict once all four values are usable.
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, ApiError> {
    let form = AnalyzeForm::from_multipart(multipart).await?;

    let ocr = match &form.image {
        Some(upload) => Some(state.run_ocr(upload.data.clone()).await?),
        None => None,
    };
    let extracted = ocr.as_ref().map(|r| r.readings).unwrap_or_default();
    let readings = extracted.overlay(&form.entered);

    let blocked = readings.unusable();
    let show_manual = form.manual || !blocked.is_empty();
    let outcome = match readings.complete() {
        Ok(complete) => Some(Outcome {
            prediction: state.predictor.predict(&complete)?,
            chart_svg: chart::sensor_bar_chart(&complete)?,
        }),
        Err(e) => {
            info!("prediction skipped: {e}");
            None
        }
    };

    Ok(Html(render::analysis_page(&AnalysisView {
        upload: form.image.as_ref(),
        ocr: ocr.as_ref(),
        readings: &readings,
        show_manual,
        manual_requested: form.manual,
        blocked: &blocked,
        outcome: outcome.as_ref(),
    })))
}

/// Group and extract already-recognized OCR lines.
pub async fn extract_lines(Json(request): Json<ExtractRequest>) -> Json<OcrResult> {
    Json(analyze_lines(request.lines))
}

/// Predict from readings supplied as JSON; incomplete readings are a 422.
pub async fn predict(
    State(state): State<AppState>,
    Json(readings): Json<SensorReadings>,
) -> Result<Json<Prediction>, ApiError> {
    let complete = readings
        .complete()
        .map_err(|e| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;
    Ok(Json(state.predictor.predict(&complete)?))
}
