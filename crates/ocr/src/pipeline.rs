use std::path::Path;
use thiserror::Error;

use hydrosense_core::SensorReadings;
use serde::Serialize;

use crate::extract::extract_all;
use crate::group::group_lines;
use crate::preprocess::{self, PreprocessOptions};
use crate::recognizer::{OcrBackend, OcrError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image preprocessing failed: {0}")]
    Preprocess(#[from] crate::preprocess::PreprocessError),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
}

/// The result of a single screenshot processing run.
#[derive(Debug, Clone, Serialize)]
pub struct OcrResult {
    /// Lines exactly as the OCR backend reported them.
    pub raw_lines: Vec<String>,
    /// Raw lines reassembled into label/value candidates.
    pub grouped_lines: Vec<String>,
    /// Values found for each sensor field.
    pub readings: SensorReadings,
}

/// Orchestrates: preprocess → OCR → group → extract.
///
/// Every call is blocking; async callers should run it on a blocking thread.
pub struct ScreenshotPipeline<R: OcrBackend> {
    recognizer: R,
    options: PreprocessOptions,
}

impl<R: OcrBackend> ScreenshotPipeline<R> {
    pub fn new(recognizer: R, options: PreprocessOptions) -> Self {
        Self { recognizer, options }
    }

    /// Process an image file on disk.
    pub fn process_file(&self, path: &Path) -> Result<OcrResult, PipelineError> {
        let bytes = std::fs::read(path)?;
        self.process_bytes(&bytes)
    }

    /// Process raw uploaded bytes (PNG / JPEG).
    pub fn process_bytes(&self, data: &[u8]) -> Result<OcrResult, PipelineError> {
        let image_bytes = preprocess::prepare_for_ocr_from_bytes(data, &self.options)?;
        let raw_lines = self.recognizer.recognize(&image_bytes)?;
        Ok(analyze_lines(raw_lines))
    }
}

/// Run grouping + extraction on lines that were recognized elsewhere.
pub fn analyze_lines(raw_lines: Vec<String>) -> OcrResult {
    let grouped_lines = group_lines(&raw_lines);
    let readings = extract_all(&grouped_lines);
    tracing::debug!(
        raw = raw_lines.len(),
        grouped = grouped_lines.len(),
        missing = ?readings.not_found(),
        "OCR text extracted"
    );
    OcrResult { raw_lines, grouped_lines, readings }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::{MockRecognizer, UnavailableRecognizer};
    use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
    use std::io::Cursor;

    fn tiny_png() -> Vec<u8> {
        let img: GrayImage = ImageBuffer::from_fn(4, 4, |_, _| Luma([200u8]));
        let mut buf = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn serial_monitor_lines() -> MockRecognizer {
        MockRecognizer::new([
            "Body Temp",
            "= 36.5 C",
            "GSR = 512",
            "Env Temp: 28.3C",
            "Humidity: 55%",
        ])
    }

    #[test]
    fn process_bytes_produces_all_four_readings() {
        let pipeline = ScreenshotPipeline::new(serial_monitor_lines(), PreprocessOptions::default());

        let result = pipeline.process_bytes(&tiny_png()).unwrap();

        assert_eq!(result.raw_lines.len(), 5);
        assert_eq!(result.grouped_lines.len(), 1);
        assert_eq!(result.readings.body_temp, Some(36.5));
        assert_eq!(result.readings.gsr, Some(512.0));
        assert_eq!(result.readings.env_temp, Some(28.3));
        assert_eq!(result.readings.humidity, Some(55.0));
    }

    #[test]
    fn missing_fields_are_reported_not_errors() {
        let pipeline = ScreenshotPipeline::new(
            MockRecognizer::new(["Serial Monitor", "GSR = 480"]),
            PreprocessOptions::default(),
        );
        let result = pipeline.process_bytes(&tiny_png()).unwrap();
        assert_eq!(result.readings.gsr, Some(480.0));
        assert_eq!(result.readings.not_found().len(), 3);
    }

    #[test]
    fn ocr_failure_propagates() {
        let pipeline = ScreenshotPipeline::new(UnavailableRecognizer, PreprocessOptions::default());
        let err = pipeline.process_bytes(&tiny_png()).unwrap_err();
        assert!(matches!(err, PipelineError::Ocr(OcrError::NotAvailable)));
    }

    #[test]
    fn undecodable_upload_is_a_preprocess_error() {
        let pipeline = ScreenshotPipeline::new(serial_monitor_lines(), PreprocessOptions::default());
        let err = pipeline.process_bytes(b"plain text").unwrap_err();
        assert!(matches!(err, PipelineError::Preprocess(_)));
    }

    #[test]
    fn analyze_lines_skips_image_stages() {
        let result = analyze_lines(vec!["Humidity:".into(), "55%".into()]);
        assert_eq!(result.grouped_lines, vec!["Humidity:", "55%"]);
        assert_eq!(result.readings.humidity, Some(55.0));
    }

    #[test]
    fn process_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitor.png");
        std::fs::write(&path, tiny_png()).unwrap();
        let pipeline = ScreenshotPipeline::new(serial_monitor_lines(), PreprocessOptions::default());
        let result = pipeline.process_file(&path).unwrap();
        assert_eq!(result.readings.gsr, Some(512.0));

        let missing = pipeline.process_file(&dir.path().join("absent.png"));
        assert!(matches!(missing, Err(PipelineError::Io(_))));
    }
}
