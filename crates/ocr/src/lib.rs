pub mod extract;
pub mod group;
pub mod pipeline;
pub mod preprocess;
pub mod recognizer;

pub use extract::{extract_all, extract_field, extract_value, normalize_text};
pub use group::group_lines;
pub use pipeline::{analyze_lines, OcrResult, PipelineError, ScreenshotPipeline};
pub use preprocess::{prepare_for_ocr, prepare_for_ocr_from_bytes, PreprocessError, PreprocessOptions};
pub use recognizer::{MockRecognizer, OcrBackend, OcrError, UnavailableRecognizer};

#[cfg(feature = "tesseract")]
pub use recognizer::tesseract_backend::TesseractRecognizer;
