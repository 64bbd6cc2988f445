use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Failed to load image: {0}")]
    Load(#[from] image::ImageError),
    #[error("Failed to encode processed image: {0}")]
    Encode(String),
}

/// Knobs for the grayscale → upscale → contrast pass run before OCR.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreprocessOptions {
    /// Scale factor applied to both sides (serial-monitor fonts are small).
    pub upscale: f32,
    /// Contrast factor around mean luminance; 1.0 leaves the image unchanged.
    pub contrast: f32,
    /// Upper bound for the longer side after scaling, in pixels.
    pub max_dimension: u32,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self { upscale: 2.0, contrast: 2.0, max_dimension: 4000 }
    }
}

/// Load an image file, apply normalization, and return PNG bytes ready for OCR.
pub fn prepare_for_ocr(path: &Path, opts: &PreprocessOptions) -> Result<Vec<u8>, PreprocessError> {
    let img = image::open(path)?;
    encode_as_png(normalize(img, opts))
}

/// Process raw image bytes (PNG / JPEG) and return normalized PNG bytes.
pub fn prepare_for_ocr_from_bytes(
    data: &[u8],
    opts: &PreprocessOptions,
) -> Result<Vec<u8>, PreprocessError> {
    let img = image::load_from_memory(data)?;
    encode_as_png(normalize(img, opts))
}

fn normalize(img: DynamicImage, opts: &PreprocessOptions) -> DynamicImage {
    let gray = img.to_luma8();
    let gray = rescale(gray, opts);
    DynamicImage::ImageLuma8(enhance_contrast(gray, opts.contrast))
}

fn rescale(gray: GrayImage, opts: &PreprocessOptions) -> GrayImage {
    let (w, h) = gray.dimensions();
    let long_side = w.max(h) as f32;
    let mut scale = opts.upscale.max(0.0);
    if long_side * scale > opts.max_dimension as f32 {
        scale = opts.max_dimension as f32 / long_side;
    }
    if (scale - 1.0).abs() < f32::EPSILON {
        return gray;
    }

    let new_w = ((w as f32 * scale).round() as u32).max(1);
    let new_h = ((h as f32 * scale).round() as u32).max(1);
    image::imageops::resize(&gray, new_w, new_h, FilterType::CatmullRom)
}

/// Push every pixel away from (or toward) the mean luminance by `factor`.
fn enhance_contrast(gray: GrayImage, factor: f32) -> GrayImage {
    let count = (gray.width() as u64 * gray.height() as u64).max(1);
    let sum: u64 = gray.pixels().map(|p| p[0] as u64).sum();
    let mean = (sum as f32 / count as f32).round();

    ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        let p = gray.get_pixel(x, y)[0] as f32;
        let v = (mean + factor * (p - mean)).round().clamp(0.0, 255.0);
        Luma([v as u8])
    })
}

fn encode_as_png(img: DynamicImage) -> Result<Vec<u8>, PreprocessError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PreprocessError::Encode(e.to_string()))?;
    Ok(buf)
}
