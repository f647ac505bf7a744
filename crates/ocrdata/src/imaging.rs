//! Image decoding and recognition preprocessing.
use crate::{OcrDataError, Result};
use image::imageops::{self, FilterType};
use image::{Luma, RgbImage};
use std::path::Path;

/// Longest side, in pixels, an image is magnified to at most.
pub const MAX_CANVAS_SIZE: u32 = 2560;

/// Decode the file at `path` into an 8-bit RGB pixel buffer.
///
/// The format is detected from the file contents, not the extension.
pub fn decode_rgb(path: impl AsRef<Path>) -> Result<RgbImage> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let img = image::load_from_memory(&bytes).map_err(|e| {
        OcrDataError::image_processing_with_source(format!("Failed to decode image {}", path.display()), e)
    })?;
    Ok(img.to_rgb8())
}

/// Scale factor that magnifies by `ratio` without exceeding [`MAX_CANVAS_SIZE`].
pub fn magnification_scale(width: u32, height: u32, ratio: f32) -> f32 {
    let longest = width.max(height).max(1) as f32;
    let target = (longest * ratio).min(MAX_CANVAS_SIZE as f32);
    target / longest
}

/// Resize `image` by [`magnification_scale`].
pub fn magnify(image: &RgbImage, ratio: f32) -> RgbImage {
    let (width, height) = image.dimensions();
    let scale = magnification_scale(width, height, ratio);
    if (scale - 1.0).abs() < f32::EPSILON {
        return image.clone();
    }

    let new_width = ((width as f32 * scale).round() as u32).max(1);
    let new_height = ((height as f32 * scale).round() as u32).max(1);
    imageops::resize(image, new_width, new_height, FilterType::CatmullRom)
}

/// Luminance percentiles and the contrast derived from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastStats {
    pub low: u8,
    pub high: u8,
    pub contrast: f32,
}

fn percentile(histogram: &[u64; 256], total: u64, fraction: f64) -> u8 {
    let threshold = (total as f64 * fraction).ceil().max(1.0) as u64;
    let mut cumulative = 0u64;
    for (value, count) in histogram.iter().enumerate() {
        cumulative += count;
        if cumulative >= threshold {
            return value as u8;
        }
    }
    u8::MAX
}

/// Measure contrast from the 10th and 90th luminance percentiles.
///
/// `contrast = (high - low) / max(10, high + low)`.
pub fn contrast_stats(image: &RgbImage) -> ContrastStats {
    let gray = imageops::grayscale(image);
    let mut histogram = [0u64; 256];
    for Luma([value]) in gray.pixels() {
        histogram[*value as usize] += 1;
    }
    let total = gray.width() as u64 * gray.height() as u64;
    if total == 0 {
        return ContrastStats {
            low: 0,
            high: 0,
            contrast: 0.0,
        };
    }

    let low = percentile(&histogram, total, 0.10);
    let high = percentile(&histogram, total, 0.90);
    let contrast = (high as f32 - low as f32) / (high as f32 + low as f32).max(10.0);
    ContrastStats { low, high, contrast }
}

/// Stretch contrast when it falls below `target`.
///
/// Every channel is mapped linearly so the 10th..90th percentile range lands
/// on 25..=225, clamped to 0..=255.
pub fn adjust_contrast(image: &RgbImage, target: f32) -> RgbImage {
    let stats = contrast_stats(image);
    if stats.contrast >= target {
        return image.clone();
    }

    let ratio = 200.0 / (stats.high as f32 - stats.low as f32).max(10.0);
    let low = stats.low as f32;
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            let value = (*channel as f32 - low) * ratio + 25.0;
            *channel = value.clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// Rotate clockwise by a multiple of 90 degrees. Other angles are rejected.
pub fn rotate(image: &RgbImage, degrees: u16) -> Result<RgbImage> {
    match degrees % 360 {
        0 => Ok(image.clone()),
        90 => Ok(imageops::rotate90(image)),
        180 => Ok(imageops::rotate180(image)),
        270 => Ok(imageops::rotate270(image)),
        other => Err(OcrDataError::validation(format!(
            "Unsupported rotation {other}; only multiples of 90 degrees are supported"
        ))),
    }
}
