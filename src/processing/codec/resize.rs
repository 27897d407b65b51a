// src/processing/codec/resize.rs

//! Dimension arithmetic and resampling for the size fallback.

use image::imageops::FilterType;
use image::DynamicImage;

/// Dimensions after removing `step` (a fraction) from each side, truncating.
///
/// Returns `None` when either shrunk side would fall below `min_dimension`.
pub fn next_dimensions(width: u32, height: u32, step: f64, min_dimension: u32) -> Option<(u32, u32)> {
    let factor = 1.0 - step;
    let next_w = (width as f64 * factor) as u32;
    let next_h = (height as f64 * factor) as u32;

    if next_w < min_dimension || next_h < min_dimension {
        return None;
    }
    // A step too small to change anything would loop forever.
    if next_w == width && next_h == height {
        return None;
    }
    Some((next_w, next_h))
}

/// Resamples `image` to exactly `width`×`height` with a Lanczos3 filter.
pub fn resample(image: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    image.resize_exact(width, height, FilterType::Lanczos3)
}
