// src/processing/codec/formats.rs

//! In-memory encoders, one per output format.
//!
//! The size search measures candidates by encoding into a `Vec<u8>`; the same
//! function produces the bytes that end up on disk, so the measured size and
//! the written size only differ by what the filesystem reports.

use std::io::Cursor;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::DynamicImage;
use crate::utils::{CompressorError, OutputFormat};

type Result<T> = std::result::Result<T, CompressorError>;

/// Encodes `image` as JPEG at `quality` (1-100).
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
    image
        .write_with_encoder(encoder)
        .map_err(|e| CompressorError::encode(format!("JPEG encode failed: {e}")))?;
    Ok(buf)
}

/// Encodes `image` as PNG with the strongest deflate setting.
///
/// PNG is lossless, so there is no quality to apply.
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut buf, CompressionType::Best, PngFilterType::Adaptive);
    image
        .write_with_encoder(encoder)
        .map_err(|e| CompressorError::encode(format!("PNG encode failed: {e}")))?;
    Ok(buf)
}

/// Encodes through the `image` crate's generic writer (GIF, BMP, TIFF, WebP).
fn encode_generic(image: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, format.to_image_format())
        .map_err(|e| CompressorError::encode(format!("{format:?} encode failed: {e}")))?;
    Ok(cursor.into_inner())
}

/// Dispatches to the encoder for `format`. `quality` is ignored by lossless formats.
pub fn encode_image(image: &DynamicImage, format: OutputFormat, quality: u8) -> Result<Vec<u8>> {
    match format {
        OutputFormat::JPEG => encode_jpeg(image, quality),
        OutputFormat::PNG => encode_png(image),
        other => encode_generic(image, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            let noise = ((x * 7919 + y * 104_729) % 31) as u8;
            Rgb([
                (x * 255 / width) as u8 ^ noise,
                (y * 255 / height) as u8,
                ((x + y) % 256) as u8,
            ])
        }))
    }

    fn smooth_gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                (x * 255 / width) as u8,
                (y * 255 / height) as u8,
                ((x + y) * 255 / (width + height)) as u8,
            ])
        }))
    }

    #[test]
    fn jpeg_size_grows_with_quality() {
        let image = smooth_gradient(256, 192);
        let sizes: Vec<(u8, usize)> = (5..=95)
            .map(|q| (q, encode_jpeg(&image, q).unwrap().len()))
            .collect();
        for pair in sizes.windows(2) {
            let ((q_lo, lo), (q_hi, hi)) = (pair[0], pair[1]);
            assert!(lo <= hi, "quality {q_lo} gave {lo} bytes but {q_hi} gave {hi}");
        }
    }

    #[test]
    fn jpeg_encoding_is_deterministic() {
        let image = gradient(64, 64);
        assert_eq!(encode_jpeg(&image, 60).unwrap(), encode_jpeg(&image, 60).unwrap());
    }

    #[test]
    fn lossless_formats_ignore_quality() {
        let image = gradient(48, 32);
        for format in [OutputFormat::PNG, OutputFormat::BMP, OutputFormat::GIF] {
            let low = encode_image(&image, format, 5).unwrap();
            let high = encode_image(&image, format, 95).unwrap();
            assert_eq!(low, high, "{format:?} should not depend on quality");
        }
    }

    #[test]
    fn encoded_bytes_carry_the_requested_container() {
        let image = gradient(16, 16);
        for format in [
            OutputFormat::JPEG,
            OutputFormat::PNG,
            OutputFormat::GIF,
            OutputFormat::BMP,
            OutputFormat::TIFF,
        ] {
            let bytes = encode_image(&image, format, 80).unwrap();
            assert_eq!(
                image::guess_format(&bytes).unwrap(),
                format.to_image_format(),
                "{format:?}"
            );
        }
    }
}
