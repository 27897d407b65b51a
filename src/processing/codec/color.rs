// src/processing/codec/color.rs

//! Colour-mode normalisation ahead of lossy encoding.

use image::{DynamicImage, Rgb, RgbImage};

/// Converts any colour mode to 8-bit RGB.
///
/// Alpha is composited over opaque white; everything else (luma, 16-bit,
/// float) goes through a plain conversion. RGB8 input is passed through
/// without copying.
pub fn flatten_to_rgb(image: DynamicImage) -> DynamicImage {
    if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        let flattened = RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            let [r, g, b, a] = rgba.get_pixel(x, y).0;
            Rgb([over_white(r, a), over_white(g, a), over_white(b, a)])
        });
        return DynamicImage::ImageRgb8(flattened);
    }

    match image {
        DynamicImage::ImageRgb8(_) => image,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let (c, a) = (channel as u32, alpha as u32);
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}
