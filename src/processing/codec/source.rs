// src/processing/codec/source.rs

//! Loading source images from disk.

use std::path::{Path, PathBuf};
use image::{ColorType, DynamicImage, ImageFormat, ImageReader};
use tracing::debug;
use crate::utils::{CompressorError, CompressorResult, extract_filename, validate_input_path};
use super::color::flatten_to_rgb;

/// A decoded raster owned by a single compression or composition call.
pub struct SourceImage {
    path: PathBuf,
    image: DynamicImage,
    format: Option<ImageFormat>,
}

impl SourceImage {
    /// Decodes `path`, sniffing the container format from its contents.
    ///
    /// A missing file is a validation error; anything the codec rejects is a
    /// decode error naming the file.
    pub fn open(path: &Path) -> CompressorResult<Self> {
        validate_input_path(path)?;

        let reader = ImageReader::open(path)
            .map_err(|e| CompressorError::io(format!("Cannot open '{}': {e}", path.display())))?
            .with_guessed_format()
            .map_err(|e| CompressorError::io(format!("Cannot read '{}': {e}", path.display())))?;

        let format = reader.format();
        let image = reader
            .decode()
            .map_err(|e| CompressorError::decode(path, e))?;

        debug!(
            "Loaded '{}': {}×{} {:?} ({:?})",
            extract_filename(path),
            image.width(),
            image.height(),
            image.color(),
            format
        );

        Ok(Self {
            path: path.to_path_buf(),
            image,
            format,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn color(&self) -> ColorType {
        self.image.color()
    }

    /// Container format detected while decoding, if any.
    pub fn format(&self) -> Option<ImageFormat> {
        self.format
    }

    /// Consumes the source, returning an opaque RGB8 image.
    pub fn into_rgb(self) -> DynamicImage {
        flatten_to_rgb(self.image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn open_detects_format_from_contents() {
        let dir = tempfile::tempdir().unwrap();
        // Misleading extension on purpose.
        let path = dir.path().join("picture.jpg");
        RgbaImage::from_pixel(8, 6, Rgba([0, 0, 255, 0]))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();

        let source = SourceImage::open(&path).unwrap();
        assert_eq!(source.format(), Some(ImageFormat::Png));
        assert_eq!((source.width(), source.height()), (8, 6));
        assert!(source.color().has_alpha());

        let rgb = source.into_rgb().to_rgb8();
        assert_eq!(rgb.get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let err = SourceImage::open(&path).err().unwrap();
        assert!(matches!(err, CompressorError::Decode { ref path, .. } if path.ends_with("broken.png")));
    }

    #[test]
    fn missing_file_is_a_validation_error() {
        let err = SourceImage::open(Path::new("/no/such/file.png")).err().unwrap();
        assert!(err.is_validation());
    }
}
