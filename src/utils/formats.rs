use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use crate::utils::CompressorError;

/// Container formats the compressor can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    JPEG,
    PNG,
    GIF,
    BMP,
    TIFF,
    WebP,
}

impl OutputFormat {
    const ALL: [Self; 6] = [Self::JPEG, Self::PNG, Self::GIF, Self::BMP, Self::TIFF, Self::WebP];

    /// Get file extensions associated with this format
    pub fn extensions(&self) -> &[&str] {
        match self {
            Self::JPEG => &["jpg", "jpeg"],
            Self::PNG => &["png"],
            Self::GIF => &["gif"],
            Self::BMP => &["bmp"],
            Self::TIFF => &["tif", "tiff"],
            Self::WebP => &["webp"],
        }
    }

    /// Check if the extension matches this format
    pub fn matches_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.extensions().contains(&ext.as_str())
    }

    /// Maps a detected container format to an encodable output format.
    pub fn from_image_format(format: image::ImageFormat) -> Option<Self> {
        match format {
            image::ImageFormat::Jpeg => Some(Self::JPEG),
            image::ImageFormat::Png => Some(Self::PNG),
            image::ImageFormat::Gif => Some(Self::GIF),
            image::ImageFormat::Bmp => Some(Self::BMP),
            image::ImageFormat::Tiff => Some(Self::TIFF),
            image::ImageFormat::WebP => Some(Self::WebP),
            _ => None,
        }
    }

    pub fn to_image_format(self) -> image::ImageFormat {
        match self {
            Self::JPEG => image::ImageFormat::Jpeg,
            Self::PNG => image::ImageFormat::Png,
            Self::GIF => image::ImageFormat::Gif,
            Self::BMP => image::ImageFormat::Bmp,
            Self::TIFF => image::ImageFormat::Tiff,
            Self::WebP => image::ImageFormat::WebP,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = CompressorError;

    fn from_str(ext: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.matches_extension(ext))
            .ok_or_else(|| CompressorError::format(format!(
                "Unsupported image format: {}", ext
            )))
    }
}

/// Picks the output format: the source's own format when encodable, else `fallback`.
pub fn resolve_output_format(
    detected: Option<image::ImageFormat>,
    fallback: OutputFormat,
) -> OutputFormat {
    detected
        .and_then(OutputFormat::from_image_format)
        .unwrap_or(fallback)
}

/// Get format from file extension
pub fn format_from_extension(path: &Path) -> Result<OutputFormat, CompressorError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| CompressorError::format(
            format!("File has no extension: {}", path.display())
        ))?;

    OutputFormat::from_str(ext)
}
