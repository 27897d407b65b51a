//! Tunables for the size search and the document composer.
//!
//! Every field has a default matching the stock behaviour, and the serde
//! attributes let a partial JSON file override only what it names.

use serde::{Deserialize, Serialize};
use crate::utils::{CompressorResult, OutputFormat, ValidationError};

const FAST_PATH_QUALITY: u8 = 95;
const MIN_QUALITY: u8 = 5;
const MAX_QUALITY: u8 = 95;
const CONVERGENCE_TOLERANCE: f64 = 0.05;
const FINAL_TOLERANCE: f64 = 0.20;
const SHRINK_STEP: f64 = 0.10;
const MIN_DIMENSION: u32 = 50;

const PAGE_JPEG_QUALITY: u8 = 90;
const PAGE_RESOLUTION_DPI: f64 = 72.0;

/// Settings for [`crate::processing::SizeTargetingCompressor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompressionConfig {
    /// Quality of the single up-front encode
    pub fast_path_quality: u8,
    /// Lower bound of the quality search
    pub min_quality: u8,
    /// Upper bound of the quality search
    pub max_quality: u8,
    /// Relative in-memory distance from target that ends the quality search
    pub convergence_tolerance: f64,
    /// Relative on-disk distance from target that counts as success
    pub final_tolerance: f64,
    /// Fraction removed from each dimension per fallback step
    pub shrink_step: f64,
    /// Neither side may be shrunk below this many pixels
    pub min_dimension: u32,
    /// Output format when the source format cannot be re-encoded
    pub fallback_format: OutputFormat,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            fast_path_quality: FAST_PATH_QUALITY,
            min_quality: MIN_QUALITY,
            max_quality: MAX_QUALITY,
            convergence_tolerance: CONVERGENCE_TOLERANCE,
            final_tolerance: FINAL_TOLERANCE,
            shrink_step: SHRINK_STEP,
            min_dimension: MIN_DIMENSION,
            fallback_format: OutputFormat::JPEG,
        }
    }
}

impl CompressionConfig {
    pub fn validate(&self) -> CompressorResult<()> {
        validate_quality("fastPathQuality", self.fast_path_quality)?;
        validate_quality("minQuality", self.min_quality)?;
        validate_quality("maxQuality", self.max_quality)?;

        if self.min_quality > self.max_quality {
            return Err(ValidationError::settings(format!(
                "minQuality ({}) must not exceed maxQuality ({})",
                self.min_quality, self.max_quality
            )).into());
        }

        validate_fraction("convergenceTolerance", self.convergence_tolerance)?;
        validate_fraction("finalTolerance", self.final_tolerance)?;
        validate_fraction("shrinkStep", self.shrink_step)?;

        if self.min_dimension == 0 {
            return Err(ValidationError::settings("minDimension cannot be 0").into());
        }

        Ok(())
    }

    /// Whether `size` is strictly within `tolerance × target` of `target`.
    pub fn within(size: u64, target: u64, tolerance: f64) -> bool {
        (size as f64 - target as f64).abs() < target as f64 * tolerance
    }
}

/// How page images are stored inside the PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageEncoding {
    /// Raw RGB behind a Flate filter; pixel exact
    Flate,
    /// Baseline JPEG (DCTDecode)
    Jpeg,
}

/// Settings for [`crate::processing::DocumentComposer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentConfig {
    pub page_encoding: PageEncoding,
    /// JPEG quality when `page_encoding` is `Jpeg`
    pub jpeg_quality: u8,
    /// Pixels per inch used to size each page
    pub resolution: f64,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            page_encoding: PageEncoding::Flate,
            jpeg_quality: PAGE_JPEG_QUALITY,
            resolution: PAGE_RESOLUTION_DPI,
        }
    }
}

impl DocumentConfig {
    pub fn validate(&self) -> CompressorResult<()> {
        validate_quality("jpegQuality", self.jpeg_quality)?;
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(ValidationError::settings(format!(
                "Invalid resolution: {}. Must be a positive number", self.resolution
            )).into());
        }
        Ok(())
    }
}

/// Combined settings file layout used by the command-line caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub compression: CompressionConfig,
    pub document: DocumentConfig,
}

impl Settings {
    pub fn from_json(json: &str) -> CompressorResult<Self> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| ValidationError::settings(format!("Invalid settings file: {e}")))?;
        settings.compression.validate()?;
        settings.document.validate()?;
        Ok(settings)
    }
}

fn validate_quality(name: &str, quality: u8) -> CompressorResult<()> {
    if quality == 0 || quality > 100 {
        return Err(ValidationError::settings(format!(
            "Invalid {name} value: {quality}. Must be between 1 and 100"
        )).into());
    }
    Ok(())
}

fn validate_fraction(name: &str, value: f64) -> CompressorResult<()> {
    if !(value > 0.0 && value < 1.0) {
        return Err(ValidationError::settings(format!(
            "Invalid {name} value: {value}. Must be between 0 and 1 (exclusive)"
        )).into());
    }
    Ok(())
}
