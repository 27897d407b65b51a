//! Error types for the compressor and document composer.
//!
//! Provides a hierarchy of error types using `thiserror` for ergonomic error handling.
//! A target size that cannot be reached is *not* an error: it is reported through
//! [`crate::core::CompressionReport::success`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use serde::Serialize;

/// Validation errors for requests and settings.
#[derive(Error, Debug, Serialize)]
pub enum ValidationError {
    /// Path-related validation error
    #[error("Path error: {0}")]
    Path(#[from] PathError),
    /// Invalid settings error
    #[error("Settings error: {0}")]
    Settings(String),
    /// Document composition was asked to compose nothing
    #[error("No images provided")]
    EmptyInput,
    /// Target byte budget must be positive
    #[error("Target size must be positive, got {0} bytes")]
    NonPositiveTarget(u64),
}

/// File path errors.
#[derive(Error, Debug, Serialize)]
pub enum PathError {
    /// File does not exist
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    /// Path exists but is not a file
    #[error("Not a file: {0}")]
    NotFile(PathBuf),
    /// Parent directory of an output path does not exist
    #[error("Output directory does not exist: {0}")]
    MissingParent(PathBuf),
}

/// Main error type for compression and composition.
#[derive(Error, Debug, Serialize)]
pub enum CompressorError {
    /// Request or configuration validation failed
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A source file could not be parsed as an image
    #[error("Failed to decode '{}': {message}", .path.display())]
    Decode { path: PathBuf, message: String },

    /// Codec or PDF serialisation failure
    #[error("Encode error: {0}")]
    Encode(String),

    /// File IO error
    #[error("IO error: {0}")]
    IO(String),

    /// Unsupported or invalid image format
    #[error("Format error: {0}")]
    Format(String),

    /// A blocking task panicked or was cancelled
    #[error("Task error: {0}")]
    Task(String),
}

/// Convenience result type for compressor operations.
pub type CompressorResult<T> = Result<T, CompressorError>;

impl CompressorError {
    pub fn decode(path: impl Into<PathBuf>, msg: impl ToString) -> Self {
        Self::Decode {
            path: path.into(),
            message: msg.to_string(),
        }
    }

    pub fn encode<T: Into<String>>(msg: T) -> Self {
        Self::Encode(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        Self::IO(msg.into())
    }

    pub fn format<T: Into<String>>(msg: T) -> Self {
        Self::Format(msg.into())
    }

    pub fn task<T: Into<String>>(msg: T) -> Self {
        Self::Task(msg.into())
    }

    /// True for errors caused by bad input rather than by the codec or the disk.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// Helper methods for validation error creation
impl ValidationError {
    pub fn path_not_found(path: impl Into<PathBuf>) -> Self {
        Self::Path(PathError::NotFound(path.into()))
    }

    pub fn not_a_file(path: impl Into<PathBuf>) -> Self {
        Self::Path(PathError::NotFile(path.into()))
    }

    pub fn missing_parent(path: impl Into<PathBuf>) -> Self {
        Self::Path(PathError::MissingParent(path.into()))
    }

    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}

impl From<io::Error> for CompressorError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

impl From<PathError> for CompressorError {
    fn from(err: PathError) -> Self {
        Self::Validation(ValidationError::Path(err))
    }
}

impl From<image::ImageError> for CompressorError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Self::IO(e.to_string()),
            other => Self::Encode(other.to_string()),
        }
    }
}

impl From<lopdf::Error> for CompressorError {
    fn from(err: lopdf::Error) -> Self {
        Self::Encode(format!("PDF error: {err}"))
    }
}
