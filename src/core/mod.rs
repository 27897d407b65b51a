//! Core types shared by the compressor, the composer and their callers.
//!
//! - [`CompressionRequest`] / [`CompressionReport`]: one size-targeted compression
//! - [`DocumentRequest`]: ordered pages for one PDF
//! - [`CompressionConfig`] / [`DocumentConfig`]: tunables with stock defaults
//! - [`ProgressReporter`]: monotonic progress forwarding
//! - [`task`]: async wrappers for background execution

mod config;
mod progress;
pub mod task;
mod types;

pub use config::{CompressionConfig, DocumentConfig, PageEncoding, Settings};
pub use progress::{ProgressReporter, ProgressStage};
pub use task::{compress_image_task, images_to_document_task, SendProgress};
pub use types::{CompressionReport, CompressionRequest, DocumentRequest};
