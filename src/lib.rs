// Module declarations in dependency order
pub mod commands;
pub mod core;
pub mod processing;
pub mod utils;

// Public exports for external consumers
pub use core::{
    CompressionConfig, CompressionReport, CompressionRequest, DocumentConfig, DocumentRequest,
    PageEncoding, Settings, compress_image_task, images_to_document_task,
};
pub use processing::{
    DocumentComposer, SizeTargetingCompressor, compress_image, encode_image, images_to_document,
};
pub use utils::{CompressorError, CompressorResult, OutputFormat};

// The command-line entry point lives in main.rs; this file is the library API.
