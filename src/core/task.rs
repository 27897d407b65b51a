//! Async wrappers that run the synchronous operations on tokio's blocking pool.
//!
//! The operations themselves stay single-threaded; these futures only keep an
//! async caller (a UI event loop, a server) from stalling while codecs run.

use tracing::warn;
use crate::core::{CompressionConfig, CompressionReport, CompressionRequest, DocumentConfig, DocumentRequest};
use crate::processing::{DocumentComposer, SizeTargetingCompressor};
use crate::utils::{CompressorError, CompressorResult};

/// Progress callback that can travel to a blocking thread.
pub type SendProgress = Box<dyn FnMut(u8) + Send + 'static>;

/// Compresses one image without blocking the async runtime.
pub async fn compress_image_task(
    config: CompressionConfig,
    request: CompressionRequest,
) -> CompressorResult<CompressionReport> {
    tokio::task::spawn_blocking(move || {
        SizeTargetingCompressor::new(config).compress(&request)
    })
    .await
    .map_err(|e| {
        warn!("Compression task failed to join: {e}");
        CompressorError::task(format!("Compression task panicked: {e}"))
    })?
}

/// Composes a document without blocking the async runtime.
///
/// `on_progress` runs on the blocking thread; marshal values back to a UI
/// thread from inside the callback if needed.
pub async fn images_to_document_task(
    config: DocumentConfig,
    request: DocumentRequest,
    on_progress: Option<SendProgress>,
) -> CompressorResult<()> {
    tokio::task::spawn_blocking(move || {
        let composer = DocumentComposer::new(config);
        match on_progress {
            Some(mut callback) => composer.compose(&request, Some(&mut *callback)),
            None => composer.compose(&request, None),
        }
    })
    .await
    .map_err(|e| {
        warn!("Document task failed to join: {e}");
        CompressorError::task(format!("Document task panicked: {e}"))
    })?
}
