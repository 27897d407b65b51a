//! Core request and result types.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::utils::OutputFormat;

/// A single-image request: compress `source` into `destination` at roughly
/// `target_bytes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionRequest {
    /// Path to the source image file
    pub source: PathBuf,
    /// Path where the compressed image will be written
    pub destination: PathBuf,
    /// Target file size in bytes; must be positive
    pub target_bytes: u64,
}

impl CompressionRequest {
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        target_bytes: u64,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            target_bytes,
        }
    }

    /// Builds a request from a size in kilobytes (1 KB = 1024 bytes).
    pub fn from_kilobytes(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        target_kb: u64,
    ) -> Self {
        Self::new(source, destination, target_kb.saturating_mul(1024))
    }
}

/// Outcome of a compression that reached the end of its search.
///
/// `success` is advisory: the destination file is written either way.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionReport {
    /// Whether the on-disk size landed within the final tolerance of the target
    pub success: bool,
    /// Requested size in bytes
    pub target_bytes: u64,
    /// Size of the written file, read back from disk
    pub final_size: u64,
    /// Quality used for the written encoding
    pub quality: u8,
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Container format of the written file
    pub format: OutputFormat,
    /// The first high-quality encoding already fit
    pub fast_path: bool,
    /// Quality-search encodes performed
    pub search_iterations: u32,
    /// Resize candidates tried by the dimension fallback
    pub resize_steps: u32,
    /// `sqrt(target / size)` when the dimension fallback ran
    pub estimated_scale: Option<f64>,
}

/// Ordered list of images to compose into one document.
///
/// Order is page order. Callers build the list (reordering as they like)
/// and hand it to the composer once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    sources: Vec<PathBuf>,
    destination: PathBuf,
}

impl DocumentRequest {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            sources: Vec::new(),
            destination: destination.into(),
        }
    }

    pub fn with_sources<I, P>(destination: impl Into<PathBuf>, sources: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut request = Self::new(destination);
        request.extend(sources);
        request
    }

    /// Appends a page.
    pub fn push(&mut self, source: impl Into<PathBuf>) -> &mut Self {
        self.sources.push(source.into());
        self
    }

    /// Appends a page unless the same path is already listed.
    ///
    /// Returns whether the page was added.
    pub fn add_unique(&mut self, source: impl Into<PathBuf>) -> bool {
        let source = source.into();
        if self.sources.contains(&source) {
            return false;
        }
        self.sources.push(source);
        true
    }

    pub fn extend<I, P>(&mut self, sources: I) -> &mut Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.sources.extend(sources.into_iter().map(Into::into));
        self
    }

    /// Moves the page at `from` so it ends up at index `to`.
    pub fn move_page(&mut self, from: usize, to: usize) -> bool {
        if from >= self.sources.len() || to >= self.sources.len() {
            return false;
        }
        let page = self.sources.remove(from);
        self.sources.insert(to, page);
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<PathBuf> {
        (index < self.sources.len()).then(|| self.sources.remove(index))
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
