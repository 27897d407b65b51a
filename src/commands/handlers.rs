//! Command handlers behind the CLI subcommands.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use crate::core::{CompressionReport, DocumentRequest, Settings};
use crate::core::{SendProgress, compress_image_task, images_to_document_task};
use crate::processing::count_pages;
use crate::utils::{CompressorResult, ensure_extension};
use super::args::{CompressArgs, PdfArgs};

/// Reads the optional settings file, falling back to defaults.
pub async fn load_settings(path: Option<&Path>) -> CompressorResult<Settings> {
    match path {
        Some(path) => {
            debug!("Loading settings from {}", path.display());
            let json = tokio::fs::read_to_string(path).await?;
            Settings::from_json(&json)
        }
        None => Ok(Settings::default()),
    }
}

/// Compresses one image with `settings` plus any flag overrides.
///
/// # Returns
/// The report; `report.success` is false when the file was written but the
/// target was not reached.
pub async fn run_compress(settings: &Settings, args: &CompressArgs) -> CompressorResult<CompressionReport> {
    let mut config = settings.compression.clone();
    if let Some(min_dimension) = args.min_dimension {
        config.min_dimension = min_dimension;
    }

    let request = args.request();
    debug!(
        "Compressing {} → {} (target {} bytes)",
        request.source.display(),
        request.destination.display(),
        request.target_bytes
    );
    compress_image_task(config, request).await
}

/// Composes the inputs into a PDF and returns its path and page count.
pub async fn run_compose(settings: &Settings, args: &PdfArgs) -> CompressorResult<(PathBuf, usize)> {
    let mut config = settings.document.clone();
    if let Some(encoding) = args.page_encoding {
        config.page_encoding = encoding.into();
    }
    if let Some(quality) = args.jpeg_quality {
        config.jpeg_quality = quality;
    }

    let output = ensure_extension(&args.output, "pdf");
    let mut request = DocumentRequest::new(&output);
    for input in &args.inputs {
        if !request.add_unique(input) {
            warn!("Skipping duplicate input {}", input.display());
        }
    }
    debug!("Composing {} image(s) into {}", request.len(), output.display());

    let progress: SendProgress = Box::new(|percent: u8| debug!("PDF progress: {}%", percent));
    images_to_document_task(config, request, Some(progress)).await?;

    let pages = count_pages(&output)?;
    Ok((output, pages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[tokio::test]
    async fn missing_settings_file_is_an_error() {
        assert!(load_settings(Some(Path::new("/no/such/settings.json"))).await.is_err());
        assert_eq!(load_settings(None).await.unwrap(), Settings::default());
    }

    #[tokio::test]
    async fn compose_appends_pdf_extension() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.png");
        let second = dir.path().join("second.png");
        RgbImage::from_pixel(20, 20, Rgb([1, 2, 3])).save(&first).unwrap();
        RgbImage::from_pixel(20, 20, Rgb([4, 5, 6])).save(&second).unwrap();

        let args = PdfArgs {
            output: dir.path().join("album"),
            inputs: vec![first, second],
            page_encoding: None,
            jpeg_quality: None,
        };
        let (output, pages) = run_compose(&Settings::default(), &args).await.unwrap();
        assert_eq!(output, dir.path().join("album.pdf"));
        assert_eq!(pages, 2);
    }

    #[tokio::test]
    async fn compose_skips_repeated_inputs() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        RgbImage::from_pixel(20, 20, Rgb([1, 2, 3])).save(&a).unwrap();
        RgbImage::from_pixel(20, 20, Rgb([4, 5, 6])).save(&b).unwrap();

        let args = PdfArgs {
            output: dir.path().join("dupes.pdf"),
            inputs: vec![a.clone(), b, a],
            page_encoding: None,
            jpeg_quality: None,
        };
        let (_, pages) = run_compose(&Settings::default(), &args).await.unwrap();
        assert_eq!(pages, 2);
    }

    #[tokio::test]
    async fn compress_flag_overrides_settings() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        RgbImage::from_fn(64, 64, |x, y| Rgb([x as u8 * 4, y as u8 * 4, 0])).save(&input).unwrap();

        let args = CompressArgs {
            input,
            output: dir.path().join("out.png"),
            target_kb: None,
            target_bytes: Some(10_000_000),
            min_dimension: Some(10),
            json: false,
        };
        let report = run_compress(&Settings::default(), &args).await.unwrap();
        assert!(report.fast_path);
        assert!(report.success);
        assert!(dir.path().join("out.png").exists());
    }
}
