//! Size-targeting compression.
//!
//! There is no closed-form mapping from quality or dimensions to encoded
//! size, so the compressor measures: one encode at high quality, a binary
//! search over the quality knob, then (if still too large) a stepwise shrink
//! of the pixel dimensions at the last quality tried. Every candidate is
//! encoded to memory; only the accepted one is written.

use std::path::{Path, PathBuf};
use image::DynamicImage;
use tracing::{debug, info, warn};

use crate::core::{CompressionConfig, CompressionReport, CompressionRequest};
use crate::utils::{
    CompressorError, CompressorResult, OutputFormat, extract_filename, format_from_extension,
    get_file_size, resolve_output_format, validate_request,
};
use super::codec::{SourceImage, encode_image, next_dimensions, resample};

/// Compresses `source` into `destination` at roughly `target_bytes`.
///
/// Returns `Ok(false)` when a file was written but missed the final tolerance.
pub fn compress_image(
    source: impl Into<PathBuf>,
    destination: impl Into<PathBuf>,
    target_bytes: u64,
) -> CompressorResult<bool> {
    let request = CompressionRequest::new(source, destination, target_bytes);
    SizeTargetingCompressor::default()
        .compress(&request)
        .map(|report| report.success)
}

/// Stateless driver for the size search. Cheap to construct per call.
#[derive(Debug, Clone, Default)]
pub struct SizeTargetingCompressor {
    config: CompressionConfig,
}

impl SizeTargetingCompressor {
    pub fn new(config: CompressionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    /// Runs the full search for one request and writes the destination file.
    pub fn compress(&self, request: &CompressionRequest) -> CompressorResult<CompressionReport> {
        self.config.validate()?;
        validate_request(request)?;

        let config = &self.config;
        let target = request.target_bytes;
        let destination = request.destination.as_path();

        let source = SourceImage::open(&request.source)?;
        let format = resolve_output_format(source.format(), config.fallback_format);
        warn_on_extension_mismatch(destination, format);
        let (width, height) = (source.width(), source.height());
        let image = source.into_rgb();

        let first = encode_image(&image, format, config.fast_path_quality)?;
        debug!(
            "'{}' at quality {}: {} bytes (target {})",
            extract_filename(&request.source),
            config.fast_path_quality,
            first.len(),
            target
        );

        if first.len() as u64 <= target {
            write_output(destination, &first)?;
            let final_size = get_file_size(destination)?;
            info!(
                "'{}' already fits: {} bytes ≤ {} bytes",
                extract_filename(&request.source),
                final_size,
                target
            );
            return Ok(CompressionReport {
                success: true,
                target_bytes: target,
                final_size,
                quality: config.fast_path_quality,
                width,
                height,
                format,
                fast_path: true,
                search_iterations: 0,
                resize_steps: 0,
                estimated_scale: None,
            });
        }

        let mut state = SearchState::new(config, first.len() as u64, width, height);
        let converged = state.search_quality(target, config.convergence_tolerance, |quality| {
            Ok(encode_image(&image, format, quality)?.len() as u64)
        })?;

        // A converged probe is accepted as is, even slightly above the target.
        let resized = if !converged && state.size > target {
            self.shrink_to_fit(&image, format, target, &mut state)?
        } else {
            None
        };

        let accepted = resized.as_ref().unwrap_or(&image);
        let bytes = encode_image(accepted, format, state.quality)?;
        write_output(destination, &bytes)?;

        // Verify against what actually landed on disk.
        let final_size = get_file_size(destination)?;
        let success = CompressionConfig::within(final_size, target, config.final_tolerance);

        if success {
            info!(
                "'{}' compressed to {} bytes (target {}, quality {}, {}×{})",
                extract_filename(&request.source),
                final_size,
                target,
                state.quality,
                state.width,
                state.height
            );
        } else {
            warn!(
                "'{}' missed target: {} bytes written for target {} (quality {}, {}×{})",
                extract_filename(&request.source),
                final_size,
                target,
                state.quality,
                state.width,
                state.height
            );
        }

        Ok(CompressionReport {
            success,
            target_bytes: target,
            final_size,
            quality: state.quality,
            width: state.width,
            height: state.height,
            format,
            fast_path: false,
            search_iterations: state.iterations,
            resize_steps: state.resize_steps,
            estimated_scale: state.estimated_scale,
        })
    }

    /// Shrinks both sides by `shrink_step` per round, re-encoding from the
    /// full-size image at the last quality, until a candidate fits.
    ///
    /// Returns the first fitting candidate, or `None` once the next step would
    /// cross `min_dimension`.
    fn shrink_to_fit(
        &self,
        image: &DynamicImage,
        format: OutputFormat,
        target: u64,
        state: &mut SearchState,
    ) -> CompressorResult<Option<DynamicImage>> {
        let scale = (target as f64 / state.size as f64).sqrt();
        state.estimated_scale = Some(scale);
        debug!(
            "Quality {} still gives {} bytes; estimated linear scale {:.3}",
            state.quality, state.size, scale
        );

        let (mut width, mut height) = (state.width, state.height);
        while state.size > target {
            let Some((next_w, next_h)) = next_dimensions(
                width,
                height,
                self.config.shrink_step,
                self.config.min_dimension,
            ) else {
                debug!("Dimension floor reached at {}×{}", width, height);
                break;
            };
            (width, height) = (next_w, next_h);

            let candidate = resample(image, width, height);
            state.size = encode_image(&candidate, format, state.quality)?.len() as u64;
            state.resize_steps += 1;
            debug!("Resized to {}×{}: {} bytes", width, height, state.size);

            if state.size <= target {
                state.width = width;
                state.height = height;
                return Ok(Some(candidate));
            }
        }

        Ok(None)
    }
}

/// Transient bookkeeping for one compression call.
#[derive(Debug, Clone)]
struct SearchState {
    quality: u8,
    min_quality: u8,
    max_quality: u8,
    /// Size of the most recent encode
    size: u64,
    /// Dimensions of the image that will be written
    width: u32,
    height: u32,
    iterations: u32,
    resize_steps: u32,
    estimated_scale: Option<f64>,
}

impl SearchState {
    fn new(config: &CompressionConfig, size: u64, width: u32, height: u32) -> Self {
        Self {
            quality: config.fast_path_quality,
            min_quality: config.min_quality,
            max_quality: config.max_quality,
            size,
            width,
            height,
            iterations: 0,
            resize_steps: 0,
            estimated_scale: None,
        }
    }

    /// Binary search over quality. `measure` returns the encoded size at a quality.
    ///
    /// Stops early once a size is within `tolerance` of `target` and returns
    /// `true`; otherwise ends when the bounds cross and returns `false`. Either
    /// way `quality`/`size` are left at the last probe.
    fn search_quality<F>(&mut self, target: u64, tolerance: f64, mut measure: F) -> CompressorResult<bool>
    where
        F: FnMut(u8) -> CompressorResult<u64>,
    {
        while self.min_quality <= self.max_quality {
            let quality = ((self.min_quality as u16 + self.max_quality as u16) / 2) as u8;
            let size = measure(quality)?;
            self.quality = quality;
            self.size = size;
            self.iterations += 1;
            debug!(
                "Search [{}, {}] quality {}: {} bytes",
                self.min_quality, self.max_quality, quality, size
            );

            if CompressionConfig::within(size, target, tolerance) {
                return Ok(true);
            }

            if size > target {
                match quality.checked_sub(1) {
                    Some(lower) => self.max_quality = lower,
                    None => break,
                }
            } else {
                self.min_quality = quality + 1;
            }
        }
        Ok(false)
    }
}

fn write_output(destination: &Path, bytes: &[u8]) -> CompressorResult<()> {
    std::fs::write(destination, bytes).map_err(|e| {
        CompressorError::io(format!("Cannot write '{}': {e}", destination.display()))
    })
}

fn warn_on_extension_mismatch(destination: &Path, format: OutputFormat) {
    if let Ok(by_extension) = format_from_extension(destination) {
        if by_extension != format {
            warn!(
                "Writing {:?} data to '{}' whose extension suggests {:?}",
                format,
                destination.display(),
                by_extension
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> SearchState {
        SearchState::new(&CompressionConfig::default(), u64::MAX, 100, 100)
    }

    #[test]
    fn search_stops_as_soon_as_size_converges() {
        let mut probes = Vec::new();
        let mut s = state();
        let converged = s
            .search_quality(50_000, 0.05, |q| {
                probes.push(q);
                Ok(q as u64 * 1_000)
            })
            .unwrap();
        assert!(converged);
        assert_eq!(probes, [50]);
        assert_eq!((s.quality, s.size, s.iterations), (50, 50_000, 1));
    }

    #[test]
    fn converged_probe_above_target_ends_the_search() {
        let mut s = state();
        let converged = s.search_quality(48_000, 0.05, |q| Ok(q as u64 * 1_000)).unwrap();
        assert!(converged);
        assert_eq!((s.quality, s.size, s.iterations), (50, 50_000, 1));
        assert!(s.size > 48_000);
    }

    #[test]
    fn search_narrows_towards_target() {
        let mut s = state();
        s.search_quality(20_000, 0.05, |q| Ok(q as u64 * 1_000)).unwrap();
        assert!(CompressionConfig::within(s.size, 20_000, 0.05));
        assert_eq!(s.quality, 20);
    }

    #[test]
    fn search_is_bounded_for_every_target() {
        // Convex size curve, steep enough that many targets never converge.
        let curve = |q: u8| -> CompressorResult<u64> { Ok(40 * (q as u64).pow(2) + 300) };
        for target in (1..400_000).step_by(1_337) {
            let mut s = state();
            s.search_quality(target, 0.05, curve).unwrap();
            assert!(s.iterations <= 7, "target {target}: {} iterations", s.iterations);
            assert!((5..=95).contains(&s.quality));
        }
    }

    #[test]
    fn unreachable_target_ends_at_minimum_quality() {
        let mut s = state();
        assert!(!s.search_quality(1, 0.05, |q| Ok(q as u64 * 1_000)).unwrap());
        assert_eq!(s.quality, 5);
        assert_eq!(s.size, 5_000);
        assert!(s.min_quality > s.max_quality);
    }

    #[test]
    fn search_propagates_encoder_errors() {
        let mut s = state();
        let err = s
            .search_quality(10, 0.05, |_| Err(CompressorError::encode("codec exploded")))
            .unwrap_err();
        assert!(matches!(err, CompressorError::Encode(_)));
        assert_eq!(s.iterations, 0);
    }

    #[test]
    fn invalid_config_is_rejected_before_touching_files() {
        let compressor = SizeTargetingCompressor::new(CompressionConfig {
            min_quality: 90,
            max_quality: 10,
            ..Default::default()
        });
        let request = CompressionRequest::new("/no/such/in.jpg", "/no/such/out.jpg", 10);
        assert!(compressor.compress(&request).unwrap_err().is_validation());
    }
}
