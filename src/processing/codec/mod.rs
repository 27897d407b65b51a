// src/processing/codec/mod.rs

//! Pure-Rust image codec plumbing built on the `image` crate.
//!
//! # Architecture
//!
//! - [`SourceImage`]: Decodes a file and remembers its container format.
//! - [`color`]: Flattens alpha and other colour modes to RGB8.
//! - [`formats`]: Encodes to memory in the requested output format.
//! - [`resize`]: Shrink-step arithmetic and Lanczos resampling.

mod color;
mod formats;
mod resize;
mod source;

pub use color::flatten_to_rgb;
pub use formats::{encode_image, encode_jpeg};
pub use resize::{next_dimensions, resample};
pub use source::SourceImage;
