//! Entry points for the command-line caller.
//!
//! - [`run_compress`]: compress one image to a target size
//! - [`run_compose`]: combine images into a PDF

mod args;
mod handlers;

pub use args::{Args, Command, CompressArgs, PageEncodingArg, PdfArgs};
pub use handlers::*;
