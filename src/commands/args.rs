use std::path::PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use crate::core::{CompressionRequest, PageEncoding};

/// Compress images to a target size, or bundle them into a PDF.
#[derive(Parser, Debug)]
#[command(name = "image-compressor", version, about)]
pub struct Args {
    /// Increase verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON settings file ({"compression": {...}, "document": {...}})
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compress one image to approximately a target size
    Compress(CompressArgs),
    /// Combine images, in the given order, into a PDF
    Pdf(PdfArgs),
}

#[derive(clap::Args, Debug)]
pub struct CompressArgs {
    /// Source image
    pub input: PathBuf,

    /// Where to write the compressed image
    pub output: PathBuf,

    /// Target size in kilobytes (1 KB = 1024 bytes)
    #[arg(long, short = 't', conflicts_with = "target_bytes", required_unless_present = "target_bytes")]
    pub target_kb: Option<u64>,

    /// Target size in bytes
    #[arg(long)]
    pub target_bytes: Option<u64>,

    /// Smallest width/height the fallback may shrink to
    #[arg(long)]
    pub min_dimension: Option<u32>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl CompressArgs {
    /// Builds the request from whichever target flag was supplied.
    pub fn request(&self) -> CompressionRequest {
        match (self.target_bytes, self.target_kb) {
            (Some(bytes), _) => CompressionRequest::new(&self.input, &self.output, bytes),
            (None, Some(kb)) => CompressionRequest::from_kilobytes(&self.input, &self.output, kb),
            (None, None) => CompressionRequest::new(&self.input, &self.output, 0),
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct PdfArgs {
    /// Output PDF (".pdf" is appended when missing)
    pub output: PathBuf,

    /// Images in page order
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// How page images are stored
    #[arg(long, value_enum)]
    pub page_encoding: Option<PageEncodingArg>,

    /// JPEG quality for --page-encoding jpeg
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub jpeg_quality: Option<u8>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageEncodingArg {
    /// Lossless
    Flate,
    Jpeg,
}

impl From<PageEncodingArg> for PageEncoding {
    fn from(arg: PageEncodingArg) -> Self {
        match arg {
            PageEncodingArg::Flate => PageEncoding::Flate,
            PageEncodingArg::Jpeg => PageEncoding::Jpeg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_accepts_kilobytes() {
        let args = Args::try_parse_from(["image-compressor", "compress", "in.jpg", "out.jpg", "-t", "200"]).unwrap();
        let Command::Compress(c) = args.command else { panic!("expected compress") };
        let request = c.request();
        assert_eq!(request.target_bytes, 204_800);
        assert_eq!(request.source, PathBuf::from("in.jpg"));
        assert!(!c.json);
    }

    #[test]
    fn compress_accepts_bytes() {
        let args = Args::try_parse_from([
            "image-compressor", "compress", "in.jpg", "out.jpg", "--target-bytes", "5000",
        ]).unwrap();
        let Command::Compress(c) = args.command else { panic!("expected compress") };
        assert_eq!(c.request().target_bytes, 5000);
    }

    #[test]
    fn compress_requires_exactly_one_target() {
        assert!(Args::try_parse_from(["image-compressor", "compress", "in.jpg", "out.jpg"]).is_err());
        assert!(Args::try_parse_from([
            "image-compressor", "compress", "in.jpg", "out.jpg",
            "--target-kb", "1", "--target-bytes", "5",
        ]).is_err());
    }

    #[test]
    fn pdf_keeps_input_order() {
        let args = Args::try_parse_from([
            "image-compressor", "-vv", "pdf", "book", "c.png", "a.png", "b.png",
            "--page-encoding", "jpeg",
        ]).unwrap();
        assert_eq!(args.verbose, 2);
        let Command::Pdf(p) = args.command else { panic!("expected pdf") };
        assert_eq!(p.inputs, [PathBuf::from("c.png"), PathBuf::from("a.png"), PathBuf::from("b.png")]);
        assert_eq!(p.page_encoding, Some(PageEncodingArg::Jpeg));
    }

    #[test]
    fn pdf_needs_inputs() {
        assert!(Args::try_parse_from(["image-compressor", "pdf", "out.pdf"]).is_err());
    }
}
