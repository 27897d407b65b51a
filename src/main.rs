// Command-line caller for the compressor and the PDF composer.
// The lib.rs file serves as the public API; this binary only parses flags,
// sets up logging, and prints outcomes.

use std::process::ExitCode;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use image_compressor_lib::commands::{Args, Command, load_settings, run_compose, run_compress};

/// Exit status when a file was written but the target size was missed.
const EXIT_TARGET_MISSED: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.verbose);

    info!("=== image-compressor starting ===");

    let settings = load_settings(args.config.as_deref())
        .await
        .context("Failed to load settings")?;

    match &args.command {
        Command::Compress(compress) => {
            let report = run_compress(&settings, compress)
                .await
                .with_context(|| format!("Failed to compress {}", compress.input.display()))?;

            if compress.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else if report.success {
                println!(
                    "Compressed to {} KB ({}×{}, quality {})",
                    report.final_size / 1024,
                    report.width,
                    report.height,
                    report.quality
                );
            } else {
                println!(
                    "Compression completed but target size not reached: {} KB written",
                    report.final_size / 1024
                );
            }

            Ok(if report.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(EXIT_TARGET_MISSED)
            })
        }
        Command::Pdf(pdf) => {
            let (output, pages) = run_compose(&settings, pdf)
                .await
                .context("Failed to create PDF")?;
            println!("PDF created: {} ({} pages)", output.display(), pages);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)         // Remove file path
        .with_line_number(false)  // Remove line numbers
        .with_thread_ids(false)   // Remove thread IDs
        .with_target(false)       // Remove module path
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
