//! URL risk analyzer CLI - classifies a URL or a QR image payload.
//!
//! Usage:
//!   url-analyzer --model model.onnx --scaler scaler.json --blocklist blocklist.db url "https://example.com"
//!   url-analyzer --model model.onnx --scaler scaler.json --blocklist blocklist.db image qr.png --format json

mod report;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use analyzer_core::blocklist::BlocklistStore;
use analyzer_core::inference::{OnnxOracle, Standardizer};
use analyzer_core::pipeline::Analyzer;

use crate::report::{print_verdict, OutputFormat};

#[derive(Parser)]
#[command(name = "url-analyzer")]
#[command(about = "Blocklist- and model-based URL risk classifier")]
struct Cli {
    /// Path to the ONNX model file
    #[arg(short, long)]
    model: PathBuf,

    /// Path to the standardizer statistics JSON
    #[arg(short, long)]
    scaler: PathBuf,

    /// Path to the blocklist SQLite database
    #[arg(short, long)]
    blocklist: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a raw URL
    Url { url: String },
    /// Decode a QR image and classify its payload
    Image { path: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    eprintln!("[*] Loading model from {}...", cli.model.display());
    let oracle = Arc::new(OnnxOracle::load(&cli.model)?);

    eprintln!("[*] Loading scaler from {}...", cli.scaler.display());
    let standardizer = Standardizer::load(&cli.scaler)?;

    let blocklist = BlocklistStore::open(&cli.blocklist)?;
    let analyzer = Analyzer::new(blocklist, standardizer, oracle);

    let (url, verdict) = match &cli.command {
        Command::Url { url } => (url.clone(), analyzer.analyze_url(url)?),
        Command::Image { path } => {
            let bytes = std::fs::read(path)?;
            let url = analyzer.extract_url(&bytes)?;
            eprintln!("[*] QR payload: {url}");
            let verdict = analyzer.analyze_url(&url)?;
            (url, verdict)
        }
    };

    print_verdict(&url, &verdict, cli.format);

    Ok(())
}
