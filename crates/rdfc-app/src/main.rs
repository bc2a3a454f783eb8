//! rdFC Pattern Generator
//!
//! Generates the rdFC pattern of a 5-minute EEG epoch of an electrode
//! triplet and scores it against the three reference patterns. The signals
//! are band-pass filtered from 0.5 Hz to 70 Hz and notch filtered at the
//! mains frequency before pattern generation.
//!
//! # Usage
//!
//! ```bash
//! # 256 Hz recording from a 50 Hz mains region
//! rdfc --input-file sample1.txt --sampling-rate 256 --notch-frequency 50
//!
//! # JSON output with progress logging on stderr
//! rdfc --input-file sample2.txt --sampling-rate 256 --notch-frequency 60 \
//!     --format json --log-level info
//! ```

mod epoch_file;
mod report;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use rdfc_core::{Epoch, NotchFrequency};
use rdfc_native::{PipelineConfig, RdfcPipeline};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// rdFC pattern generator
#[derive(Parser, Debug)]
#[command(name = "rdfc")]
#[command(author, version, about = "Generate the rdFC pattern of a 5-minute EEG electrode triplet epoch and score it against the reference patterns", long_about = None)]
struct Cli {
    /// Text file with three whitespace-separated rows of samples
    #[arg(long)]
    input_file: PathBuf,

    /// Sampling rate in Hz
    #[arg(long)]
    sampling_rate: u32,

    /// Mains frequency to notch out: 50 or 60
    #[arg(long)]
    notch_frequency: u32,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Logging verbosity level
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable pattern and scores
    Text,
    /// Pretty-printed JSON
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("rdFC pattern generator v{}", env!("CARGO_PKG_VERSION"));

    let notch = NotchFrequency::try_from(cli.notch_frequency)?;
    let rows = epoch_file::load_rows(&cli.input_file)?;
    let epoch = Epoch::from_rows(cli.sampling_rate, rows)
        .with_context(|| format!("Invalid epoch in {}", cli.input_file.display()))?;

    let pipeline = RdfcPipeline::new(PipelineConfig::default());
    let analysis = pipeline.run(&epoch, notch)?;

    match cli.format {
        OutputFormat::Text => print!("{}", report::render_text(&analysis)),
        OutputFormat::Json => println!("{}", report::render_json(&analysis)?),
    }

    Ok(())
}
