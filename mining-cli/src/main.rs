//! Command-line entry point for the mining-disturbance detection pipeline.
//!
//! ```text
//! mining-tools detect --ndvi ndvi.tif --coal coal.tif --out-dir out/ --startyear 2005
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mining_common::config::get_configs;
use mining_core::pipeline::{detect, PipelineConfig};
use mining_core::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mining-tools", version, about = "Mining disturbance and vegetation recovery detection from NDVI time series")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log verbosity; overridden by RUST_LOG if set.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Command {
    /// Runs the detection pipeline over a multi-band NDVI stack and a coal
    /// probability raster, writing seven single-band GeoTIFFs.
    Detect {
        /// Multi-band NDVI GeoTIFF, one band per year.
        #[arg(long)]
        ndvi: PathBuf,

        /// Bare-coal probability GeoTIFF (resampled onto the NDVI grid if
        /// its shape differs).
        #[arg(long)]
        coal: PathBuf,

        /// Directory the seven output GeoTIFFs are written into.
        #[arg(long = "out-dir")]
        out_dir: PathBuf,

        /// Calendar year of the NDVI stack's first band. Overrides
        /// `settings.json` if present next to the executable.
        #[arg(long)]
        startyear: Option<i32>,

        /// Worker thread count; defaults to all available cores.
        #[arg(long)]
        worker_count: Option<usize>,

        /// Pixels per dispatch chunk. Overrides `settings.json`.
        #[arg(long)]
        chunk_size: Option<usize>,

        /// First disturbance-template amplitude factor. Overrides `settings.json`.
        #[arg(long)]
        p1: Option<f64>,

        /// Second disturbance-template amplitude factor. Overrides `settings.json`.
        #[arg(long)]
        p2: Option<f64>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Command::Detect { ndvi, coal, out_dir, startyear, worker_count, chunk_size, p1, p2 } => {
            let cwd = std::env::current_dir().unwrap_or_default();
            let saved = get_configs(&cwd).unwrap_or_default();

            let mut config = PipelineConfig::new(startyear.unwrap_or(saved.startyear));
            config.worker_count = worker_count.or_else(|| (saved.worker_count > 0).then_some(saved.worker_count));
            config.chunk_size = chunk_size.unwrap_or(saved.chunk_size);
            config.p1 = p1.unwrap_or(saved.p1);
            config.p2 = p2.unwrap_or(saved.p2);

            let cancellation = CancellationToken::new();
            match detect(&ndvi, &coal, &out_dir, &config, &cancellation) {
                Ok(outputs) => {
                    for (name, path) in outputs {
                        tracing::info!(layer = %name, path = %path.display(), "wrote output raster");
                    }
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    tracing::error!(error = %err, "detection pipeline failed");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
