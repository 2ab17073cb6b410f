//! Stylizing a directory of images.

mod batch;
mod setup;
pub mod types;

pub use types::{OnnxModelType, ReportFormatArg, ResizeFilterArg, RunStatus, FATAL_EXIT_CODE};

use animegan_core::pipeline::FileDiscovery;
use animegan_core::{BatchDriver, Config, PipelineError};
use clap::Args;
use std::path::PathBuf;

use batch::process_batch;
use setup::{apply_overrides, setup_processor};

/// Arguments for stylizing a directory.
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Image directory path of input source
    #[arg(value_name = "InputDirPath")]
    pub input: PathBuf,

    /// Image directory path of output destination (created if missing)
    #[arg(value_name = "OutputDirPath")]
    pub output: PathBuf,

    /// ONNX model type [default: config `model.variant`, H40]
    #[arg(long, value_enum, ignore_case = true)]
    pub onnx_model_type: Option<OnnxModelType>,

    /// Directory holding the animeganv3_*_model.onnx files
    #[arg(long, env = "ANIMEGAN_MODEL_DIR")]
    pub model_dir: Option<PathBuf>,

    /// Resampling filter for resizes [default: triangle]
    #[arg(long, value_enum)]
    pub resize_filter: Option<ResizeFilterArg>,

    /// JPEG output quality, 1-100 [default: 95]
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub jpeg_quality: Option<u8>,

    /// Stop at the first image that fails instead of skipping it
    #[arg(long)]
    pub fail_fast: bool,

    /// Write a per-image timing report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value = "json")]
    pub report_format: ReportFormatArg,
}

/// Processing context assembled by setup_processor().
pub(crate) struct ProcessContext {
    pub driver: BatchDriver,
    pub config: Config,
}

/// Execute a stylization run.
///
/// Setup failures are returned as errors; everything else is reported
/// through the returned [`RunStatus`].
pub async fn execute(args: ProcessArgs, config: Config) -> anyhow::Result<RunStatus> {
    let config = apply_overrides(config, &args)?;

    let files = match BatchDriver::discover(&config.processing, &args.input) {
        Ok(files) => files,
        Err(e @ PipelineError::NoImages { .. }) => {
            if args.input.is_file() {
                tracing::warn!("Input path is a file, not a directory: {:?}", args.input);
            } else if !args.input.is_dir() {
                tracing::warn!("Input directory does not exist: {:?}", args.input);
            }
            eprintln!("Error: {e}");
            return Ok(RunStatus::NoImages);
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(
        "Found {} image(s) to process ({:.1} MB)",
        files.len(),
        FileDiscovery::total_size(&files) as f64 / 1_000_000.0
    );

    let ctx = setup_processor(config)?;
    process_batch(ctx, &args, files).await
}
