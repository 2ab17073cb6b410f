//! AnimeGAN CLI - batch photo-to-anime stylization with AnimeGANv3.
//!
//! Every `.jpg`, `.jpeg` and `.png` under the input directory is run through
//! the selected generator and written to the output directory under its
//! original file name, at its original resolution.
//!
//! # Usage
//!
//! ```bash
//! # Stylize a directory with the default H40 model
//! animegan ./photos ./anime
//!
//! # Pick a model and keep a timing report
//! animegan ./photos ./anime --onnx-model-type H64 --report timings.jsonl --report-format jsonl
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use animegan_core::Config;
use clap::Parser;

mod cli;
mod logging;

use cli::process::{ProcessArgs, FATAL_EXIT_CODE};

/// AnimeGAN - turn photos into anime-style images.
#[derive(Parser, Debug)]
#[command(name = "animegan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json_logs: bool,

    /// Alternate configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(flatten)]
    process: ProcessArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config problems go through eprintln.
    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) if cli.config.is_some() => {
            eprintln!("Error: {e}");
            return ExitCode::from(FATAL_EXIT_CODE);
        }
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Config file: {:?}",
                Config::default_path()
            );
            Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("AnimeGAN v{}", animegan_core::VERSION);

    match cli::process::execute(cli.process, config).await {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(FATAL_EXIT_CODE)
        }
    }
}

/// Load an explicit config file, or the default one when none is given.
fn load_config(path: Option<&PathBuf>) -> Result<Config, animegan_core::ConfigError> {
    match path {
        Some(path) => {
            let path_str = path.to_string_lossy();
            let expanded = PathBuf::from(shellexpand::tilde(&path_str).into_owned());
            Config::load_from(&expanded)
        }
        None => Config::load(),
    }
}
