//! AnimeGAN Core - batch photo-to-anime stylization library.
//!
//! Takes ordinary photos and produces anime-style counterparts with a
//! pre-trained AnimeGANv3 generator running locally via ONNX Runtime.
//!
//! # Architecture
//!
//! Each image is handled independently, one at a time:
//!
//! ```text
//! Discover → Validate → Decode → Forward → Generator (ONNX) → Inverse → Encode → Write
//! ```
//!
//! The forward transform resizes to a 32-aligned resolution (at least 256 on
//! each edge) and rescales samples to [-1, 1]; the inverse transform undoes
//! both, so every output has exactly the resolution of its input.
//!
//! # Usage
//!
//! ```rust,ignore
//! use animegan_core::{BatchDriver, Config, FailurePolicy, ImageProcessor, StyleEngine};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let files = BatchDriver::discover(&config.processing, "./photos".as_ref())?;
//!     let engine = StyleEngine::load(&config)?;
//!     let driver = BatchDriver::new(ImageProcessor::new(&config, engine), FailurePolicy::Skip);
//!
//!     let outcome = driver.run(&files, "./anime".as_ref(), |_| {}).await?;
//!     println!("Average: {:?}", outcome.summary.mean_elapsed());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod report;
pub mod style;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, PipelineError, PipelineResult};
pub use pipeline::{
    BatchDriver, BatchEvent, BatchOutcome, DiscoveredFile, FailurePolicy, ImageProcessor,
};
pub use report::{ReportFormat, ReportWriter};
pub use style::{ModelVariant, StyleEngine, StyleModel};
pub use types::{BatchSummary, Dimensions, FailedImage, ProcessedImage};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
