//! CLI enum types for the process command: model type, resize filter,
//! report format, and the run status that becomes the exit code.

use animegan_core::config::ResizeFilter;
use animegan_core::{ModelVariant, ReportFormat};
use clap::ValueEnum;

/// Pre-trained AnimeGANv3 checkpoint to load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OnnxModelType {
    #[value(name = "H40")]
    H40,
    #[value(name = "H50")]
    H50,
    #[value(name = "H64")]
    H64,
}

impl From<OnnxModelType> for ModelVariant {
    fn from(value: OnnxModelType) -> Self {
        match value {
            OnnxModelType::H40 => ModelVariant::H40,
            OnnxModelType::H50 => ModelVariant::H50,
            OnnxModelType::H64 => ModelVariant::H64,
        }
    }
}

/// Resampling kernel for the processing and restoring resizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ResizeFilterArg {
    /// Nearest neighbour
    Nearest,
    /// Bilinear (default)
    Triangle,
    /// Bicubic
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilterArg> for ResizeFilter {
    fn from(value: ResizeFilterArg) -> Self {
        match value {
            ResizeFilterArg::Nearest => ResizeFilter::Nearest,
            ResizeFilterArg::Triangle => ResizeFilter::Triangle,
            ResizeFilterArg::CatmullRom => ResizeFilter::CatmullRom,
            ResizeFilterArg::Gaussian => ResizeFilter::Gaussian,
            ResizeFilterArg::Lanczos3 => ResizeFilter::Lanczos3,
        }
    }
}

/// Supported report formats.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ReportFormatArg {
    /// Full batch summary as one JSON object
    #[default]
    Json,
    /// One JSON object per processed image
    Jsonl,
}

impl From<ReportFormatArg> for ReportFormat {
    fn from(value: ReportFormatArg) -> Self {
        match value {
            ReportFormatArg::Json => ReportFormat::Json,
            ReportFormatArg::Jsonl => ReportFormat::JsonLines,
        }
    }
}

/// How a run ended, from the caller's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// Every discovered image was written
    Completed,
    /// Nothing eligible in the input directory
    NoImages,
    /// Fail-fast stopped the batch
    Aborted,
    /// The batch finished but some images failed
    PartialFailure,
}

impl RunStatus {
    /// Process exit status for this outcome.
    pub fn exit_code(self) -> u8 {
        match self {
            RunStatus::Completed => 0,
            RunStatus::NoImages => 1,
            RunStatus::Aborted => 2,
            RunStatus::PartialFailure => 3,
        }
    }
}

/// Exit status for fatal setup errors (config, model load, output directory).
pub const FATAL_EXIT_CODE: u8 = 2;
