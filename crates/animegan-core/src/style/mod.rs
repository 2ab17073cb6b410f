//! AnimeGANv3 stylization.
//!
//! This module turns a decoded photo into its anime-style counterpart:
//! forward transform, generator inference, inverse transform.
//!
//! # Usage
//!
//! ```rust,ignore
//! use animegan_core::style::{ModelVariant, StyleEngine};
//! use animegan_core::Config;
//!
//! let config = Config::default();
//! let engine = StyleEngine::load(&config)?;
//! let stylized = engine.stylize_image(&decoded_image, path)?;
//! // stylized.image has the same resolution as decoded_image
//! ```

pub mod session;
pub mod transform;
mod variant;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use ndarray::Array4;

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::geometry::normalized_dimensions;
use crate::types::Dimensions;

pub use self::session::OnnxStyleSession;
pub use self::variant::ModelVariant;

/// An image-to-image generator with a fixed tensor interface.
///
/// Implementations take a `[1, H, W, 3]` tensor in `[-1, 1]` and return a
/// tensor of the same layout. They must be deterministic and free of
/// per-call side effects so one instance can serve a whole batch.
pub trait StyleModel: Send + Sync {
    /// Run the generator on one normalized tensor.
    fn stylize(&self, input: &Array4<f32>, path: &Path) -> PipelineResult<Array4<f32>>;

    /// Short human-readable identifier for logs.
    fn describe(&self) -> String;
}

/// Result of stylizing one image.
pub struct StylizedImage {
    /// Output pixels at the original resolution
    pub image: RgbImage,
    /// Original resolution
    pub dimensions: Dimensions,
    /// Resolution the generator ran at
    pub processing_dimensions: Dimensions,
}

/// Engine that owns the loaded model and the resampling policy.
///
/// Cloning is cheap; clones share the same model.
#[derive(Clone)]
pub struct StyleEngine {
    model: Arc<dyn StyleModel>,
    filter: FilterType,
}

impl StyleEngine {
    /// Load the configured variant from the model directory.
    ///
    /// Expects the ONNX model at `{model_dir}/animeganv3_{variant}_model.onnx`.
    pub fn load(config: &Config) -> PipelineResult<Self> {
        let model_path = Self::model_path(config.model.variant, &config.model_dir());

        if !model_path.exists() {
            return Err(PipelineError::ModelNotFound(model_path));
        }

        tracing::info!("Loading ONNX runtime model from {:?}", model_path);
        let session = OnnxStyleSession::load(&model_path)?;
        tracing::info!("Loaded ONNX runtime model ({})", config.model.variant);

        Ok(Self::with_model(
            Arc::new(session),
            config.processing.resize_filter.filter_type(),
        ))
    }

    /// Build an engine around an already-loaded model.
    pub fn with_model(model: Arc<dyn StyleModel>, filter: FilterType) -> Self {
        Self { model, filter }
    }

    /// Get the expected model file path.
    pub fn model_path(variant: ModelVariant, model_dir: &Path) -> PathBuf {
        model_dir.join(variant.file_name())
    }

    pub fn model(&self) -> &dyn StyleModel {
        self.model.as_ref()
    }

    /// Forward transform, inference and inverse transform for one image.
    pub fn stylize_image(&self, image: &DynamicImage, path: &Path) -> PipelineResult<StylizedImage> {
        let (tensor, dimensions) = transform::forward(image, self.filter);
        let processing_dimensions = normalized_dimensions(dimensions);
        tracing::trace!(
            "  Tensor {:?} for {:?} ({})",
            tensor.shape(),
            path,
            dimensions
        );

        let output = self.model.stylize(&tensor, path)?;
        let image = transform::inverse(&output, dimensions, self.filter, path)?;

        Ok(StylizedImage {
            image,
            dimensions,
            processing_dimensions,
        })
    }
}
