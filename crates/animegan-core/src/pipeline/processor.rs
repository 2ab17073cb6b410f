//! Pipeline orchestration - wires together all per-image stages.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::style::StyleEngine;
use crate::types::ProcessedImage;

use super::decode::{format_to_string, ImageDecoder};
use super::encode::ImageEncoder;
use super::validate::Validator;

/// Processes one image at a time: validate, decode, stylize, encode, write.
pub struct ImageProcessor {
    decoder: ImageDecoder,
    encoder: ImageEncoder,
    validator: Validator,
    engine: StyleEngine,
}

impl ImageProcessor {
    /// Create a new image processor around a loaded style engine.
    pub fn new(config: &Config, engine: StyleEngine) -> Self {
        Self {
            decoder: ImageDecoder::new(config.limits.clone()),
            encoder: ImageEncoder::new(config.output.clone()),
            validator: Validator::new(config.limits.clone()),
            engine,
        }
    }

    /// Output location for `input`: same file name, inside `output_dir`.
    pub fn output_path(input: &Path, output_dir: &Path) -> PipelineResult<PathBuf> {
        input
            .file_name()
            .map(|name| output_dir.join(name))
            .ok_or_else(|| PipelineError::Write {
                path: input.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "input path has no file name",
                ),
            })
    }

    /// Stylize a single image and write it into `output_dir`.
    ///
    /// `output_dir` must already exist.
    pub async fn process(&self, path: &Path, output_dir: &Path) -> PipelineResult<ProcessedImage> {
        let start = Instant::now();
        tracing::debug!("Processing: {:?}", path);

        let output_path = Self::output_path(path, output_dir)?;

        // Validate
        self.validator.validate(path)?;
        tracing::trace!("  Validate: {:?}", start.elapsed());

        // Decode
        let decode_start = Instant::now();
        let decoded = self.decoder.decode(path).await?;
        tracing::trace!(
            "  Decode: {:?} ({}, {} bytes)",
            decode_start.elapsed(),
            format_to_string(decoded.format),
            decoded.file_size
        );

        // Forward transform, inference, inverse transform and encode on the
        // blocking pool. Awaited here, so images never overlap.
        let stylize_start = Instant::now();
        let engine = self.engine.clone();
        let encoder = self.encoder.clone();
        let input_path = path.to_path_buf();
        let encode_path = output_path.clone();
        let (stylized, bytes) = tokio::task::spawn_blocking(move || {
            let stylized = engine.stylize_image(&decoded.image, &input_path)?;
            let bytes = encoder.encode(&stylized.image, &encode_path)?;
            Ok::<_, PipelineError>((stylized, bytes))
        })
        .await
        .map_err(|e| PipelineError::Inference {
            path: path.to_path_buf(),
            message: format!("Task join error: {}", e),
        })??;
        tracing::trace!("  Stylize + encode: {:?}", stylize_start.elapsed());

        // Write
        tokio::fs::write(&output_path, bytes)
            .await
            .map_err(|source| PipelineError::Write {
                path: output_path.clone(),
                source,
            })?;

        let elapsed = start.elapsed();
        tracing::debug!(
            "Processed {:?} in {:?} ({} at {})",
            path,
            elapsed,
            stylized.dimensions,
            stylized.processing_dimensions
        );

        Ok(ProcessedImage {
            input_path: path.to_path_buf(),
            output_path,
            dimensions: stylized.dimensions,
            processing_dimensions: stylized.processing_dimensions,
            elapsed,
        })
    }
}
