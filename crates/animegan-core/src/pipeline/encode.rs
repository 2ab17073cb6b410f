//! Output encoding, with the format chosen from the output file extension.

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};
use std::io::Cursor;
use std::path::Path;

use crate::config::OutputConfig;
use crate::error::PipelineError;

/// Encodes stylized images by output file extension.
#[derive(Clone)]
pub struct ImageEncoder {
    config: OutputConfig,
}

impl ImageEncoder {
    /// Create a new encoder with the given output settings.
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Encode an image into the format implied by `path`'s extension.
    pub fn encode(&self, image: &RgbImage, path: &Path) -> Result<Vec<u8>, PipelineError> {
        let format = ImageFormat::from_path(path).map_err(|_| PipelineError::UnsupportedFormat {
            path: path.to_path_buf(),
            format: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
                .to_string(),
        })?;

        let encode_err = |e: image::ImageError| PipelineError::Encode {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let mut buffer = Cursor::new(Vec::new());
        match format {
            ImageFormat::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(&mut buffer, self.config.jpeg_quality);
                image.write_with_encoder(encoder).map_err(encode_err)?;
            }
            other => image.write_to(&mut buffer, other).map_err(encode_err)?,
        }
        Ok(buffer.into_inner())
    }
}
