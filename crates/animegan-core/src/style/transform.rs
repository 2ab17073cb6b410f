//! Tensor conversion around the AnimeGANv3 generator.
//!
//! The generator was trained on:
//! - Input size: both edges multiples of 32, at least 256 (see [`crate::geometry`])
//! - Normalization: pixels scaled to [-1, 1] via `v / 127.5 - 1`
//! - Channel order: RGB
//! - Tensor layout: NHWC [batch, height, width, channels]

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbImage};
use ndarray::Array4;

use crate::error::{PipelineError, PipelineResult};
use crate::geometry::normalized_dimensions;
use crate::types::Dimensions;

/// Number of color channels (RGB).
pub const CHANNELS: usize = 3;

/// Half of the 8-bit sample range.
const HALF_RANGE: f32 = 127.5;

/// Map an 8-bit sample into the model's [-1, 1] input range.
#[inline]
pub fn to_unit(v: u8) -> f32 {
    f32::from(v) / HALF_RANGE - 1.0
}

/// Map a model output sample back to 8 bits, clamping out-of-range values.
#[inline]
pub fn from_unit(y: f32) -> u8 {
    ((y + 1.0) / 2.0 * 255.0).clamp(0.0, 255.0).round() as u8
}

/// Convert a decoded image into the generator's input tensor.
///
/// Returns the `[1, H', W', 3]` tensor together with the original
/// resolution, which must be handed unchanged to [`inverse`].
pub fn forward(image: &DynamicImage, filter: FilterType) -> (Array4<f32>, Dimensions) {
    let original = Dimensions::from(image.dimensions());
    let target = normalized_dimensions(original);

    let rgb = if target == original {
        image.to_rgb8()
    } else {
        image
            .resize_exact(target.width, target.height, filter)
            .to_rgb8()
    };

    let (w, h) = (target.width as usize, target.height as usize);
    let mut tensor = Array4::<f32>::zeros((1, h, w, CHANNELS));

    // A fresh Array4 is in standard (row-major) layout, which is exactly the
    // interleaved RGB order of the raw buffer.
    for (dst, &src) in tensor.iter_mut().zip(rgb.as_raw().iter()) {
        *dst = to_unit(src);
    }

    (tensor, original)
}

/// Convert a generator output tensor into an RGB image at `original` size.
pub fn inverse(
    output: &Array4<f32>,
    original: Dimensions,
    filter: FilterType,
    path: &Path,
) -> PipelineResult<RgbImage> {
    let shape = output.shape();
    if shape[0] != 1 || shape[3] != CHANNELS || shape[1] == 0 || shape[2] == 0 {
        return Err(PipelineError::Transform {
            path: path.to_path_buf(),
            message: format!("Unexpected model output shape: {:?}", shape),
        });
    }
    let (h, w) = (shape[1] as u32, shape[2] as u32);

    let raw: Vec<u8> = output.iter().copied().map(from_unit).collect();
    let squeezed = RgbImage::from_raw(w, h, raw).ok_or_else(|| PipelineError::Transform {
        path: path.to_path_buf(),
        message: format!("Output buffer does not fit {w}x{h} RGB"),
    })?;

    if (w, h) == (original.width, original.height) {
        return Ok(squeezed);
    }
    Ok(imageops::resize(
        &squeezed,
        original.width,
        original.height,
        filter,
    ))
}
