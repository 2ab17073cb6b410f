//! Image decoding with format detection and dimension limits.

use image::metadata::Orientation;
use image::{DynamicImage, GenericImageView, ImageDecoder as _, ImageFormat};
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::PipelineError;
use crate::types::Dimensions;

/// Image decoder with configurable limits.
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// Result of decoding an image.
pub struct DecodedImage {
    /// The decoded image data
    pub image: DynamicImage,
    /// Detected image format
    pub format: ImageFormat,
    /// Original resolution
    pub dimensions: Dimensions,
    /// Original file size in bytes
    pub file_size: u64,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Read and decode an image file.
    pub async fn decode(&self, path: &Path) -> Result<DecodedImage, PipelineError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot read file: {}", e),
            })?;
        self.decode_from_bytes(bytes, path).await
    }

    /// Decode an image from an in-memory byte buffer.
    ///
    /// The decode itself runs on the blocking pool.
    pub async fn decode_from_bytes(
        &self,
        bytes: Vec<u8>,
        path: &Path,
    ) -> Result<DecodedImage, PipelineError> {
        let path_owned = path.to_path_buf();
        let decoded =
            tokio::task::spawn_blocking(move || Self::decode_bytes_sync(bytes, &path_owned))
                .await
                .map_err(|e| PipelineError::Decode {
                    path: path.to_path_buf(),
                    message: format!("Task join error: {}", e),
                })??;

        self.check_dimensions(&decoded, path)?;
        Ok(decoded)
    }

    fn check_dimensions(&self, decoded: &DecodedImage, path: &Path) -> Result<(), PipelineError> {
        let Dimensions { width, height } = decoded.dimensions;
        let max_dim = self.limits.max_image_dimension;
        if width > max_dim || height > max_dim {
            return Err(PipelineError::ImageTooLarge {
                path: path.to_path_buf(),
                width,
                height,
                max_dim,
            });
        }
        if width == 0 || height == 0 {
            return Err(PipelineError::Decode {
                path: path.to_path_buf(),
                message: "Image has zero width or height".to_string(),
            });
        }
        Ok(())
    }

    /// Synchronous decode from bytes (runs in spawn_blocking).
    pub(crate) fn decode_bytes_sync(
        bytes: Vec<u8>,
        path: &Path,
    ) -> Result<DecodedImage, PipelineError> {
        use std::io::Cursor;

        let file_size = bytes.len() as u64;
        let cursor = Cursor::new(bytes);
        let reader = image::ImageReader::new(cursor)
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {}", e),
            })?;
        let format = match reader.format() {
            Some(f) => f,
            None => ImageFormat::from_path(path).map_err(|_| PipelineError::UnsupportedFormat {
                path: path.to_path_buf(),
                format: path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("unknown")
                    .to_string(),
            })?,
        };
        let decode_err = |e: image::ImageError| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        let mut decoder = reader.into_decoder().map_err(decode_err)?;
        let orientation = decoder.orientation().unwrap_or_else(|e| {
            tracing::debug!("Ignoring unreadable EXIF orientation in {:?}: {}", path, e);
            Orientation::NoTransforms
        });
        let mut image = DynamicImage::from_decoder(decoder).map_err(decode_err)?;

        // Dimensions are taken after this, so outputs come out upright.
        image.apply_orientation(orientation);

        Ok(DecodedImage {
            dimensions: Dimensions::from(image.dimensions()),
            image,
            format,
            file_size,
        })
    }
}

/// Convert an ImageFormat to a string representation.
pub fn format_to_string(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "jpeg".to_string(),
        ImageFormat::Png => "png".to_string(),
        _ => "unknown".to_string(),
    }
}

/// Baseline JPEG with a big-endian EXIF APP1 segment carrying only the
/// Orientation tag.
#[cfg(test)]
pub(crate) fn jpeg_with_orientation(width: u32, height: u32, orientation: u16) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, _| image::Rgb([(x % 256) as u8, 64, 128]));
    let mut jpeg = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut jpeg), ImageFormat::Jpeg)
        .unwrap();

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&[b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08]);
    payload.extend_from_slice(&[0x00, 0x01]);
    payload.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
    payload.extend_from_slice(&orientation.to_be_bytes());
    payload.extend_from_slice(&[0x00, 0x00]);
    payload.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

    let mut segment = vec![0xFF, 0xE1];
    segment.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    segment.extend_from_slice(&payload);

    // Right after SOI.
    let rest = jpeg.split_off(2);
    jpeg.extend(segment);
    jpeg.extend(rest);
    jpeg
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::new_rgb8(width, height)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_format_to_string() {
        assert_eq!(format_to_string(ImageFormat::Jpeg), "jpeg");
        assert_eq!(format_to_string(ImageFormat::Png), "png");
        assert_eq!(format_to_string(ImageFormat::Gif), "unknown");
    }

    #[test]
    fn test_format_detected_by_content() {
        // PNG bytes under a .jpg name are still decoded as PNG
        let result =
            ImageDecoder::decode_bytes_sync(png_bytes(12, 7), Path::new("misnamed.jpg")).unwrap();
        assert_eq!(result.format, ImageFormat::Png);
        assert_eq!(result.dimensions, Dimensions::new(12, 7));
    }

    #[test]
    fn test_exif_orientation_is_applied() {
        let bytes = jpeg_with_orientation(300, 200, 6);
        let result = ImageDecoder::decode_bytes_sync(bytes, Path::new("phone.jpg")).unwrap();
        assert_eq!(result.format, ImageFormat::Jpeg);
        assert_eq!(result.dimensions, Dimensions::new(200, 300));
        assert_eq!(result.image.dimensions(), (200, 300));
    }

    #[test]
    fn test_exif_orientation_normal_keeps_size() {
        let bytes = jpeg_with_orientation(300, 200, 1);
        let result = ImageDecoder::decode_bytes_sync(bytes, Path::new("upright.jpg")).unwrap();
        assert_eq!(result.dimensions, Dimensions::new(300, 200));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = ImageDecoder::decode_bytes_sync(
            vec![0x89, b'P', b'N', b'G', 0, 0, 0, 0],
            Path::new("broken.png"),
        )
        .err()
        .unwrap();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_decode_rejects_oversized() {
        let decoder = ImageDecoder::new(LimitsConfig {
            max_file_size_mb: 100,
            max_image_dimension: 10,
        });
        let err = decoder
            .decode_from_bytes(png_bytes(20, 5), Path::new("wide.png"))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, PipelineError::ImageTooLarge { width: 20, .. }));
    }

    #[tokio::test]
    async fn test_decode_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.png");
        std::fs::write(&path, png_bytes(3, 4)).unwrap();

        let decoded = ImageDecoder::new(LimitsConfig::default())
            .decode(&path)
            .await
            .unwrap();
        assert_eq!(decoded.dimensions, Dimensions::new(3, 4));
        assert!(decoded.file_size > 0);
    }
}
