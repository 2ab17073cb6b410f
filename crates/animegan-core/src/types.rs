//! Core data types for the stylization pipeline.
//!
//! These types describe a single processed image and the aggregate result of
//! a batch run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Image resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.width, self.height)
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Record for one successfully stylized image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedImage {
    /// Source file
    pub input_path: PathBuf,

    /// Where the stylized image was written
    pub output_path: PathBuf,

    /// Resolution of the source (and of the output)
    pub dimensions: Dimensions,

    /// Resolution the network ran at
    pub processing_dimensions: Dimensions,

    /// Wall-clock time spent on this image, in seconds
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
}

/// An image the batch driver gave up on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedImage {
    pub path: PathBuf,
    pub message: String,
}

/// Aggregate outcome of a batch run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Images written, in processing order
    pub processed: Vec<ProcessedImage>,

    /// Images skipped after a per-image error
    pub failed: Vec<FailedImage>,

    /// Wall-clock time of the processing phase, in seconds
    #[serde(with = "duration_secs")]
    pub total_elapsed: Duration,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.processed.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }

    /// Mean per-image time over successfully processed images.
    ///
    /// Returns `None` when nothing succeeded.
    pub fn mean_elapsed(&self) -> Option<Duration> {
        if self.processed.is_empty() {
            return None;
        }
        let sum: Duration = self.processed.iter().map(|p| p.elapsed).sum();
        Some(sum / self.processed.len() as u32)
    }

    /// Successful images per second over the whole run.
    pub fn rate(&self) -> f64 {
        let secs = self.total_elapsed.as_secs_f64();
        if secs > 0.0 {
            self.succeeded() as f64 / secs
        } else {
            0.0
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processed(ms: u64) -> ProcessedImage {
        ProcessedImage {
            input_path: PathBuf::from("in/a.jpg"),
            output_path: PathBuf::from("out/a.jpg"),
            dimensions: Dimensions::new(100, 150),
            processing_dimensions: Dimensions::new(256, 256),
            elapsed: Duration::from_millis(ms),
        }
    }

    #[test]
    fn test_mean_elapsed_empty() {
        assert!(BatchSummary::default().mean_elapsed().is_none());
    }

    #[test]
    fn test_mean_elapsed_ignores_failures() {
        let summary = BatchSummary {
            processed: vec![processed(100), processed(300)],
            failed: vec![FailedImage {
                path: PathBuf::from("in/bad.png"),
                message: "corrupt".to_string(),
            }],
            total_elapsed: Duration::from_secs(1),
        };
        assert_eq!(summary.mean_elapsed(), Some(Duration::from_millis(200)));
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.failed_count(), 1);
    }

    #[test]
    fn test_dimensions_display() {
        assert_eq!(Dimensions::new(800, 600).to_string(), "800×600");
    }

    #[test]
    fn test_elapsed_serializes_as_seconds() {
        let json = serde_json::to_value(processed(1500)).unwrap();
        assert_eq!(json["elapsed"], serde_json::json!(1.5));
        assert_eq!(json["dimensions"]["width"], serde_json::json!(100));
    }
}
