//! Batch driver: runs every discovered file through the processor in order.
//!
//! A run moves through `Discovering -> LoadingModel -> Processing -> Done`.
//! [`BatchDriver::discover`] covers the first step and fails with
//! [`PipelineError::NoImages`] when nothing is eligible; the caller then loads
//! the model into an [`ImageProcessor`] and hands it to [`BatchDriver::run`].
//! There is no resumable state: a rerun starts from discovery and overwrites
//! earlier outputs.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::ProcessingConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::types::{BatchSummary, FailedImage, ProcessedImage};

use super::discovery::{DiscoveredFile, FileDiscovery};
use super::processor::ImageProcessor;

/// What to do when a single image fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Log, record and move on to the next file
    #[default]
    Skip,
    /// Stop the batch at the first failure
    Abort,
}

impl FailurePolicy {
    pub fn from_fail_fast(fail_fast: bool) -> Self {
        if fail_fast {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Skip
        }
    }
}

/// Progress notifications emitted while a batch runs.
#[derive(Debug)]
pub enum BatchEvent<'a> {
    /// Processing is about to start
    Started { total: usize },
    /// One image was written
    Processed(&'a ProcessedImage),
    /// One image failed
    Failed(&'a FailedImage),
}

/// Outcome of [`BatchDriver::run`].
#[derive(Debug)]
pub struct BatchOutcome {
    pub summary: BatchSummary,
    /// Set when the failure policy stopped the batch early
    pub aborted: bool,
}

/// Drives a batch of images through an [`ImageProcessor`], strictly one
/// image at a time in discovery order.
pub struct BatchDriver {
    processor: ImageProcessor,
    policy: FailurePolicy,
}

impl BatchDriver {
    pub fn new(processor: ImageProcessor, policy: FailurePolicy) -> Self {
        Self { processor, policy }
    }

    /// Find eligible images under `input`.
    ///
    /// Returns [`PipelineError::NoImages`] when the result would be empty.
    pub fn discover(
        config: &ProcessingConfig,
        input: &Path,
    ) -> PipelineResult<Vec<DiscoveredFile>> {
        let discovery = FileDiscovery::new(config.clone());
        let files = discovery.discover(input);
        if files.is_empty() {
            return Err(PipelineError::NoImages {
                path: input.to_path_buf(),
                formats: discovery.formats_label(),
            });
        }
        Ok(files)
    }

    /// Create `output_dir` and stylize every file into it.
    ///
    /// Per-image errors are handled according to the failure policy and
    /// never affect images that already completed. Only failing to create
    /// the output directory is returned as an error.
    pub async fn run<F>(
        &self,
        files: &[DiscoveredFile],
        output_dir: &Path,
        mut on_event: F,
    ) -> PipelineResult<BatchOutcome>
    where
        F: FnMut(BatchEvent<'_>),
    {
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|source| PipelineError::Write {
                path: output_dir.to_path_buf(),
                source,
            })?;

        warn_on_name_collisions(files);

        on_event(BatchEvent::Started { total: files.len() });

        let mut summary = BatchSummary::default();
        let mut aborted = false;
        let start = Instant::now();

        for file in files {
            match self.processor.process(&file.path, output_dir).await {
                Ok(result) => {
                    on_event(BatchEvent::Processed(&result));
                    summary.processed.push(result);
                }
                Err(e) => {
                    tracing::error!("Failed: {:?} - {}", file.path, e);
                    let failed = FailedImage {
                        path: file.path.clone(),
                        message: e.to_string(),
                    };
                    on_event(BatchEvent::Failed(&failed));
                    summary.failed.push(failed);

                    if self.policy == FailurePolicy::Abort {
                        aborted = true;
                        break;
                    }
                }
            }
        }

        summary.total_elapsed = start.elapsed();
        Ok(BatchOutcome { summary, aborted })
    }
}

/// Files from different subdirectories can share a base name; the later one
/// overwrites the earlier output.
fn warn_on_name_collisions(files: &[DiscoveredFile]) {
    let mut seen: HashMap<OsString, &PathBuf> = HashMap::new();
    for file in files {
        let Some(name) = file.file_name() else {
            continue;
        };
        if let Some(first) = seen.insert(name.to_os_string(), &file.path) {
            tracing::warn!(
                "{:?} and {:?} share an output name; the later one overwrites the earlier",
                first,
                file.path
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::style::testing::{engine, FailingModel, IdentityModel};
    use crate::style::StyleModel;
    use crate::types::Dimensions;
    use image::{DynamicImage, GenericImageView, ImageFormat};

    fn write_image(path: &Path, width: u32, height: u32, format: ImageFormat) {
        DynamicImage::new_rgb8(width, height)
            .save_with_format(path, format)
            .unwrap();
    }

    fn driver(model: impl StyleModel + 'static, policy: FailurePolicy) -> BatchDriver {
        let processor = ImageProcessor::new(&Config::default(), engine(model));
        BatchDriver::new(processor, policy)
    }

    #[test]
    fn test_discover_empty_dir_is_no_images() {
        let dir = tempfile::tempdir().unwrap();
        let err = BatchDriver::discover(&ProcessingConfig::default(), dir.path()).unwrap_err();
        assert!(matches!(err, PipelineError::NoImages { .. }));
    }

    #[test]
    fn test_discover_only_disallowed_is_no_images() {
        let dir = tempfile::tempdir().unwrap();
        write_image(&dir.path().join("a.bmp"), 8, 8, ImageFormat::Bmp);
        let err = BatchDriver::discover(&ProcessingConfig::default(), dir.path()).unwrap_err();
        assert!(matches!(err, PipelineError::NoImages { .. }));
    }

    #[test]
    fn test_discover_file_input_is_no_images() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("one.jpg");
        write_image(&file, 8, 8, ImageFormat::Jpeg);

        let err = BatchDriver::discover(&ProcessingConfig::default(), &file).unwrap_err();
        assert!(matches!(err, PipelineError::NoImages { .. }));
    }

    #[tokio::test]
    async fn test_run_end_to_end_restores_resolutions() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        std::fs::create_dir_all(input.join("nested")).unwrap();
        write_image(&input.join("portrait.jpg"), 100, 150, ImageFormat::Jpeg);
        write_image(&input.join("nested/land.png"), 800, 600, ImageFormat::Png);
        let output = dir.path().join("out/deeper");

        let files = BatchDriver::discover(&ProcessingConfig::default(), &input).unwrap();
        let mut events = Vec::new();
        let outcome = driver(IdentityModel::default(), FailurePolicy::Skip)
            .run(&files, &output, |e| {
                events.push(match e {
                    BatchEvent::Started { total } => format!("start {total}"),
                    BatchEvent::Processed(p) => format!("ok {}", p.dimensions),
                    BatchEvent::Failed(f) => format!("fail {:?}", f.path),
                })
            })
            .await
            .unwrap();

        assert!(!outcome.aborted);
        assert_eq!(outcome.summary.succeeded(), 2);
        assert_eq!(events, vec!["start 2", "ok 800×600", "ok 100×150"]);

        let land = image::open(output.join("land.png")).unwrap();
        assert_eq!(land.dimensions(), (800, 600));
        let portrait = image::open(output.join("portrait.jpg")).unwrap();
        assert_eq!(portrait.dimensions(), (100, 150));

        let dims: Vec<Dimensions> = outcome
            .summary
            .processed
            .iter()
            .map(|p| p.processing_dimensions)
            .collect();
        assert_eq!(dims, vec![Dimensions::new(800, 576), Dimensions::new(256, 256)]);
        assert!(outcome.summary.mean_elapsed().is_some());
    }

    #[tokio::test]
    async fn test_run_skips_failed_image() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.png", "bad.png", "c.png"] {
            write_image(&dir.path().join(name), 32, 32, ImageFormat::Png);
        }
        let out = dir.path().join("out");

        let files = BatchDriver::discover(&ProcessingConfig::default(), dir.path()).unwrap();
        let outcome = driver(FailingModel { needle: "bad" }, FailurePolicy::Skip)
            .run(&files, &out, |_| {})
            .await
            .unwrap();

        assert!(!outcome.aborted);
        assert_eq!(outcome.summary.succeeded(), 2);
        assert_eq!(outcome.summary.failed_count(), 1);
        assert!(out.join("a.png").exists());
        assert!(!out.join("bad.png").exists());
        assert!(out.join("c.png").exists());
    }

    #[tokio::test]
    async fn test_run_skips_truncated_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        write_image(&dir.path().join("a.png"), 32, 32, ImageFormat::Png);
        write_image(&dir.path().join("c.jpg"), 32, 32, ImageFormat::Jpeg);
        let mut jpeg = Vec::new();
        DynamicImage::new_rgb8(64, 64)
            .write_to(&mut std::io::Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .unwrap();
        // Keep the SOI marker, cut off before the frame header.
        jpeg.truncate(20);
        std::fs::write(dir.path().join("b.jpg"), &jpeg).unwrap();
        let out = dir.path().join("out");

        let files = BatchDriver::discover(&ProcessingConfig::default(), dir.path()).unwrap();
        let outcome = driver(IdentityModel::default(), FailurePolicy::Skip)
            .run(&files, &out, |_| {})
            .await
            .unwrap();

        assert!(!outcome.aborted);
        assert_eq!(outcome.summary.succeeded(), 2);
        assert_eq!(outcome.summary.failed_count(), 1);
        assert_eq!(outcome.summary.failed[0].path, dir.path().join("b.jpg"));
        assert!(out.join("a.png").exists());
        assert!(!out.join("b.jpg").exists());
        assert!(out.join("c.jpg").exists());
    }

    #[tokio::test]
    async fn test_run_aborts_on_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.png", "bad.png", "c.png"] {
            write_image(&dir.path().join(name), 32, 32, ImageFormat::Png);
        }
        let out = dir.path().join("out");

        let files = BatchDriver::discover(&ProcessingConfig::default(), dir.path()).unwrap();
        let outcome = driver(FailingModel { needle: "bad" }, FailurePolicy::Abort)
            .run(&files, &out, |_| {})
            .await
            .unwrap();

        assert!(outcome.aborted);
        assert_eq!(outcome.summary.succeeded(), 1);
        assert_eq!(outcome.summary.failed_count(), 1);
        assert!(!out.join("c.png").exists());
    }

    #[tokio::test]
    async fn test_run_calls_model_once_per_image() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["1.png", "2.jpg", "3.jpeg"] {
            let format = ImageFormat::from_path(name).unwrap();
            write_image(&dir.path().join(name), 16, 16, format);
        }

        let model = std::sync::Arc::new(IdentityModel::default());
        let processor = ImageProcessor::new(
            &Config::default(),
            crate::style::StyleEngine::with_model(
                model.clone(),
                image::imageops::FilterType::Triangle,
            ),
        );
        let files = BatchDriver::discover(&ProcessingConfig::default(), dir.path()).unwrap();
        BatchDriver::new(processor, FailurePolicy::Skip)
            .run(&files, &dir.path().join("out"), |_| {})
            .await
            .unwrap();

        assert_eq!(model.calls.load(std::sync::atomic::Ordering::SeqCst), 3);
    }

    #[test]
    fn test_failure_policy_from_flag() {
        assert_eq!(FailurePolicy::from_fail_fast(true), FailurePolicy::Abort);
        assert_eq!(FailurePolicy::from_fail_fast(false), FailurePolicy::Skip);
    }
}
