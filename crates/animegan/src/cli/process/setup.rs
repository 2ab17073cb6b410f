//! Processor setup: CLI overrides on top of config, then model loading.

use animegan_core::{BatchDriver, Config, FailurePolicy, ImageProcessor, StyleEngine};

use super::{ProcessArgs, ProcessContext};

/// Layer command-line flags over the loaded configuration.
///
/// Flags left unset keep the configured value.
pub fn apply_overrides(mut config: Config, args: &ProcessArgs) -> anyhow::Result<Config> {
    if let Some(model_type) = args.onnx_model_type {
        config.model.variant = model_type.into();
    }
    if let Some(dir) = &args.model_dir {
        config.general.model_dir = Some(dir.clone());
    }
    if let Some(filter) = args.resize_filter {
        config.processing.resize_filter = filter.into();
    }
    if let Some(quality) = args.jpeg_quality {
        config.output.jpeg_quality = quality;
    }
    if args.fail_fast {
        config.processing.fail_fast = true;
    }

    config.validate()?;
    Ok(config)
}

/// Load the generator and assemble the batch driver.
pub(crate) fn setup_processor(config: Config) -> anyhow::Result<ProcessContext> {
    let engine = StyleEngine::load(&config).map_err(|e| {
        anyhow::anyhow!(
            "{e}\n\n  Hint: Place animeganv3_{{H40,H50,H64}}_model.onnx in {:?} \
             or pass --model-dir.",
            config.model_dir()
        )
    })?;
    tracing::debug!("Style model: {}", engine.model().describe());

    let processor = ImageProcessor::new(&config, engine);
    let policy = FailurePolicy::from_fail_fast(config.processing.fail_fast);

    Ok(ProcessContext {
        driver: BatchDriver::new(processor, policy),
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::process::{OnnxModelType, ReportFormatArg, ResizeFilterArg};
    use animegan_core::config::ResizeFilter;
    use animegan_core::ModelVariant;
    use std::path::PathBuf;

    fn args() -> ProcessArgs {
        ProcessArgs {
            input: PathBuf::from("in"),
            output: PathBuf::from("out"),
            onnx_model_type: None,
            model_dir: None,
            resize_filter: None,
            jpeg_quality: None,
            fail_fast: false,
            report: None,
            report_format: ReportFormatArg::Json,
        }
    }

    #[test]
    fn overrides_keep_config_when_unset() {
        let mut config = Config::default();
        config.model.variant = ModelVariant::H50;
        config.output.jpeg_quality = 80;

        let config = apply_overrides(config, &args()).unwrap();
        assert_eq!(config.model.variant, ModelVariant::H50);
        assert_eq!(config.output.jpeg_quality, 80);
        assert!(!config.processing.fail_fast);
    }

    #[test]
    fn overrides_replace_config_values() {
        let args = ProcessArgs {
            onnx_model_type: Some(OnnxModelType::H64),
            model_dir: Some(PathBuf::from("/models")),
            resize_filter: Some(ResizeFilterArg::Lanczos3),
            jpeg_quality: Some(70),
            fail_fast: true,
            ..args()
        };

        let config = apply_overrides(Config::default(), &args).unwrap();
        assert_eq!(config.model.variant, ModelVariant::H64);
        assert_eq!(config.model_dir(), PathBuf::from("/models"));
        assert_eq!(config.processing.resize_filter, ResizeFilter::Lanczos3);
        assert_eq!(config.output.jpeg_quality, 70);
        assert!(config.processing.fail_fast);
    }

    #[test]
    fn setup_fails_when_model_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.general.model_dir = Some(dir.path().to_path_buf());
        config.model.variant = ModelVariant::H50;

        let err = setup_processor(config).err().unwrap().to_string();
        assert!(err.contains("animeganv3_H50_model.onnx"));
        assert!(err.contains("--model-dir"));
    }
}
