//! Configuration management for AnimeGAN.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section implements `Default`, so an absent file or an
//! absent table behaves exactly like the built-in settings.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for AnimeGAN.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Model selection
    pub model: ModelConfig,

    /// Processing settings
    pub processing: ProcessingConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Output encoding settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.animegan.animegan/config.toml
    /// - Linux: ~/.config/animegan/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\animegan\config\config.toml
    ///
    /// Falls back to ~/.animegan/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "animegan", "animegan")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".animegan").join("config.toml")
            })
    }

    /// Get the resolved model directory path.
    ///
    /// An explicit `general.model_dir` gets `~` expansion; otherwise the
    /// `models/` directory next to the running executable is used.
    pub fn model_dir(&self) -> PathBuf {
        match &self.general.model_dir {
            Some(dir) => {
                let path_str = dir.to_string_lossy();
                let expanded = shellexpand::tilde(&path_str);
                PathBuf::from(expanded.into_owned())
            }
            None => Self::install_model_dir(),
        }
    }

    fn install_model_dir() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.canonicalize().ok())
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("models")
    }
}
