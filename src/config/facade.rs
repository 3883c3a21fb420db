//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::AppConfig;
use crate::error::ApiError;
use std::path::{Path, PathBuf};

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Global config file (`<config dir>/pagewise/config.toml`), if the platform has one.
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "pagewise", "pagewise")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the global file, an optional explicit file, and environment.
    pub fn load(explicit: Option<&Path>) -> Result<AppConfig, ApiError> {
        let config = MergeService::load(Self::global_config_path().as_deref(), explicit)?;
        config.validate().map_err(ApiError::ConfigError)?;
        Ok(config)
    }

    /// Load configuration from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<AppConfig, ApiError> {
        let config = MergeService::load(None, Some(path))?;
        config.validate().map_err(ApiError::ConfigError)?;
        Ok(config)
    }

    /// Create default configuration.
    pub fn default() -> AppConfig {
        AppConfig::default()
    }
}
