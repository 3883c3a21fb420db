//! Configuration
//!
//! Layered configuration: built-in defaults, the user's global config file, an
//! explicit file, then `PAGEWISE_*` environment variables (highest precedence).

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

use crate::debounce::DEFAULT_QUIET_PERIOD;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub collection: CollectionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.backend.validate()?;
        self.collection.validate()
    }
}

/// REST backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL, e.g. `https://admin.example.com/api`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Bearer token handed to the fetcher. Prefer the environment over a file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_timeout_ms() -> u64 {
    15_000
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            token: None,
        }
    }
}

impl BackendConfig {
    pub fn validate(&self) -> Result<(), String> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err("Backend base_url cannot be empty".to_string());
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(format!("Invalid backend base_url: {}", url));
        }
        if self.timeout_ms == 0 {
            return Err("Backend timeout_ms must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Collection controller settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Quiet period for typed search text, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Items requested per page (`limit`)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_QUIET_PERIOD.as_millis() as u64
}

fn default_page_size() -> u32 {
    10
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            page_size: default_page_size(),
        }
    }
}

impl CollectionConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.page_size == 0 {
            return Err("Collection page_size must be greater than 0".to_string());
        }
        Ok(())
    }
}
