//! Built-in defaults, the lowest-precedence layer.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};

pub(crate) fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("backend.base_url", "http://localhost:3000/api")?
        .set_default("backend.timeout_ms", 15_000)?
        .set_default("collection.debounce_ms", 400)?
        .set_default("collection.page_size", 10)
}
