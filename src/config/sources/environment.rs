//! Environment variable source: PAGEWISE_* prefix with __ separator for nested keys.

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};

/// Add environment variable overlay to builder.
/// `PAGEWISE_COLLECTION__PAGE_SIZE=25` sets `collection.page_size`.
pub(crate) fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("PAGEWISE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    )
}
