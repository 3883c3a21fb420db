//! MergeService: orchestrates sources, applies merge policy, deserializes to AppConfig.

use super::policy;
use crate::config::sources::{environment, file};
use crate::config::AppConfig;
use config::ConfigError;
use std::path::Path;

/// Merge service for config composition.
pub(crate) struct MergeService;

impl MergeService {
    /// Precedence: defaults (lowest) -> global file -> explicit file -> environment (highest).
    pub(crate) fn load(global: Option<&Path>, explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let builder = policy::builder_with_defaults()?;
        let builder = match global {
            Some(path) => file::add_optional(builder, path),
            None => builder,
        };
        let builder = match explicit {
            Some(path) => file::add_required(builder, path)?,
            None => builder,
        };
        let builder = environment::add_to_builder(builder);

        builder.build()?.try_deserialize()
    }
}
