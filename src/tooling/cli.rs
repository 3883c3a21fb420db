//! CLI Tooling
//!
//! `pagewise list` drives a collection controller against a REST backend: the initial
//! reset fetch, then a "next" button press per extra page until the requested page
//! count is loaded or the collection runs out.

use crate::config::{AppConfig, ConfigLoader};
use crate::controller::{CollectionController, CollectionState};
use crate::error::ApiError;
use crate::fetch::HttpPageFetcher;
use crate::filter::{FilterField, FilterSet, FilterValue, Role};
use crate::tooling::format::{format_config, format_items_json, format_items_text};
use crate::types::{Identity, SentinelHandle};
use crate::visibility::ManualTrigger;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Pagewise CLI - filtered, paginated collections from a REST backend
#[derive(Parser, Debug)]
#[command(name = "pagewise")]
#[command(about = "Browse filtered, paginated collections served by a REST backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config file)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load pages of a collection and print them
    List {
        /// Resource path under the backend base URL (e.g. expenses, support/messages)
        resource: String,
        /// Free-text search
        #[arg(long)]
        search: Option<String>,
        /// Owner identity (privileged roles only)
        #[arg(long)]
        owner: Option<String>,
        /// Inclusive start day (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<String>,
        /// Inclusive end day (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<String>,
        /// Extra resource-specific filter, repeatable (name=value)
        #[arg(long = "filter")]
        filters: Vec<String>,
        /// Caller role (admin, agent, member)
        #[arg(long, default_value = "admin")]
        role: Role,
        /// Caller identity; required for restricted roles
        #[arg(long)]
        identity: Option<String>,
        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: u32,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective merged configuration
    Show {
        /// Output format (toml or json)
        #[arg(long, default_value = "toml")]
        format: String,
    },
}

/// Filters requested on the command line, before role seeding is applied
#[derive(Debug, Default, Clone)]
pub struct FilterArgs {
    pub search: Option<String>,
    pub owner: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub extra: Vec<String>,
}

impl FilterArgs {
    /// Seed the role's defaults, then apply each requested filter. A restricted role
    /// asking for another owner fails here, before anything is fetched.
    pub fn build(&self, role: Role, identity: &Identity) -> Result<FilterSet, ApiError> {
        let mut filters = FilterSet::create_default(role, identity);
        if let Some(search) = &self.search {
            filters.set_search(search.as_str());
        }

        let mut requested: Vec<(FilterField, &str)> = Vec::new();
        if let Some(owner) = &self.owner {
            requested.push((FilterField::OwnerId, owner.as_str()));
        }
        if let Some(start) = &self.start_date {
            requested.push((FilterField::StartDate, start.as_str()));
        }
        if let Some(end) = &self.end_date {
            requested.push((FilterField::EndDate, end.as_str()));
        }
        for pair in &self.extra {
            let (name, value) = pair.split_once('=').ok_or_else(|| {
                ApiError::invalid_field(pair.as_str(), "expected name=value")
            })?;
            requested.push((FilterField::parse(name), value.trim()));
        }

        for (field, value) in requested {
            filters.update(field, FilterValue::from(value))?;
        }
        Ok(filters)
    }
}

/// CLI context holding the effective configuration
pub struct CliContext {
    config: AppConfig,
}

impl CliContext {
    /// Create a new CLI context, loading layered configuration.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = ConfigLoader::load(config_path.as_deref())?;
        Ok(Self { config })
    }

    pub fn with_config(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Execute a CLI command
    pub async fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::List {
                resource,
                search,
                owner,
                start_date,
                end_date,
                filters,
                role,
                identity,
                pages,
                format,
            } => {
                let args = FilterArgs {
                    search: search.clone(),
                    owner: owner.clone(),
                    start_date: start_date.clone(),
                    end_date: end_date.clone(),
                    extra: filters.clone(),
                };
                let state = self
                    .list(resource, &args, *role, identity.as_deref(), *pages)
                    .await?;
                match format.as_str() {
                    "json" => format_items_json(&state),
                    "text" => Ok(format_items_text(resource, &state)),
                    other => Err(ApiError::ConfigError(format!(
                        "Invalid format: {} (must be 'text' or 'json')",
                        other
                    ))),
                }
            }
            Commands::Config {
                command: ConfigCommands::Show { format },
            } => format_config(&self.config, format),
        }
    }

    async fn list(
        &self,
        resource: &str,
        args: &FilterArgs,
        role: Role,
        identity: Option<&str>,
        pages: u32,
    ) -> Result<CollectionState<Value>, ApiError> {
        let identity = match identity {
            Some(id) if !id.trim().is_empty() => Identity::new(id.trim()),
            _ if !role.is_privileged() => {
                return Err(ApiError::ConfigError(format!(
                    "--identity is required for role {}",
                    role.slug()
                )))
            }
            _ => Identity::new(""),
        };
        let filters = args.build(role, &identity)?;

        let fetcher: HttpPageFetcher<Value> =
            HttpPageFetcher::new(&self.config.backend, resource, self.config.backend.token.clone())?;
        info!(endpoint = fetcher.endpoint(), role = role.slug(), pages, "Listing collection");

        let controller = CollectionController::with_filters(
            Arc::new(fetcher),
            &self.config.collection,
            filters,
        );
        let state = load_pages(&controller, pages.max(1)).await;
        controller.shutdown();
        state
    }
}

/// Reset, then press "next" until `pages` pages are loaded or none remain.
pub async fn load_pages<T>(
    controller: &CollectionController<T>,
    pages: u32,
) -> Result<CollectionState<T>, ApiError>
where
    T: Clone + Send + Sync + 'static,
{
    controller.refresh().await;
    let mut state = controller.settled().await;
    if let Some(error) = state.last_error.take() {
        return Err(error.into());
    }

    let mut next_button = ManualTrigger::new();
    controller.attach_trigger(&mut next_button, SentinelHandle::new(1));

    let mut loaded = 1;
    while loaded < pages && state.has_more() {
        let before = state.page_number;
        next_button.fire();
        state = controller.settled().await;
        if let Some(error) = state.last_error.take() {
            controller.detach_trigger(&mut next_button);
            return Err(error.into());
        }
        if state.page_number == before {
            break;
        }
        loaded += 1;
        debug!(page = state.page_number, total_pages = state.total_pages, "Next page loaded");
    }

    controller.detach_trigger(&mut next_button);
    Ok(state)
}
