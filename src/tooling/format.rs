//! Format collection pages and configuration as text.

use crate::config::AppConfig;
use crate::controller::CollectionState;
use crate::error::ApiError;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::{json, Value};

/// Column used when items are not JSON objects.
const SCALAR_COLUMN: &str = "value";

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Render loaded items as a table followed by a one-line pagination summary.
///
/// Columns are the union of top-level object keys in first-seen order.
pub fn format_items_text(resource: &str, state: &CollectionState<Value>) -> String {
    let mut out = format!("{}\n\n", format_section_heading(&title_case(resource)));

    if state.items.is_empty() {
        out.push_str("No items match the current filters.\n");
    } else {
        let columns = collect_columns(&state.items);
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(columns.clone());
        for item in &state.items {
            table.add_row(columns.iter().map(|column| cell(item, column)).collect::<Vec<_>>());
        }
        out.push_str(&table.to_string());
        out.push('\n');
    }

    out.push_str(&format!("\n{}\n", format_summary(state)));
    out
}

/// `Showing 20 of 31 (page 2 of 4)`, with a hint when more pages remain.
pub fn format_summary(state: &CollectionState<Value>) -> String {
    let mut summary = format!(
        "Showing {} of {} (page {} of {})",
        state.items.len(),
        state.total_count,
        state.page_number,
        state.total_pages
    );
    if state.has_more() {
        summary.push_str(&format!(" {}", "more available, use --pages".dimmed()));
    }
    summary
}

/// Render loaded items and counters as pretty JSON.
pub fn format_items_json(state: &CollectionState<Value>) -> Result<String, ApiError> {
    let output = json!({
        "items": state.items,
        "page": state.page_number,
        "totalPages": state.total_pages,
        "totalCount": state.total_count,
        "generation": state.generation,
    });
    serde_json::to_string_pretty(&output)
        .map_err(|e| ApiError::ConfigError(format!("Failed to render items: {}", e)))
}

/// Render the effective configuration. The backend token is redacted.
pub fn format_config(config: &AppConfig, format: &str) -> Result<String, ApiError> {
    let mut config = config.clone();
    if config.backend.token.is_some() {
        config.backend.token = Some("<redacted>".to_string());
    }
    match format {
        "json" => serde_json::to_string_pretty(&config)
            .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e))),
        "toml" => toml::to_string_pretty(&config)
            .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e))),
        other => Err(ApiError::ConfigError(format!(
            "Invalid format: {} (must be 'toml' or 'json')",
            other
        ))),
    }
}

fn collect_columns(items: &[Value]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for item in items {
        match item {
            Value::Object(map) => {
                for key in map.keys() {
                    if !columns.iter().any(|c| c == key) {
                        columns.push(key.clone());
                    }
                }
            }
            _ => {
                if !columns.iter().any(|c| c == SCALAR_COLUMN) {
                    columns.push(SCALAR_COLUMN.to_string());
                }
            }
        }
    }
    columns
}

fn cell(item: &Value, column: &str) -> String {
    let value = match item {
        Value::Object(map) => map.get(column),
        scalar if column == SCALAR_COLUMN => Some(scalar),
        _ => None,
    };
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn title_case(resource: &str) -> String {
    let mut chars = resource.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
