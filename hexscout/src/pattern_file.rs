use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::buffer::map_open_error;
use crate::errors::{SearchError, SearchResult};

/// Reads a JSON pattern file.
///
/// The document must be a flat list of strings, e.g. `["AABB", "CC(DD)+"]`.
/// Patterns are returned as written; they are validated later.
pub fn load_patterns(path: &Path) -> SearchResult<Vec<String>> {
    if !path.is_file() {
        return Err(SearchError::file_not_found(path));
    }
    let content = fs::read_to_string(path).map_err(|e| map_open_error(path, e))?;
    let patterns = parse_patterns(&content)?;
    debug!("Loaded {} patterns from {}", patterns.len(), path.display());
    Ok(patterns)
}

/// Parses the JSON text of a pattern file
pub fn parse_patterns(json: &str) -> SearchResult<Vec<String>> {
    let value: Value = serde_json::from_str(json)?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(SearchError::invalid_container(format!(
                "expected a list of pattern strings, found {}",
                kind(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(pattern) => Ok(pattern),
            other => Err(SearchError::invalid_container(format!(
                "element {} is {}, expected a string",
                i,
                kind(&other)
            ))),
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
