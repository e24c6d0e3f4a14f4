//! Configuration handling for jinjautils.
//! Holds the session options and loads template variables from JSON or YAML files.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use std::path::Path;

/// Template variables in the order they were declared.
pub type Variables = IndexMap<String, serde_json::Value>;

/// Options applied to every environment a session constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Remove the first newline after a block tag.
    pub trim_blocks: bool,
    /// Strip whitespace from the start of a line up to a block tag.
    pub lstrip_blocks: bool,
    /// Emit debug, info and warning lines on the default console sink.
    pub verbose: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { trim_blocks: true, lstrip_blocks: true, verbose: false }
    }
}

/// Reads a variables file from disk and parses it with [`parse_context`].
///
/// # Errors
/// * `Error::IoError` if the file cannot be read
/// * `Error::ContextError` if the content is neither a JSON nor a YAML mapping
pub fn load_context<P: AsRef<Path>>(path: P) -> Result<Variables> {
    let path = path.as_ref();
    debug!("Loading variables from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(Error::IoError)?;
    parse_context(&content)
}

/// Parses variables as JSON, falling back to YAML. The top level must be a mapping.
pub fn parse_context(content: &str) -> Result<Variables> {
    match serde_json::from_str::<Variables>(content) {
        Ok(v) => Ok(v),
        Err(_) => serde_yaml::from_str::<Variables>(content).map_err(|e| Error::ContextError {
            reason: format!("invalid variables format: {e}"),
        }),
    }
}

/// Parses a `key=value` assignment.
///
/// The value is read as JSON when it parses (numbers, booleans, arrays, objects,
/// quoted strings) and kept as a plain string otherwise.
pub fn parse_assignment(assignment: &str) -> Result<(String, serde_json::Value)> {
    let (key, raw) = assignment.split_once('=').ok_or_else(|| Error::ContextError {
        reason: format!("expected key=value, received '{assignment}'"),
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::ContextError {
            reason: format!("missing variable name in '{assignment}'"),
        });
    }
    let value = serde_json::from_str(raw)
        .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));

    Ok((key.to_string(), value))
}
