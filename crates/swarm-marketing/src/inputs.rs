//! Reading caller-supplied run inputs from files.

use std::path::Path;

use serde_json::{Map, Value};

use swarm_contracts::error::{SwarmError, SwarmResult};

/// Read a JSON file holding the free-form inputs mapping.
///
/// The document must be a JSON object.
pub fn read_inputs(path: &Path) -> SwarmResult<Map<String, Value>> {
    let text = std::fs::read_to_string(path).map_err(|e| SwarmError::ConfigError {
        reason: format!("failed to read inputs file '{}': {}", path.display(), e),
    })?;
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(SwarmError::ConfigError {
            reason: format!("inputs file '{}' must contain a JSON object", path.display()),
        }),
        Err(e) => Err(SwarmError::ConfigError {
            reason: format!("inputs file '{}' is not valid JSON: {}", path.display(), e),
        }),
    }
}

/// One constraint per line: surrounding whitespace trimmed, blank lines
/// dropped.
pub fn parse_constraints(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn read_constraints(path: &Path) -> SwarmResult<Vec<String>> {
    let text = std::fs::read_to_string(path).map_err(|e| SwarmError::ConfigError {
        reason: format!("failed to read constraints file '{}': {}", path.display(), e),
    })?;
    Ok(parse_constraints(&text))
}
