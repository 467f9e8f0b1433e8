//! Lenient parse: recover a JSON object from free-form generated text.
//!
//! Agents are asked to reply with a JSON object but frequently wrap it in
//! Markdown fences or surround it with prose. The recovery strategy is fixed
//! and applied in this order:
//!
//! 1. **trim** surrounding whitespace;
//! 2. **fence-strip** — if the text starts with a triple-backtick fence,
//!    keep only the content between the first pair of fences;
//! 3. **brace-scan** — keep the substring from the first `{` through the
//!    last `}`, when both exist and the close follows the open;
//! 4. **parse** what remains as a JSON object.
//!
//! Changing any step changes which malformed replies are salvageable.

use serde_json::{Map, Value};
use swarm_contracts::error::{SwarmError, SwarmResult};

const FENCE: &str = "```";

/// Apply fence-strip and brace-scan, returning the candidate JSON text.
pub fn isolate_object(text: &str) -> &str {
    let mut s = text.trim();

    if s.starts_with(FENCE) {
        // Content between the first and second fence markers.
        let rest = &s[FENCE.len()..];
        s = match rest.find(FENCE) {
            Some(end) => &rest[..end],
            None => rest,
        };
    }

    if let (Some(start), Some(end)) = (s.find('{'), s.rfind('}')) {
        if end > start {
            s = &s[start..=end];
        }
    }

    s
}

/// Recover a JSON object from `text` using the lenient strategy.
///
/// Returns `SwarmError::MalformedResponse` when the isolated text is not a
/// JSON object.
pub fn parse_object(text: &str) -> SwarmResult<Map<String, Value>> {
    let candidate = isolate_object(text);
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(SwarmError::MalformedResponse {
            reason: format!("expected a JSON object, found {}", kind_of(&other)),
        }),
        Err(e) => Err(SwarmError::MalformedResponse {
            reason: format!("no JSON object could be recovered: {}", e),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
