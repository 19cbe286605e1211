//! Response decoding
//!
//! Parses JSON response bodies and extracts records and page fields using
//! simple dot paths (`registrants.data`, `items[0].id`).

use crate::error::{Error, Result};
use crate::types::JsonValue;

/// Parse a response body as JSON
///
/// An empty body decodes to `null`.
pub fn parse_body(text: &str) -> Result<JsonValue> {
    if text.trim().is_empty() {
        return Ok(JsonValue::Null);
    }
    serde_json::from_str(text)
        .map_err(|e| Error::malformed(format!("Failed to parse JSON response: {e}")))
}

/// Resolve a dot path inside a JSON value
pub fn extract_path<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        // Handle array indexing like "data[0]" or "items[-1]"
        if let Some(bracket_pos) = part.find('[') {
            let name = &part[..bracket_pos];
            let index_str = part[bracket_pos + 1..].strip_suffix(']')?;

            if !name.is_empty() {
                current = current.get(name)?;
            }

            let index: i64 = index_str.parse().ok()?;
            let arr = current.as_array()?;
            let idx = if index < 0 {
                arr.len().checked_sub(index.unsigned_abs() as usize)?
            } else {
                index as usize
            };
            current = arr.get(idx)?;
        } else {
            current = current.get(part)?;
        }
    }

    Some(current)
}

/// Extract records from a response body
///
/// With a path, an array at the path yields its items, any other value
/// yields itself, and a missing path yields nothing. Without a path, the
/// whole body is one record (or its items, if it is an array).
pub fn extract_records(body: &JsonValue, path: Option<&str>) -> Vec<JsonValue> {
    let target = match path {
        Some(path) => match extract_path(body, path) {
            Some(v) => v,
            None => return Vec::new(),
        },
        None => body,
    };

    match target {
        JsonValue::Array(items) => items.clone(),
        JsonValue::Null => Vec::new(),
        other => vec![other.clone()],
    }
}
