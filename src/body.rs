use crate::error::{ConsoleError, Result};
use crate::model::Operation;
use serde_json::Value;

/// Parses the body text typed by the user. Blank text means no body.
pub fn resolve(text: Option<&str>) -> Result<Option<Value>> {
    match text {
        Some(t) if !t.trim().is_empty() => serde_json::from_str(t)
            .map(Some)
            .map_err(ConsoleError::InvalidBody),
        _ => Ok(None),
    }
}

/// Sample of the active media type, as it would appear pre-filled in an editor.
pub fn sample_text(operation: &Operation) -> Option<String> {
    operation
        .active_media_type()
        .and_then(|m| m.sample.as_ref())
        .and_then(|s| serde_json::to_string_pretty(s).ok())
}
