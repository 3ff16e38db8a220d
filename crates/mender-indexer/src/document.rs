//! Document parsing and rendering

use mender_core::{Error, Result};
use serde_yaml::{Mapping, Value};

/// Parse raw document bytes (YAML or JSON) into its top-level mapping.
pub fn parse_document(bytes: &[u8]) -> Result<Mapping> {
    let value: Value =
        serde_yaml::from_slice(bytes).map_err(|e| Error::ParseFailure(e.to_string()))?;
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Tagged(tagged) => match tagged.value {
            Value::Mapping(mapping) => Ok(mapping),
            _ => Err(Error::ParseFailure("document root is not a mapping".to_string())),
        },
        _ => Err(Error::ParseFailure("document root is not a mapping".to_string())),
    }
}

/// Serialize a document mapping back to YAML, preserving key order.
pub fn render_document(document: &Mapping) -> Result<String> {
    serde_yaml::to_string(document).map_err(|e| Error::ParseFailure(e.to_string()))
}

/// Text form of a mapping key. Scalars render as written (`200`, `true`);
/// anything else falls back to its YAML rendering.
pub fn key_to_string(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
