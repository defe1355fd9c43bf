//! Front matter deserialization.
//!
//! [`FrontMatterParser`] is the seam between the store and the YAML library;
//! the store only ever sees a string-keyed mapping or an error.

use std::collections::BTreeMap;

use serde_yaml::Value;

/// Top-level front matter keys and their values.
pub type FrontMatterMap = BTreeMap<String, Value>;

/// Error from deserializing a front matter body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrontMatterError {
    #[error("{0}")]
    Parse(String),
    #[error("front matter is not a mapping")]
    NotAMapping,
}

/// Deserializes a front matter body into a mapping.
pub trait FrontMatterParser: Send + Sync {
    /// Parse `body` into its top-level keys.
    ///
    /// # Errors
    ///
    /// Returns an error if `body` is not valid or not a mapping.
    fn parse(&self, body: &str) -> Result<FrontMatterMap, FrontMatterError>;
}

/// [`FrontMatterParser`] backed by `serde_yaml`.
///
/// An empty body is an empty mapping. Entries with non-string keys are
/// ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlFrontMatterParser;

impl FrontMatterParser for YamlFrontMatterParser {
    fn parse(&self, body: &str) -> Result<FrontMatterMap, FrontMatterError> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Ok(FrontMatterMap::new());
        }

        let value: Value = serde_yaml::from_str(trimmed)
            .map_err(|e| FrontMatterError::Parse(format!("Invalid YAML: {e}")))?;

        match value {
            Value::Null => Ok(FrontMatterMap::new()),
            Value::Mapping(mapping) => Ok(mapping
                .into_iter()
                .filter_map(|(key, value)| match key {
                    Value::String(key) => Some((key, value)),
                    _ => None,
                })
                .collect()),
            _ => Err(FrontMatterError::NotAMapping),
        }
    }
}
