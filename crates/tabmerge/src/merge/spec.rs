//! Join parameters.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::mapping::ColumnMapping;
use crate::error::{MergeError, Result};

/// Which keys appear in a join result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinType {
    /// Keys of the first source.
    #[default]
    Left,
    /// Keys present in every source.
    Inner,
    /// Keys of the last source.
    Right,
    /// Keys present in any source.
    Outer,
}

impl FromStr for JoinType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(JoinType::Left),
            "inner" => Ok(JoinType::Inner),
            "right" => Ok(JoinType::Right),
            "outer" | "full" | "full-outer" | "full_outer" => Ok(JoinType::Outer),
            _ => Err(format!(
                "Unknown join type: {}. Use: left, inner, right, or outer.",
                s
            )),
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Left => write!(f, "left"),
            JoinType::Inner => write!(f, "inner"),
            JoinType::Right => write!(f, "right"),
            JoinType::Outer => write!(f, "outer"),
        }
    }
}

/// Parameters of a join merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinSpec {
    /// Key column, matched case-insensitively against each source header.
    pub key_column: String,
    /// Join type.
    #[serde(default)]
    pub join_type: JoinType,
    /// Optional renames. An empty mapping behaves like no mapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_mapping: Option<ColumnMapping>,
}

impl JoinSpec {
    /// Join on `key_column` with the given join type and no renames.
    pub fn new(key_column: impl Into<String>, join_type: JoinType) -> Self {
        Self {
            key_column: key_column.into(),
            join_type,
            column_mapping: None,
        }
    }

    /// Attach a column mapping.
    pub fn with_mapping(mut self, mapping: ColumnMapping) -> Self {
        self.column_mapping = Some(mapping);
        self
    }

    /// The mapping, if one with at least one entry was supplied.
    pub fn mapping(&self) -> Option<&ColumnMapping> {
        self.column_mapping.as_ref().filter(|m| !m.is_empty())
    }

    /// Parse a spec from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a spec from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| MergeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_type_parse() {
        assert_eq!("LEFT".parse::<JoinType>().unwrap(), JoinType::Left);
        assert_eq!(" inner ".parse::<JoinType>().unwrap(), JoinType::Inner);
        assert_eq!("full".parse::<JoinType>().unwrap(), JoinType::Outer);
        assert!("cross".parse::<JoinType>().is_err());
    }

    #[test]
    fn test_join_type_display_parses_back() {
        for join_type in [JoinType::Left, JoinType::Inner, JoinType::Right, JoinType::Outer] {
            assert_eq!(join_type.to_string().parse::<JoinType>().unwrap(), join_type);
        }
    }

    #[test]
    fn test_spec_from_json() {
        let spec = JoinSpec::from_json(
            r#"{
                "key_column": "id",
                "join_type": "outer",
                "column_mapping": [{"source": 1, "column": "nm", "output": "name"}]
            }"#,
        )
        .unwrap();

        assert_eq!(spec.key_column, "id");
        assert_eq!(spec.join_type, JoinType::Outer);
        assert_eq!(spec.mapping().unwrap().resolve(1, "nm"), "name");
    }

    #[test]
    fn test_spec_defaults() {
        let spec = JoinSpec::from_json(r#"{"key_column": "id"}"#).unwrap();
        assert_eq!(spec.join_type, JoinType::Left);
        assert!(spec.mapping().is_none());
    }

    #[test]
    fn test_empty_mapping_counts_as_absent() {
        let spec = JoinSpec::new("id", JoinType::Inner).with_mapping(ColumnMapping::new());
        assert!(spec.column_mapping.is_some());
        assert!(spec.mapping().is_none());
    }

    #[test]
    fn test_bad_json_is_error() {
        let err = JoinSpec::from_json(r#"{"join_type": "left"}"#).unwrap_err();
        assert!(matches!(err, MergeError::Json(_)));
    }
}
