//! Error types for the tabmerge library.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Why a single source could not be turned into a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestFailure {
    /// No header record was found.
    EmptySource,
    /// The bytes could not be decoded as the hinted format.
    MalformedSource { detail: String },
    /// A sheet selector matched no sheet in the workbook.
    MissingSheet { sheet: String },
}

impl IngestFailure {
    /// Short machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            IngestFailure::EmptySource => "empty-source",
            IngestFailure::MalformedSource { .. } => "malformed-source",
            IngestFailure::MissingSheet { .. } => "missing-sheet",
        }
    }
}

impl fmt::Display for IngestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestFailure::EmptySource => write!(f, "empty-source"),
            IngestFailure::MalformedSource { detail } => write!(f, "malformed-source ({})", detail),
            IngestFailure::MissingSheet { sheet } => write!(f, "missing-sheet '{}'", sheet),
        }
    }
}

/// Main error type for merge operations.
#[derive(Debug, Error)]
pub enum MergeError {
    /// A source could not be ingested.
    #[error("Cannot ingest '{source_name}': {reason}")]
    Ingest {
        source_name: String,
        reason: IngestFailure,
    },

    /// The join key column is missing from one of the sources.
    #[error(
        "Key column '{requested_key}' not found in '{source_name}' (available columns: {})",
        available_columns.join(", ")
    )]
    KeyColumnNotFound {
        source_name: String,
        requested_key: String,
        available_columns: Vec<String>,
    },

    /// Zero sources were supplied.
    #[error("No sources to merge")]
    NoSources,

    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing output to a stream.
    #[error("Write error: {0}")]
    Write(#[source] std::io::Error),

    /// Format not supported by the current configuration.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Error from the CSV writer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MergeError {
    pub(crate) fn ingest(source_name: impl Into<String>, reason: IngestFailure) -> Self {
        MergeError::Ingest {
            source_name: source_name.into(),
            reason,
        }
    }

    pub(crate) fn malformed(source_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::ingest(
            source_name,
            IngestFailure::MalformedSource {
                detail: detail.into(),
            },
        )
    }
}

/// Result type alias for merge operations.
pub type Result<T> = std::result::Result<T, MergeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_column_not_found_lists_columns() {
        let err = MergeError::KeyColumnNotFound {
            source_name: "orders.csv".to_string(),
            requested_key: "id".to_string(),
            available_columns: vec!["order_no".to_string(), "total".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("orders.csv"));
        assert!(msg.contains("'id'"));
        assert!(msg.contains("order_no, total"));
    }

    #[test]
    fn test_ingest_reason_codes() {
        assert_eq!(IngestFailure::EmptySource.code(), "empty-source");
        let malformed = IngestFailure::MalformedSource {
            detail: "bad quote".to_string(),
        };
        assert_eq!(malformed.code(), "malformed-source");

        let err = MergeError::ingest("a.csv", malformed);
        assert_eq!(
            err.to_string(),
            "Cannot ingest 'a.csv': malformed-source (bad quote)"
        );
    }
}
