//! Error types for timebucket-core.
//!
//! Errors fall into three groups: configuration errors raised while building
//! layouts, key formats and templates; per-record errors raised while
//! extracting, parsing or formatting a single record; and ingestion errors
//! reported by the record source.

use thiserror::Error;

/// The main error type for timebucket operations.
#[derive(Debug, Error)]
pub enum TimebucketError {
    /// Invalid or missing configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Key format is empty or contains an unsupported specifier.
    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    /// Layout set is empty or a layout contains an unsupported specifier.
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    /// Extraction template is malformed.
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// The template could not be rendered against a record.
    #[error("Extraction error: {0}")]
    Extract(String),

    /// No layout parsed the value.
    #[error("Parse error: could not parse {value:?} using layouts {:?}", .layouts.join(","))]
    Parse { value: String, layouts: Vec<String> },

    /// The bucket key could not be rendered.
    #[error("Format error: could not render key with {0:?}")]
    Format(String),

    /// The record source failed.
    #[error("Error reading record: {0}")]
    Ingest(String),

    /// A per-record failure, tagged with the 1-based record position.
    #[error("record {index}: {source}")]
    Record {
        index: usize,
        source: Box<TimebucketError>,
    },
}

impl TimebucketError {
    /// Whether the skip-errors policy may discard this error.
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            TimebucketError::Extract(_)
                | TimebucketError::Parse { .. }
                | TimebucketError::Format(_)
                | TimebucketError::Record { .. }
        )
    }

    /// Whether this error was raised before any record was read.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            TimebucketError::Config(_)
                | TimebucketError::InvalidKeyFormat(_)
                | TimebucketError::InvalidLayout(_)
                | TimebucketError::InvalidTemplate(_)
        )
    }
}

/// Result type alias for timebucket operations.
pub type Result<T> = std::result::Result<T, TimebucketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_lists_value_and_layouts() {
        let err = TimebucketError::Parse {
            value: "nope".to_string(),
            layouts: vec!["%Y".to_string(), "%Y-%m-%d".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Parse error: could not parse \"nope\" using layouts \"%Y,%Y-%m-%d\""
        );
    }

    #[test]
    fn record_error_wraps_source() {
        let err = TimebucketError::Record {
            index: 3,
            source: Box::new(TimebucketError::Extract("field \"t\" is missing".into())),
        };
        assert_eq!(
            err.to_string(),
            "record 3: Extraction error: field \"t\" is missing"
        );
        assert!(err.is_record_error());
        assert!(!err.is_config_error());
    }

    #[test]
    fn config_errors_are_not_record_errors() {
        let err = TimebucketError::InvalidKeyFormat("%Q".into());
        assert!(err.is_config_error());
        assert!(!err.is_record_error());
        assert!(!TimebucketError::Ingest("eof".into()).is_record_error());
    }
}
