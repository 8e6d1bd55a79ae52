//! Error types for the location-sync library.
//!
//! This module provides custom error types using `thiserror`. Every variant
//! aborts a sync and rolls its transaction back; [`SyncError::kind`] groups
//! them into the categories callers usually branch on.

use thiserror::Error;

/// Broad category of a [`SyncError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Header mismatch, field count mismatch or unreadable input
    InputFormat,
    /// An integer column could not be parsed
    TypeCoercion,
    /// Destination table missing or incompatible, or any SQLite fault
    Storage,
    /// Configuration could not be loaded or failed validation
    Configuration,
}

impl ErrorKind {
    /// Stable label used in logs and metrics
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InputFormat => "input_format",
            Self::TypeCoercion => "type_coercion",
            Self::Storage => "storage",
            Self::Configuration => "configuration",
        }
    }
}

/// Errors that can occur while synchronizing locations.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// CSV reader errors (field count mismatch, invalid UTF-8, ...)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Header row does not match the expected columns
    #[error("CSV header mismatch: expected [{expected}], found [{found}]")]
    HeaderMismatch {
        /// Expected header, comma separated
        expected: String,
        /// Header found in the file, comma separated
        found: String,
    },

    /// `criteria_id` is not an integer
    #[error("Invalid criteria_id {value:?} on line {line}")]
    InvalidCriteriaId {
        /// 1-based line number in the source file
        line: u64,
        /// Raw field value
        value: String,
    },

    /// `parent_id` is neither empty nor an integer
    #[error("Invalid parent_id {value:?} for criteria_id {criteria_id}")]
    InvalidParentId {
        /// Row the value belongs to
        criteria_id: i64,
        /// Raw field value
        value: String,
    },

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SyncError {
    /// Category of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Csv(_) | Self::HeaderMismatch { .. } | Self::Io(_) => ErrorKind::InputFormat,
            Self::InvalidCriteriaId { .. } | Self::InvalidParentId { .. } => ErrorKind::TypeCoercion,
            Self::Database(_) => ErrorKind::Storage,
            Self::Config(_) | Self::InvalidConfig(_) => ErrorKind::Configuration,
        }
    }
}

/// Convenience type alias for Result with SyncError
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_groups_variants() {
        let err = SyncError::InvalidParentId {
            criteria_id: 7,
            value: "x".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::TypeCoercion);

        let err = SyncError::HeaderMismatch {
            expected: "a".to_string(),
            found: "b".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::InputFormat);

        let err = SyncError::Database(rusqlite::Error::QueryReturnedNoRows);
        assert_eq!(err.kind(), ErrorKind::Storage);
    }

    #[test]
    fn test_display_includes_line() {
        let err = SyncError::InvalidCriteriaId {
            line: 3,
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid criteria_id \"abc\" on line 3");
    }
}
