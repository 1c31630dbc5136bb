//! # Error Types
//!
//! Structured error types for fdas_core. The derivation engine itself never
//! fails: malformed numbers are clamped and degenerate capacities produce
//! zero-loop / zero-NAC plans. Errors only come from edits that must be
//! rejected (removing the last floor, unknown rule or device names) and from
//! file I/O.
//!
//! ## Example
//!
//! ```rust
//! use fdas_core::errors::{FdasError, FdasResult};
//!
//! fn pick_floor(len: usize, index: usize) -> FdasResult<usize> {
//!     if index >= len {
//!         return Err(FdasError::floor_not_found(index, len));
//!     }
//!     Ok(index)
//! }
//!
//! assert_eq!(pick_floor(3, 5).unwrap_err().error_code(), "FLOOR_NOT_FOUND");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for fdas_core operations
pub type FdasResult<T> = Result<T, FdasError>;

/// Structured error type for estimator operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum FdasError {
    /// An input value could not be used
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Rule name is not part of the rule set
    #[error("Unknown rule: {name}")]
    UnknownRule { name: String },

    /// Device key is not in the catalog
    #[error("Unknown device: {key}")]
    UnknownDevice { key: String },

    /// Floor index out of range
    #[error("Floor #{index} not found (registry has {len} floors)")]
    FloorNotFound { index: usize, len: usize },

    /// The registry must keep at least one floor
    #[error("Cannot remove the last remaining floor")]
    LastFloor,

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// CSV/JSON export could not be produced
    #[error("Export error ({format}): {reason}")]
    ExportError { format: String, reason: String },

    /// Document schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl FdasError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        FdasError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownRule error
    pub fn unknown_rule(name: impl Into<String>) -> Self {
        FdasError::UnknownRule { name: name.into() }
    }

    /// Create an UnknownDevice error
    pub fn unknown_device(key: impl Into<String>) -> Self {
        FdasError::UnknownDevice { key: key.into() }
    }

    /// Create a FloorNotFound error
    pub fn floor_not_found(index: usize, len: usize) -> Self {
        FdasError::FloorNotFound { index, len }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        FdasError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an ExportError
    pub fn export_error(format: impl Into<String>, reason: impl Into<String>) -> Self {
        FdasError::ExportError {
            format: format.into(),
            reason: reason.into(),
        }
    }

    /// True when the error came from user-typed input rather than the filesystem
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            FdasError::InvalidInput { .. }
                | FdasError::UnknownRule { .. }
                | FdasError::UnknownDevice { .. }
                | FdasError::FloorNotFound { .. }
                | FdasError::LastFloor
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            FdasError::InvalidInput { .. } => "INVALID_INPUT",
            FdasError::UnknownRule { .. } => "UNKNOWN_RULE",
            FdasError::UnknownDevice { .. } => "UNKNOWN_DEVICE",
            FdasError::FloorNotFound { .. } => "FLOOR_NOT_FOUND",
            FdasError::LastFloor => "LAST_FLOOR",
            FdasError::FileError { .. } => "FILE_ERROR",
            FdasError::SerializationError { .. } => "SERIALIZATION_ERROR",
            FdasError::ExportError { .. } => "EXPORT_ERROR",
            FdasError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for FdasError {
    fn from(e: serde_json::Error) -> Self {
        FdasError::SerializationError { reason: e.to_string() }
    }
}
