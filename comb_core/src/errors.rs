//! # Error Types
//!
//! Structured error types for comb_core. Configuration and state errors are
//! raised at the call that introduces them; consistency errors are recovered
//! during enumeration and kept as diagnostics on the computed snapshot.
//!
//! ## Example
//!
//! ```rust
//! use comb_core::errors::{CombError, CombResult};
//!
//! fn check_name(name: &str) -> CombResult<()> {
//!     if name.trim().is_empty() {
//!         return Err(CombError::configuration(name, "Action name must not be empty"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_name("G1").is_ok());
//! assert_eq!(check_name("").unwrap_err().error_code(), "CONFIGURATION_ERROR");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for comb_core operations
pub type CombResult<T> = Result<T, CombError>;

/// Structured error type for catalogue, generation and I/O operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CombError {
    /// The action catalogue is malformed (duplicate name, unknown action,
    /// cyclic main actions, invalid factors)
    #[error("Configuration error for '{action}': {reason}")]
    Configuration { action: String, reason: String },

    /// Operation not allowed in the current lifecycle state
    #[error("State error in {operation}: {reason}")]
    State { operation: String, reason: String },

    /// Contradictory relationships around a single action. Recovered by
    /// leaving the action out of the affected combinations.
    #[error("Consistency error for '{action}': {reason}")]
    Consistency { action: String, reason: String },

    /// An input value is invalid (out of range, wrong shape, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

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

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CombError {
    /// Create a Configuration error
    pub fn configuration(action: impl Into<String>, reason: impl Into<String>) -> Self {
        CombError::Configuration {
            action: action.into(),
            reason: reason.into(),
        }
    }

    /// Create a State error
    pub fn state(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        CombError::State {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create a Consistency error
    pub fn consistency(action: impl Into<String>, reason: impl Into<String>) -> Self {
        CombError::Consistency {
            action: action.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CombError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CombError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error was recovered locally during enumeration
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CombError::Consistency { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CombError::Configuration { .. } => "CONFIGURATION_ERROR",
            CombError::State { .. } => "STATE_ERROR",
            CombError::Consistency { .. } => "CONSISTENCY_ERROR",
            CombError::InvalidInput { .. } => "INVALID_INPUT",
            CombError::FileError { .. } => "FILE_ERROR",
            CombError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CombError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for CombError {
    fn from(err: serde_json::Error) -> Self {
        CombError::SerializationError {
            reason: err.to_string(),
        }
    }
}
