//! # Error Types
//!
//! Structured error types for pricing_core. Errors only arise at the
//! collaborator boundary (validation, snapshot files, export). The pricing
//! engine itself is total over its numeric domain: losses, zero quantities
//! and infeasible targets are returned as values, never as errors.
//!
//! ## Example
//!
//! ```rust
//! use pricing_core::errors::{PricingError, PricingResult};
//!
//! fn validate_tax(tax_pct: f64) -> PricingResult<()> {
//!     if !(0.0..=100.0).contains(&tax_pct) {
//!         return Err(PricingError::InvalidInput {
//!             field: "tax_percentage".to_string(),
//!             value: tax_pct.to_string(),
//!             reason: "Tax must be between 0 and 100 percent".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for pricing_core operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Structured error type for pricing operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum PricingError {
    /// An input value is invalid (out of range, empty name, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing from a persisted document
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Persisted snapshot could not be understood at all
    #[error("Malformed snapshot: {reason}")]
    MalformedSnapshot { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Tabular export failed
    #[error("Export error: {reason}")]
    ExportError { reason: String },
}

impl PricingError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        PricingError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        PricingError::MissingField {
            field: field.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        PricingError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a MalformedSnapshot error
    pub fn malformed_snapshot(reason: impl Into<String>) -> Self {
        PricingError::MalformedSnapshot {
            reason: reason.into(),
        }
    }

    /// Whether the caller's in-memory state can be kept as-is and the
    /// operation retried with different input.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PricingError::InvalidInput { .. }
                | PricingError::MissingField { .. }
                | PricingError::MalformedSnapshot { .. }
                | PricingError::VersionMismatch { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            PricingError::InvalidInput { .. } => "INVALID_INPUT",
            PricingError::MissingField { .. } => "MISSING_FIELD",
            PricingError::FileError { .. } => "FILE_ERROR",
            PricingError::SerializationError { .. } => "SERIALIZATION_ERROR",
            PricingError::MalformedSnapshot { .. } => "MALFORMED_SNAPSHOT",
            PricingError::VersionMismatch { .. } => "VERSION_MISMATCH",
            PricingError::ExportError { .. } => "EXPORT_ERROR",
        }
    }
}

impl From<serde_json::Error> for PricingError {
    fn from(e: serde_json::Error) -> Self {
        PricingError::SerializationError {
            reason: e.to_string(),
        }
    }
}

impl From<csv::Error> for PricingError {
    fn from(e: csv::Error) -> Self {
        PricingError::ExportError {
            reason: e.to_string(),
        }
    }
}
