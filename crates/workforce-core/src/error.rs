//! # Error Types
//!
//! Domain-specific error types for workforce-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  workforce-core errors (this file)                                     │
//! │  ├── CoreError        - List/table contract violations                 │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  workforce-client errors (separate crate)                              │
//! │  └── ClientError      - HTTP, decoding, config, conflicts              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → Notification        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in this crate panics on bad input: out-of-range pages are ignored
//! and malformed rows are skipped, so the only errors left are configuration
//! mistakes made by the calling module.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core list/table errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Two column descriptors share a key.
    ///
    /// ## When This Occurs
    /// A module builds its column set and reuses a key (e.g. two `name`
    /// columns for both languages). Keys identify cells in the rendered
    /// view-model, so they must be unique within one table.
    #[error("Duplicate column key: {0}")]
    DuplicateColumnKey(String),

    /// Entity has no identifier.
    ///
    /// Raised when a mutation is attempted on a record the backend never
    /// assigned an id to. Rendering skips such rows instead.
    #[error("{kind} has no identifier")]
    MissingIdentifier { kind: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., a column key with whitespace).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::DuplicateColumnKey("name".to_string());
        assert_eq!(err.to_string(), "Duplicate column key: name");

        let err = CoreError::MissingIdentifier {
            kind: "Region".to_string(),
        };
        assert_eq!(err.to_string(), "Region has no identifier");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "key".to_string(),
        };
        assert_eq!(err.to_string(), "key is required");

        let err = ValidationError::OutOfRange {
            field: "page_size".to_string(),
            min: 1,
            max: 100,
        };
        assert_eq!(err.to_string(), "page_size must be between 1 and 100");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "key".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
