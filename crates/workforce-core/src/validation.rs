//! # Validation Module
//!
//! Input validation for list queries and column sets.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Pager / search box (frontend)                                │
//! │  ├── Page-size dropdown only offers PAGE_SIZE_OPTIONS                  │
//! │  └── Search box has a maxlength                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: List-state engine (Rust)                                     │
//! │  └── THIS MODULE: page size, page number, search, column keys          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend list endpoint                                        │
//! │  └── Caps limit, rejects unknown filters                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use workforce_core::validation::{validate_page_size, validate_search_query};
//!
//! assert!(validate_page_size(25).is_ok());
//! assert_eq!(validate_search_query("  north  ").unwrap(), "north");
//! ```

use crate::error::ValidationError;
use crate::{MAX_PAGE_SIZE, MAX_SEARCH_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Query Validators
// =============================================================================

/// Validates a page size.
///
/// ## Rules
/// - Must be at least 1
/// - Must be at most `MAX_PAGE_SIZE` (100)
pub fn validate_page_size(page_size: u32) -> ValidationResult<()> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(ValidationError::OutOfRange {
            field: "page_size".to_string(),
            min: 1,
            max: MAX_PAGE_SIZE as i64,
        });
    }

    Ok(())
}

/// Validates a 1-based page number.
pub fn validate_page_number(page: u32) -> ValidationResult<()> {
    if page == 0 {
        return Err(ValidationError::OutOfRange {
            field: "page".to_string(),
            min: 1,
            max: u32::MAX as i64,
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (lists everything)
/// - Maximum 100 characters after trimming
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Column Validators
// =============================================================================

/// Validates a column key.
///
/// ## Rules
/// - Must not be empty
/// - Must not contain whitespace (keys end up as DOM ids / map keys)
pub fn validate_column_key(key: &str) -> ValidationResult<()> {
    if key.is_empty() {
        return Err(ValidationError::Required {
            field: "column key".to_string(),
        });
    }

    if key.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "column key".to_string(),
            reason: format!("'{}' must not contain whitespace", key),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
