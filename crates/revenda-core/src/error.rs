//! # Error Types
//!
//! ```text
//!  ValidationError ─┐
//!                   ├──► CoreError ──► ApiError (400 / 404)
//!  bad window/kind ─┘
//! ```
//!
//! Store failures live in `revenda-db` as `DbError` and meet these only at
//! the HTTP boundary.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain errors that are not about a single field.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An unknown reference-data kind was requested.
    ///
    /// ## When This Occurs
    /// - `/reference/{kind}` called with anything other than
    ///   `categories`, `sale-channels` or `purchase-channels`
    #[error("Unknown reference kind: {0}")]
    UnknownReferenceKind(String),

    /// An unknown KPI window was requested.
    #[error("Unknown KPI window: {0}")]
    UnknownWindow(String),

    /// A money amount could not be represented in integer cents.
    #[error("Amount out of range: {0}")]
    AmountOutOfRange(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// A rejected request field. Checked before any store access, surfaced
/// as 400 `VALIDATION_ERROR`.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Missing, empty, or only whitespace.
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    #[error("{field} must not be negative")]
    Negative { field: String },
}

impl ValidationError {
    /// Creates a `Required` error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("name");
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: 10_000,
        };
        assert_eq!(err.to_string(), "quantity must be between 1 and 10000");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("loginHandle").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(
            core_err.to_string(),
            "Validation error: loginHandle is required"
        );
    }
}
