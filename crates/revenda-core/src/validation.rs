//! # Validation Module
//!
//! Input validation utilities for Revenda.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (revenda-api)                                 │
//! │  ├── Type validation (JSON deserialization)                            │
//! │  └── Malformed body → 400                                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Service call                                                 │
//! │  └── THIS MODULE: required fields, lengths, ranges                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── UNIQUE login handle                                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Product fields are deliberately not validated here: products are stored
//! exactly as submitted.

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{IntakeBatch, RegisterRequest, SaleInput};
use crate::{MAX_AMOUNT_CENTS, MAX_INTAKE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of a login handle.
pub const MAX_HANDLE_LEN: usize = 60;

/// Maximum length of a person or reference-item name.
pub const MAX_NAME_LEN: usize = 120;

// =============================================================================
// String Validators
// =============================================================================

fn require(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a registration request.
///
/// ## Rules
/// - name, loginHandle and password must be non-empty after trimming
/// - loginHandle at most 60 characters, name at most 120
///
/// ## Example
/// ```rust
/// use revenda_core::types::RegisterRequest;
/// use revenda_core::validation::validate_registration;
///
/// let ok = RegisterRequest {
///     name: "Ana".into(),
///     login_handle: "ana".into(),
///     password: "secret".into(),
/// };
/// assert!(validate_registration(&ok).is_ok());
///
/// let missing = RegisterRequest { password: String::new(), ..ok };
/// assert!(validate_registration(&missing).is_err());
/// ```
pub fn validate_registration(req: &RegisterRequest) -> ValidationResult<()> {
    require("name", &req.name, MAX_NAME_LEN)?;
    require("loginHandle", &req.login_handle, MAX_HANDLE_LEN)?;

    // Passwords are not trimmed when hashed, only checked for presence
    if req.password.trim().is_empty() {
        return Err(ValidationError::required("password"));
    }

    Ok(())
}

/// Validates a reference item (category / channel) name.
pub fn validate_reference_name(name: &str) -> ValidationResult<()> {
    require("name", name, MAX_NAME_LEN)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an intake quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_INTAKE_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_INTAKE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_INTAKE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price or cost. Zero is allowed, negatives are not, and
/// nothing above [`MAX_AMOUNT_CENTS`].
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    if amount.cents() > MAX_AMOUNT_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT_CENTS / 100,
        });
    }

    Ok(())
}

/// Validates an intake batch before any store access.
pub fn validate_intake(batch: &IntakeBatch) -> ValidationResult<()> {
    if batch.product_id.trim().is_empty() {
        return Err(ValidationError::required("productId"));
    }
    validate_quantity(batch.quantity)?;
    validate_amount("unitCost", batch.unit_cost)
}

/// Validates a sale before any store access.
pub fn validate_sale(sale: &SaleInput) -> ValidationResult<()> {
    validate_amount("salePrice", sale.sale_price)
}

// =============================================================================
// Unit Tests
// =============================================================================
