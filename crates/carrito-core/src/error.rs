//! # Error Types
//!
//! Domain-specific error types for carrito-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  carrito-core errors (this file)                                        │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  carrito-db errors (separate crate)                                     │
//! │  ├── DbError          - Storage operation failures                      │
//! │  └── CheckoutError    - Checkout-specific outcomes (EmptyCart, ...)     │
//! │                                                                         │
//! │  carrito-scan errors (separate crate)                                   │
//! │  └── ScanError        - Frame source failures                           │
//! │                                                                         │
//! │  Catalog misses (unknown barcode, unknown token) are not errors here:   │
//! │  lookups return Option and the presentation layer prompts for a         │
//! │  re-scan. The presentation layer also owns all user-facing messages.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field name, offending value)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors, raised before any storage operation runs.
///
/// Every rule in [`crate::validation`] returns one of these; `carrito-db`
/// wraps them as `DbError::InvalidInput` so callers get a typed rejection
/// instead of a constraint violation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is missing or blank.
    #[error("{field} is required")]
    Required { field: &'static str },

    /// A count that must be a positive integer was zero or negative.
    #[error("{field} must be positive, got {value}")]
    MustBePositive { field: &'static str, value: i64 },

    /// A monetary amount that must not be negative was negative.
    #[error("{field} must not be negative, got {cents} cents")]
    NegativeAmount { field: &'static str, cents: i64 },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_field_and_value() {
        let err = ValidationError::MustBePositive {
            field: "quantity",
            value: 0,
        };
        assert_eq!(err.to_string(), "quantity must be positive, got 0");

        let err = ValidationError::NegativeAmount {
            field: "unit_price",
            cents: -150,
        };
        assert_eq!(
            err.to_string(),
            "unit_price must not be negative, got -150 cents"
        );

        let err = ValidationError::Required { field: "qr_token" };
        assert_eq!(err.to_string(), "qr_token is required");
    }
}
