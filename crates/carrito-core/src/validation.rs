//! # Validation Rules
//!
//! Input validation used at the edges of the module, before any storage
//! operation runs. One function per rule, each returning a typed
//! [`ValidationError`].

use crate::error::ValidationError;

/// Validates an item quantity: must be a positive integer.
///
/// Enforced before every cart add; the schema backs it with a CHECK
/// constraint but callers get a typed error instead of a constraint
/// violation.
pub fn validate_quantity(quantity: i64) -> Result<(), ValidationError> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity",
            value: quantity,
        });
    }
    Ok(())
}

/// Validates a unit price in cents: must not be negative.
pub fn validate_unit_price(cents: i64) -> Result<(), ValidationError> {
    if cents < 0 {
        return Err(ValidationError::NegativeAmount {
            field: "unit_price",
            cents,
        });
    }
    Ok(())
}

/// Validates a scanned register token before lookup.
///
/// Tokens arrive from the stabilizer or from manual entry; both paths may
/// produce surrounding whitespace. Returns the trimmed token.
pub fn validate_qr_token(token: &str) -> Result<&str, ValidationError> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field: "qr_token" });
    }
    Ok(trimmed)
}

/// Validates a scanned product barcode before lookup. Returns the trimmed
/// code.
pub fn validate_barcode(code: &str) -> Result<&str, ValidationError> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field: "barcode" });
    }
    Ok(trimmed)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_must_be_positive() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert_eq!(
            validate_quantity(0),
            Err(ValidationError::MustBePositive {
                field: "quantity",
                value: 0
            })
        );
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn unit_price_rejects_negative() {
        assert!(validate_unit_price(0).is_ok());
        assert!(validate_unit_price(150).is_ok());
        assert!(validate_unit_price(-1).is_err());
    }

    #[test]
    fn tokens_are_trimmed() {
        assert_eq!(
            validate_qr_token("  CAJA1-SUPER-TOKEN-ABC123XYZ789  ").unwrap(),
            "CAJA1-SUPER-TOKEN-ABC123XYZ789"
        );
        assert!(validate_qr_token("   ").is_err());
    }

    #[test]
    fn barcodes_keep_legacy_non_numeric_values() {
        assert_eq!(validate_barcode(" ABC-001 ").unwrap(), "ABC-001");
        assert!(validate_barcode("").is_err());
    }
}
