//! # Validation Module
//!
//! Input validation utilities shared by every calculator.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: pricing-api (Axum)                                           │
//! │  └── JSON shape / type checks (deserialization)                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: contract.rs                                                  │
//! │  └── loose DTO → tagged, strongly-typed request (uses THIS MODULE)     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: calculators                                                  │
//! │  └── re-check positivity / finiteness at each entry point              │
//! │                                                                         │
//! │  No NaN, infinity or negative length ever reaches the math.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mitre_core::validation::{require_positive, validate_quantity};
//!
//! assert_eq!(require_positive("footage_needed", 12.0).unwrap(), 12.0);
//! assert!(require_positive("footage_needed", 0.0).is_err());
//! assert!(validate_quantity(5).is_ok());
//! ```

use crate::error::ValidationError;
use crate::MAX_ORDER_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted material identifier.
const MAX_IDENTIFIER_LEN: usize = 64;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Rejects NaN and infinities.
pub fn require_finite(field: &str, value: f64) -> ValidationResult<f64> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    Ok(value)
}

/// Requires a finite value strictly greater than zero.
///
/// ## Example
/// ```rust
/// use mitre_core::validation::require_positive;
///
/// assert!(require_positive("artwork_width", 16.0).is_ok());
/// assert!(require_positive("artwork_width", -1.0).is_err());
/// assert!(require_positive("artwork_width", f64::NAN).is_err());
/// ```
pub fn require_positive(field: &str, value: f64) -> ValidationResult<f64> {
    let value = require_finite(field, value)?;
    if value <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(value)
}

/// Requires a finite value that is zero or greater.
///
/// Used for mat width (no mat = 0) and flat fees.
pub fn require_non_negative(field: &str, value: f64) -> ValidationResult<f64> {
    let value = require_finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(value)
}

/// Validates the number of identical frames in an order.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed MAX_ORDER_QUANTITY (999)
pub fn validate_quantity(qty: u32) -> ValidationResult<u32> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ORDER_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1.0,
            max: f64::from(MAX_ORDER_QUANTITY),
        });
    }

    Ok(qty)
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0.0,
            max: 10_000.0,
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a material identifier (frame id, vendor item number, mat id...).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 64 characters
/// - Letters, digits, `-`, `_`, `.` and `/` only
///
/// ## Returns
/// The trimmed identifier.
///
/// ## Example
/// ```rust
/// use mitre_core::validation::validate_identifier;
///
/// assert_eq!(validate_identifier("item_identifier", " LJ-2231 ").unwrap(), "LJ-2231");
/// assert!(validate_identifier("item_identifier", "").is_err());
/// assert!(validate_identifier("item_identifier", "has space").is_err());
/// ```
pub fn validate_identifier(field: &str, id: &str) -> ValidationResult<String> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if id.len() > MAX_IDENTIFIER_LEN {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("must be at most {} characters", MAX_IDENTIFIER_LEN),
        });
    }

    if !id
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '/'))
    {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only letters, numbers, '-', '_', '.' and '/'".to_string(),
        });
    }

    Ok(id.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================
