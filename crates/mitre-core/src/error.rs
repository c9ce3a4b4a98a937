//! # Error Types
//!
//! Domain-specific error types for mitre-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mitre-core errors (this file)                                         │
//! │  ├── CoreError                                                         │
//! │  │   ├── InvalidInput          - caller sent a bad number / field      │
//! │  │   ├── InvalidConfiguration  - bracket table or stick spec is broken │
//! │  │   └── LookupNotFound        - unknown frame / mat / glass id        │
//! │  └── ValidationError           - field-level detail for InvalidInput   │
//! │                                                                         │
//! │  pricing-api errors (app crate)                                        │
//! │  └── ApiError                  - what the web layer sees (serialized)  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → HTTP response          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "Mixed option not applicable" is deliberately absent from this file: it is
//! an `Option::None`, never an error.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors returned by every fallible operation in the core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Missing, non-positive or non-finite required numeric input.
    ///
    /// ## When This Occurs
    /// - `footage_needed <= 0` handed to the optimizer
    /// - artwork width/height of zero
    /// - a wholesale cost of zero reaching the bracket calculator
    /// - an intermediate result that turned into NaN/infinity
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// Malformed bracket table, stick spec or other configuration.
    ///
    /// ## When This Occurs
    /// - brackets that overlap, leave a gap or are not open-ended
    /// - a bracket boundary that would make the retail price drop
    /// - `stick_length_feet <= 0` or a negative per-foot cost
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Unknown material identifier.
    #[error("{entity} not found: {id}")]
    LookupNotFound { entity: String, id: String },
}

impl CoreError {
    /// Shorthand for an [`CoreError::InvalidConfiguration`] with a formatted message.
    pub fn config(message: impl Into<String>) -> Self {
        CoreError::InvalidConfiguration(message.into())
    }

    /// Shorthand for a [`CoreError::LookupNotFound`].
    pub fn not_found(entity: &str, id: &str) -> Self {
        CoreError::LookupNotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These describe exactly which field was wrong so the web layer can
/// highlight it. They always surface wrapped in [`CoreError::InvalidInput`].
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly greater than zero.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Invalid format (e.g., identifier with spaces).
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
