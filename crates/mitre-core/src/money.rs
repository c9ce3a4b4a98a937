//! # Money Module
//!
//! Provides the `Money` type for DISPLAYED monetary values.
//!
//! ## Two Kinds of Amounts
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UNROUNDED (f64 dollars)              ROUNDED (Money, integer cents)    │
//! │  ───────────────────────              ─────────────────────────────     │
//! │  • bracket markup results             • breakdown line items            │
//! │  • per-foot × footage products        • subtotal / tax / total shown    │
//! │  • running subtotal, tax              • option costs in API responses   │
//! │                                                                         │
//! │  Rounding each small component before summing drifts:                  │
//! │    3 × $0.333 → 3 × $0.33 = $0.99  ❌                                    │
//! │    round(3 × $0.333) = $1.00       ✅                                    │
//! │                                                                         │
//! │  So the math stays in f64 and converts ONCE, at the boundary.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use mitre_core::money::Money;
//!
//! let price = Money::from_cents(5425); // $54.25
//! assert_eq!(price.to_string(), "$54.25");
//!
//! let rounded = Money::from_dollars(54.2549).unwrap();
//! assert_eq!(rounded.cents(), 5425);
//!
//! // NaN can never become Money
//! assert!(Money::from_dollars(f64::NAN).is_none());
//! ```
//!
//! ## Wire Format
//! Serialized as a decimal number of dollars (`54.25`), matching the
//! 2-decimal convention of the JSON contracts.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{CoreResult, ValidationError};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents, produced only by rounding an unrounded amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Rounds an unrounded dollar amount to the nearest cent.
    ///
    /// Halves round away from zero (`0.125 → 0.13`), the convention used on
    /// printed quotes. Returns `None` for NaN, infinities and amounts too
    /// large for i64 cents, so an invalid float can never be displayed.
    ///
    /// ## Example
    /// ```rust
    /// use mitre_core::money::Money;
    ///
    /// assert_eq!(Money::from_dollars(76.0).unwrap().cents(), 7600);
    /// assert_eq!(Money::from_dollars(0.125).unwrap().cents(), 13);
    /// assert_eq!(Money::from_dollars(-0.125).unwrap().cents(), -13);
    /// ```
    pub fn from_dollars(dollars: f64) -> Option<Self> {
        if !dollars.is_finite() {
            return None;
        }

        // Nudge by a tiny relative amount so representation error
        // (0.125 stored as 0.12499999...) does not flip a half-cent down.
        let scaled = dollars * 100.0;
        let nudged = scaled + scaled.signum() * scaled.abs() * 1e-12;
        let cents = nudged.round();

        if cents.abs() >= i64::MAX as f64 {
            return None;
        }

        Some(Money(cents as i64))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-dollar portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the value as decimal dollars (for serialization).
    #[inline]
    pub fn to_dollars(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }
}

/// Rounds an unrounded amount for display, naming the field on failure.
///
/// This is the single exit point from unrounded math: a NaN or infinite
/// amount becomes `InvalidInput` here instead of leaking to a caller.
pub fn round_to_money(field: &str, dollars: f64) -> CoreResult<Money> {
    Money::from_dollars(dollars).ok_or_else(|| {
        ValidationError::NotFinite {
            field: field.to_string(),
        }
        .into()
    })
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// Used inside recommendation reasons ("saves $21.75").
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_dollars())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dollars = f64::deserialize(deserializer)?;
        Money::from_dollars(dollars)
            .ok_or_else(|| D::Error::custom("monetary amount must be a finite number"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
