//! # Stick Inventory Model
//!
//! Raw moulding is sold in fixed-length factory sticks at a length price,
//! or cut to size at a premium chop price. This module builds the three
//! purchasing options for a footage; the optimizer picks between them.
//!
//! ## Options for 12 ft of a 9.5 ft stick ($4.00 length, $6.50 chop)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  LENGTH  ▕█████████▏▕██▒▒▒▒▒▒▒▏  2 sticks, 19 ft, 7 ft waste   $76.00   │
//! │  CHOP    ▕████████████▏          12 ft cut to size, no waste   $78.00   │
//! │  MIXED   ▕█████████▏▕██▏         1 stick + 2.5 ft chop         $54.25   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stick counts use a 1e-9 tolerance so that `19.0 / 9.5` is exactly two
//! sticks even when float division lands a hair above or below.

use tracing::warn;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

/// Factory stick length used when a catalog entry does not specify one.
pub const DEFAULT_STICK_LENGTH_FEET: f64 = 9.5;

/// Tolerance, in sticks, applied before rounding stick counts.
pub const STICK_TOLERANCE: f64 = 1e-9;

// =============================================================================
// Stick Spec
// =============================================================================

/// Length and prices of one moulding profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickSpec {
    stick_length_feet: f64,
    length_cost_per_foot: f64,
    chop_cost_per_foot: f64,
}

impl StickSpec {
    /// Validates and builds a stick spec.
    ///
    /// ## Errors
    /// `InvalidConfiguration` when the length is not positive or a cost is
    /// negative or not finite.
    ///
    /// A chop price below the length price is accepted with a warning.
    pub fn new(
        stick_length_feet: f64,
        length_cost_per_foot: f64,
        chop_cost_per_foot: f64,
    ) -> CoreResult<Self> {
        if !stick_length_feet.is_finite() || stick_length_feet <= 0.0 {
            return Err(CoreError::config(format!(
                "stick length must be a positive number of feet, got {}",
                stick_length_feet
            )));
        }
        for (name, cost) in [
            ("length cost per foot", length_cost_per_foot),
            ("chop cost per foot", chop_cost_per_foot),
        ] {
            if !cost.is_finite() || cost < 0.0 {
                return Err(CoreError::config(format!(
                    "{} must not be negative, got {}",
                    name, cost
                )));
            }
        }

        if chop_cost_per_foot < length_cost_per_foot {
            warn!(
                length_cost_per_foot,
                chop_cost_per_foot, "Chop price is below length price"
            );
        }

        Ok(StickSpec {
            stick_length_feet,
            length_cost_per_foot,
            chop_cost_per_foot,
        })
    }

    pub fn stick_length_feet(&self) -> f64 {
        self.stick_length_feet
    }

    pub fn length_cost_per_foot(&self) -> f64 {
        self.length_cost_per_foot
    }

    pub fn chop_cost_per_foot(&self) -> f64 {
        self.chop_cost_per_foot
    }

    /// Whole sticks needed to cover `footage` (ceil, at least one).
    ///
    /// The tolerance only absorbs division noise at an exact multiple; the
    /// returned sticks always reach `footage`.
    pub fn sticks_covering(&self, footage: f64) -> u32 {
        let mut sticks = (footage / self.stick_length_feet - STICK_TOLERANCE)
            .ceil()
            .max(1.0);
        if sticks * self.stick_length_feet < footage {
            sticks += 1.0;
        }
        sticks as u32
    }

    /// Whole sticks that fit inside `footage` (floor).
    pub fn sticks_within(&self, footage: f64) -> u32 {
        let sticks = (footage / self.stick_length_feet + STICK_TOLERANCE).floor();
        sticks.max(0.0) as u32
    }

    // =========================================================================
    // Options
    // =========================================================================

    /// Buy whole sticks only.
    pub fn length_option(&self, footage: f64) -> LengthOption {
        let sticks_needed = self.sticks_covering(footage);
        let total_footage = f64::from(sticks_needed) * self.stick_length_feet;
        let waste_footage = total_footage - footage;
        let total_cost = total_footage * self.length_cost_per_foot;

        LengthOption {
            sticks_needed,
            total_footage,
            waste_footage,
            total_cost,
            description: format!(
                "{} × {} ft stick{} ({} ft) at {}/ft",
                sticks_needed,
                feet(self.stick_length_feet),
                plural(sticks_needed),
                feet(total_footage),
                dollars(self.length_cost_per_foot)
            ),
        }
    }

    /// Buy exactly `footage`, cut by the vendor.
    pub fn chop_option(&self, footage: f64) -> ChopOption {
        ChopOption {
            footage,
            waste_footage: 0.0,
            total_cost: footage * self.chop_cost_per_foot,
            description: format!(
                "{} ft chop at {}/ft",
                feet(footage),
                dollars(self.chop_cost_per_foot)
            ),
        }
    }

    /// Whole sticks plus a chop for the remainder.
    ///
    /// `None` when no whole stick fits, or when the remainder is shorter
    /// than `min_chop_remainder_feet` (an exact multiple always is).
    pub fn mixed_option(&self, footage: f64, min_chop_remainder_feet: f64) -> Option<MixedOption> {
        let full_sticks = self.sticks_within(footage);
        if full_sticks == 0 {
            return None;
        }

        let stick_footage = f64::from(full_sticks) * self.stick_length_feet;
        let chop_footage = (footage - stick_footage).max(0.0);
        if chop_footage < min_chop_remainder_feet
            || chop_footage <= STICK_TOLERANCE * self.stick_length_feet
        {
            return None;
        }

        let total_cost =
            stick_footage * self.length_cost_per_foot + chop_footage * self.chop_cost_per_foot;

        Some(MixedOption {
            full_sticks,
            stick_footage,
            chop_footage,
            waste_footage: 0.0,
            total_cost,
            description: format!(
                "{} × {} ft stick{} + {} ft chop",
                full_sticks,
                feet(self.stick_length_feet),
                plural(full_sticks),
                feet(chop_footage)
            ),
        })
    }
}

// =============================================================================
// Option Types
// =============================================================================

/// Whole sticks only. Costs are unrounded dollars.
#[derive(Debug, Clone, PartialEq)]
pub struct LengthOption {
    pub sticks_needed: u32,
    pub total_footage: f64,
    pub waste_footage: f64,
    pub total_cost: f64,
    pub description: String,
}

/// Cut to size by the vendor; no waste.
#[derive(Debug, Clone, PartialEq)]
pub struct ChopOption {
    pub footage: f64,
    pub waste_footage: f64,
    pub total_cost: f64,
    pub description: String,
}

/// Whole sticks plus a chop remainder; no waste.
#[derive(Debug, Clone, PartialEq)]
pub struct MixedOption {
    pub full_sticks: u32,
    pub stick_footage: f64,
    pub chop_footage: f64,
    pub waste_footage: f64,
    pub total_cost: f64,
    pub description: String,
}

// =============================================================================
// Formatting Helpers
// =============================================================================

/// `9.5`, `19`, `2.25`: at most two decimals, trailing zeros dropped.
pub(crate) fn feet(value: f64) -> String {
    let text = format!("{:.2}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub(crate) fn dollars(value: f64) -> String {
    Money::from_dollars(value).unwrap_or_default().to_string()
}

fn plural(count: u32) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
