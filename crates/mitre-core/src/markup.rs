//! # Bracket Markup Table
//!
//! Converts a wholesale unit cost into a retail unit price using a
//! non-linear, bracket-based markup.
//!
//! ## How a Lookup Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Frame brackets (default)                                               │
//! │                                                                         │
//! │   wholesale $/ft   0 ──────── 4 ──────────── 10 ──────────────► ∞      │
//! │   rule               × 3.0       + $8.00         × 1.8                  │
//! │                                                                         │
//! │   $2.50/ft  → bracket [0, 4)  → 2.50 × 3.0 = $7.50/ft                   │
//! │   $6.00/ft  → bracket [4, 10) → 6.00 + 8.0 = $14.00/ft                  │
//! │   $40.0/ft  → open-ended      → 40.0 × 1.8 = $72.00/ft                  │
//! │                                                                         │
//! │   Boundaries: [min, max); a cost equal to `max` belongs to the next    │
//! │   bracket. At 4.00: ×3.0 gives 12.00, +8.00 gives 12.00 → no drop.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Monotonicity
//! Every rule is increasing on its own, so the whole curve is
//! non-decreasing iff no boundary makes it step DOWN. [`BracketTable::new`]
//! checks exactly that and rejects the table otherwise; a table that made a
//! $4.00 moulding cheaper than a $3.99 one would never reach production.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::MaterialClass;
use crate::validation::require_positive;

/// Slack allowed when comparing bracket boundaries and boundary prices.
const BOUNDARY_EPSILON: f64 = 1e-9;

// =============================================================================
// Markup Rule
// =============================================================================

/// How a bracket turns wholesale into retail.
///
/// ## TOML
/// ```toml
/// rule = { multiplier = 3.0 }   # retail = wholesale × 3.0
/// rule = { additive = 8.0 }     # retail = wholesale + 8.00
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkupRule {
    /// retail = wholesale × factor
    Multiplier(f64),
    /// retail = wholesale + flat addend
    Additive(f64),
}

impl MarkupRule {
    /// Applies the rule to a unit cost.
    #[inline]
    pub fn apply(&self, wholesale: f64) -> f64 {
        match *self {
            MarkupRule::Multiplier(factor) => wholesale * factor,
            MarkupRule::Additive(addend) => wholesale + addend,
        }
    }

    fn validate(&self, class: MaterialClass) -> CoreResult<()> {
        match *self {
            MarkupRule::Multiplier(factor) if !factor.is_finite() || factor <= 0.0 => {
                Err(CoreError::config(format!(
                    "{} markup multiplier must be a positive number, got {}",
                    class, factor
                )))
            }
            MarkupRule::Additive(addend) if !addend.is_finite() || addend < 0.0 => {
                Err(CoreError::config(format!(
                    "{} markup addend must not be negative, got {}",
                    class, addend
                )))
            }
            _ => Ok(()),
        }
    }
}

// =============================================================================
// Markup Bracket
// =============================================================================

/// One wholesale-cost range and its rule.
///
/// `max_cost = None` marks the open-ended final bracket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkupBracket {
    pub min_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cost: Option<f64>,
    pub rule: MarkupRule,
}

impl MarkupBracket {
    /// A closed bracket `[min_cost, max_cost)`.
    pub const fn closed(min_cost: f64, max_cost: f64, rule: MarkupRule) -> Self {
        MarkupBracket {
            min_cost,
            max_cost: Some(max_cost),
            rule,
        }
    }

    /// The open-ended bracket `[min_cost, ∞)`.
    pub const fn open(min_cost: f64, rule: MarkupRule) -> Self {
        MarkupBracket {
            min_cost,
            max_cost: None,
            rule,
        }
    }

    /// Returns true when `cost` falls inside `[min_cost, max_cost)`.
    pub fn contains(&self, cost: f64) -> bool {
        cost >= self.min_cost && self.max_cost.map_or(true, |max| cost < max)
    }
}

// =============================================================================
// Bracket Table
// =============================================================================

/// Validated brackets for one material class.
///
/// ## Invariants (checked by [`BracketTable::new`])
/// - at least one bracket, first starts at 0
/// - contiguous and non-overlapping: each `max_cost` equals the next `min_cost`
/// - only the last bracket is open-ended
/// - retail price never drops across a boundary
#[derive(Debug, Clone, PartialEq)]
pub struct BracketTable {
    class: MaterialClass,
    brackets: Vec<MarkupBracket>,
}

impl BracketTable {
    /// Validates and builds a table. Brackets may be given in any order.
    pub fn new(class: MaterialClass, mut brackets: Vec<MarkupBracket>) -> CoreResult<Self> {
        if brackets.is_empty() {
            return Err(CoreError::config(format!(
                "{} markup table has no brackets",
                class
            )));
        }

        if brackets
            .iter()
            .any(|b| !b.min_cost.is_finite() || b.max_cost.map_or(false, |m| !m.is_finite()))
        {
            return Err(CoreError::config(format!(
                "{} markup bracket bounds must be finite numbers",
                class
            )));
        }

        brackets.sort_by(|a, b| a.min_cost.total_cmp(&b.min_cost));

        if brackets[0].min_cost.abs() > BOUNDARY_EPSILON {
            return Err(CoreError::config(format!(
                "{} markup table must start at 0, starts at {}",
                class, brackets[0].min_cost
            )));
        }

        for bracket in &brackets {
            bracket.rule.validate(class)?;
        }

        for pair in brackets.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            let boundary = lower.max_cost.ok_or_else(|| {
                CoreError::config(format!(
                    "{} markup bracket starting at {} is open-ended but is not the last bracket",
                    class, lower.min_cost
                ))
            })?;

            if boundary <= lower.min_cost {
                return Err(CoreError::config(format!(
                    "{} markup bracket [{}, {}) is empty",
                    class, lower.min_cost, boundary
                )));
            }

            if (boundary - upper.min_cost).abs() > BOUNDARY_EPSILON {
                return Err(CoreError::config(format!(
                    "{} markup brackets are not contiguous: one ends at {}, next starts at {}",
                    class, boundary, upper.min_cost
                )));
            }

            let below = lower.rule.apply(boundary);
            let at = upper.rule.apply(boundary);
            if at + BOUNDARY_EPSILON < below {
                return Err(CoreError::config(format!(
                    "{} markup drops at wholesale {}: {:.4} below the boundary, {:.4} at it",
                    class, boundary, below, at
                )));
            }
        }

        if let Some(last) = brackets.last() {
            if let Some(max) = last.max_cost {
                return Err(CoreError::config(format!(
                    "{} markup table must end with an open-ended bracket, last ends at {}",
                    class, max
                )));
            }
        }

        Ok(BracketTable { class, brackets })
    }

    pub fn class(&self) -> MaterialClass {
        self.class
    }

    pub fn brackets(&self) -> &[MarkupBracket] {
        &self.brackets
    }

    /// Finds the bracket holding `cost`.
    ///
    /// Costs past every closed bracket land in the open-ended one, so this
    /// never fails for a non-negative cost.
    pub fn bracket_for(&self, cost: f64) -> &MarkupBracket {
        self.brackets
            .iter()
            .find(|b| b.contains(cost))
            .unwrap_or_else(|| &self.brackets[self.brackets.len() - 1])
    }

    /// Retail price of ONE unit (foot, square foot, united inch).
    ///
    /// ## Errors
    /// `InvalidInput` when the wholesale cost is zero, negative or not finite.
    pub fn retail_unit_price(&self, wholesale_unit_cost: f64) -> CoreResult<f64> {
        let cost = require_positive("wholesale_unit_cost", wholesale_unit_cost)?;
        Ok(self.bracket_for(cost).rule.apply(cost))
    }
}

// =============================================================================
// Markup Schedule
// =============================================================================

/// One validated table per material class.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupSchedule {
    frame: BracketTable,
    mat: BracketTable,
    glass: BracketTable,
    backing: BracketTable,
}

impl MarkupSchedule {
    pub fn new(
        frame: Vec<MarkupBracket>,
        mat: Vec<MarkupBracket>,
        glass: Vec<MarkupBracket>,
        backing: Vec<MarkupBracket>,
    ) -> CoreResult<Self> {
        Ok(MarkupSchedule {
            frame: BracketTable::new(MaterialClass::Frame, frame)?,
            mat: BracketTable::new(MaterialClass::Mat, mat)?,
            glass: BracketTable::new(MaterialClass::Glass, glass)?,
            backing: BracketTable::new(MaterialClass::Backing, backing)?,
        })
    }

    /// The table for a class.
    pub fn table(&self, class: MaterialClass) -> &BracketTable {
        match class {
            MaterialClass::Frame => &self.frame,
            MaterialClass::Mat => &self.mat,
            MaterialClass::Glass => &self.glass,
            MaterialClass::Backing => &self.backing,
        }
    }
}

// =============================================================================
// Default Tables
// =============================================================================

/// Default frame brackets (wholesale $ per linear foot).
pub fn default_frame_brackets() -> Vec<MarkupBracket> {
    vec![
        MarkupBracket::closed(0.0, 4.0, MarkupRule::Multiplier(3.0)),
        MarkupBracket::closed(4.0, 10.0, MarkupRule::Additive(8.0)),
        MarkupBracket::open(10.0, MarkupRule::Multiplier(1.8)),
    ]
}

/// Default mat brackets (wholesale $ per square foot).
pub fn default_mat_brackets() -> Vec<MarkupBracket> {
    vec![
        MarkupBracket::closed(0.0, 2.0, MarkupRule::Multiplier(4.0)),
        MarkupBracket::closed(2.0, 5.0, MarkupRule::Additive(6.0)),
        MarkupBracket::open(5.0, MarkupRule::Multiplier(2.2)),
    ]
}

/// Default glass brackets (wholesale $ per square foot).
pub fn default_glass_brackets() -> Vec<MarkupBracket> {
    vec![
        MarkupBracket::closed(0.0, 3.0, MarkupRule::Multiplier(3.5)),
        MarkupBracket::closed(3.0, 8.0, MarkupRule::Additive(7.5)),
        MarkupBracket::open(8.0, MarkupRule::Multiplier(2.0)),
    ]
}

/// Default backing brackets (wholesale $ per square foot).
pub fn default_backing_brackets() -> Vec<MarkupBracket> {
    vec![
        MarkupBracket::closed(0.0, 1.0, MarkupRule::Multiplier(4.0)),
        MarkupBracket::open(1.0, MarkupRule::Additive(3.0)),
    ]
}

// =============================================================================
// Unit Tests
// =============================================================================
