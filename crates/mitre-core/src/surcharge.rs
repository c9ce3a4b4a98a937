//! # Size Surcharge Evaluator
//!
//! Flat surcharge for oversized artwork.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Tiers are checked highest-first; the FIRST match wins (not summed).    │
//! │                                                                         │
//! │    > 40 × 60  → $75                                                     │
//! │    > 32 × 40  → $35                                                     │
//! │    otherwise  → $0                                                      │
//! │                                                                         │
//! │  36×38 art: short 36 > 32 → $35                                         │
//! │  30×64 art: long 64 > 60  → $75 (instead of, not on top of, $35)        │
//! │  60×30 art: same as 30×60; orientation does not matter                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::validation::require_positive;

/// Artwork larger than `width × height` (in either dimension) pays `amount`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurchargeTier {
    pub width: f64,
    pub height: f64,
    pub amount: f64,
}

impl SurchargeTier {
    /// True when either side of the artwork exceeds the matching side of the tier.
    fn is_exceeded_by(&self, width: f64, height: f64) -> bool {
        let (short, long) = ordered(width, height);
        let (tier_short, tier_long) = ordered(self.width, self.height);
        short > tier_short || long > tier_long
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Validated tiers, ordered highest amount first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SurchargeSchedule {
    tiers: Vec<SurchargeTier>,
}

impl SurchargeSchedule {
    pub fn new(mut tiers: Vec<SurchargeTier>) -> CoreResult<Self> {
        for tier in &tiers {
            let valid_dims = tier.width.is_finite()
                && tier.height.is_finite()
                && tier.width > 0.0
                && tier.height > 0.0;
            if !valid_dims {
                return Err(CoreError::config(format!(
                    "size surcharge tier {}x{} must have positive dimensions",
                    tier.width, tier.height
                )));
            }
            if !tier.amount.is_finite() || tier.amount < 0.0 {
                return Err(CoreError::config(format!(
                    "size surcharge for {}x{} must not be negative",
                    tier.width, tier.height
                )));
            }
        }

        tiers.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        Ok(SurchargeSchedule { tiers })
    }

    pub fn tiers(&self) -> &[SurchargeTier] {
        &self.tiers
    }

    /// The single tier that applies, if any.
    pub fn matching_tier(&self, width: f64, height: f64) -> Option<&SurchargeTier> {
        self.tiers.iter().find(|t| t.is_exceeded_by(width, height))
    }

    /// Surcharge for artwork of `width × height` inches.
    pub fn surcharge_for(&self, width: f64, height: f64) -> CoreResult<f64> {
        let width = require_positive("artwork_width", width)?;
        let height = require_positive("artwork_height", height)?;
        Ok(self
            .matching_tier(width, height)
            .map_or(0.0, |tier| tier.amount))
    }
}

/// Default tiers: > 40×60 → $75, > 32×40 → $35.
pub fn default_surcharge_tiers() -> Vec<SurchargeTier> {
    vec![
        SurchargeTier {
            width: 32.0,
            height: 40.0,
            amount: 35.0,
        },
        SurchargeTier {
            width: 40.0,
            height: 60.0,
            amount: 75.0,
        },
    ]
}
