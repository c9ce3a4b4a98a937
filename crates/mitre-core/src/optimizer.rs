//! # Procurement Optimizer
//!
//! Chooses the cheapest way to buy the moulding an order needs.
//!
//! ## Flow
//! ```text
//! ┌──────────────────────┐    ┌──────────────────────┐
//! │ ByDimensions(geom)   │    │ ByFootage(feet)      │
//! │ frame_linear_feet()  │    │                      │
//! └──────────┬───────────┘    └──────────┬───────────┘
//!            └──────────────┬────────────┘
//!                           ▼
//!               footage_needed (> 0, validated)
//!                           │
//!         ┌─────────────────┼──────────────────┐
//!         ▼                 ▼                  ▼
//!    LengthOption      ChopOption      Option<MixedOption>
//!         └─────────────────┼──────────────────┘
//!                           ▼
//!            argmin cost, ties within one cent:
//!                 mixed > length > chop
//!                           │
//!                           ▼
//!             Recommendation {method, savings,
//!                             reason, alert?}
//! ```
//!
//! Both entry modes share one code path, so a frame quoted by dimensions and
//! the same footage entered by hand always produce the same plan.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;
use ts_rs::TS;

use crate::calculator::frame_linear_feet;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{round_to_money, Money};
use crate::stick::{dollars, feet, ChopOption, LengthOption, MixedOption, StickSpec};
use crate::types::OrderGeometry;
use crate::validation::require_positive;

/// Costs closer than this are treated as equal.
pub const TIE_EPSILON: f64 = 0.01;

/// Largest footage accepted for one moulding.
pub const MAX_FOOTAGE_FEET: f64 = 100_000.0;

/// Default waste-ratio alert threshold, in percent.
pub const DEFAULT_WASTE_ALERT_PERCENT: f64 = 25.0;

/// Default shortest remainder a vendor will chop, in feet.
pub const DEFAULT_MIN_CHOP_REMAINDER_FEET: f64 = 0.5;

// =============================================================================
// Policy
// =============================================================================

/// Tunables of the recommendation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcurementPolicy {
    waste_alert_ratio: f64,
    min_chop_remainder_feet: f64,
}

impl ProcurementPolicy {
    /// ## Errors
    /// `InvalidConfiguration` when the percentage is outside 0..=100 or the
    /// remainder is negative.
    pub fn new(waste_alert_percent: f64, min_chop_remainder_feet: f64) -> CoreResult<Self> {
        if !waste_alert_percent.is_finite() || !(0.0..=100.0).contains(&waste_alert_percent) {
            return Err(CoreError::config(format!(
                "waste alert percent must be between 0 and 100, got {}",
                waste_alert_percent
            )));
        }
        if !min_chop_remainder_feet.is_finite() || min_chop_remainder_feet < 0.0 {
            return Err(CoreError::config(format!(
                "minimum chop remainder must not be negative, got {}",
                min_chop_remainder_feet
            )));
        }
        Ok(ProcurementPolicy {
            waste_alert_ratio: waste_alert_percent / 100.0,
            min_chop_remainder_feet,
        })
    }

    pub fn waste_alert_ratio(&self) -> f64 {
        self.waste_alert_ratio
    }

    pub fn min_chop_remainder_feet(&self) -> f64 {
        self.min_chop_remainder_feet
    }
}

impl Default for ProcurementPolicy {
    fn default() -> Self {
        ProcurementPolicy {
            waste_alert_ratio: DEFAULT_WASTE_ALERT_PERCENT / 100.0,
            min_chop_remainder_feet: DEFAULT_MIN_CHOP_REMAINDER_FEET,
        }
    }
}

// =============================================================================
// Request
// =============================================================================

/// Where the footage comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FootageSource {
    /// Perimeter of artwork + mat, as the frame calculator computes it.
    ByDimensions(OrderGeometry),
    /// Footage supplied directly.
    ByFootage(f64),
}

impl FootageSource {
    /// Validated footage in feet.
    pub fn footage_needed(&self) -> CoreResult<f64> {
        let footage = match *self {
            FootageSource::ByDimensions(ref geometry) => frame_linear_feet(geometry),
            FootageSource::ByFootage(footage) => footage,
        };
        let footage = require_positive("footage_needed", footage)?;
        if footage > MAX_FOOTAGE_FEET {
            return Err(ValidationError::OutOfRange {
                field: "footage_needed".to_string(),
                min: 0.0,
                max: MAX_FOOTAGE_FEET,
            }
            .into());
        }
        Ok(footage)
    }
}

/// One moulding to buy.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcurementRequest {
    pub item_identifier: String,
    pub source: FootageSource,
    pub stick: StickSpec,
}

// =============================================================================
// Result
// =============================================================================

/// The purchasing strategy picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ProcurementMethod {
    Length,
    Chop,
    Mixed,
}

impl ProcurementMethod {
    /// Tie-break order, most preferred first.
    pub const PREFERENCE: [ProcurementMethod; 3] = [
        ProcurementMethod::Mixed,
        ProcurementMethod::Length,
        ProcurementMethod::Chop,
    ];
}

impl fmt::Display for ProcurementMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcurementMethod::Length => "length",
            ProcurementMethod::Chop => "chop",
            ProcurementMethod::Mixed => "mixed",
        };
        write!(f, "{}", name)
    }
}

/// Why one option won.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub method: ProcurementMethod,
    /// Unrounded dollars saved against the cheapest alternative, never negative.
    pub savings: f64,
    pub reason: String,
    pub alert: Option<String>,
}

/// All options for one moulding plus the recommendation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcurementPlan {
    pub item_identifier: String,
    pub footage_needed: f64,
    pub length: LengthOption,
    pub chop: ChopOption,
    pub mixed: Option<MixedOption>,
    pub recommendation: Recommendation,
}

impl ProcurementPlan {
    /// Cost of an option, `None` when it does not apply.
    pub fn cost_of(&self, method: ProcurementMethod) -> Option<f64> {
        match method {
            ProcurementMethod::Length => Some(self.length.total_cost),
            ProcurementMethod::Chop => Some(self.chop.total_cost),
            ProcurementMethod::Mixed => self.mixed.as_ref().map(|m| m.total_cost),
        }
    }

    /// Waste of an option, `None` when it does not apply.
    pub fn waste_of(&self, method: ProcurementMethod) -> Option<f64> {
        match method {
            ProcurementMethod::Length => Some(self.length.waste_footage),
            ProcurementMethod::Chop => Some(self.chop.waste_footage),
            ProcurementMethod::Mixed => self.mixed.as_ref().map(|m| m.waste_footage),
        }
    }
}

// =============================================================================
// Optimization
// =============================================================================

/// Builds every option for one moulding and recommends the cheapest.
///
/// ## Errors
/// `InvalidInput` when the footage is not positive, not finite or above
/// [`MAX_FOOTAGE_FEET`]. Stick specs are validated on construction.
///
/// ## Example
/// ```rust
/// use mitre_core::optimizer::*;
/// use mitre_core::stick::StickSpec;
///
/// let request = ProcurementRequest {
///     item_identifier: "MLD-2041".to_string(),
///     source: FootageSource::ByFootage(12.0),
///     stick: StickSpec::new(9.5, 4.00, 6.50).unwrap(),
/// };
/// let plan = optimize(&request, &ProcurementPolicy::default()).unwrap();
///
/// assert_eq!(plan.recommendation.method, ProcurementMethod::Mixed);
/// assert!((plan.recommendation.savings - 21.75).abs() < 1e-9);
/// ```
pub fn optimize(request: &ProcurementRequest, policy: &ProcurementPolicy) -> CoreResult<ProcurementPlan> {
    let footage = request.source.footage_needed()?;
    plan_for_footage(&request.item_identifier, footage, &request.stick, policy)
}

/// Optimizes several requests, buying each moulding once.
///
/// Footage of requests sharing an item identifier is summed before
/// optimizing. Plans come back ordered by item identifier.
///
/// ## Errors
/// - any error [`optimize`] would return for a single request
/// - `InvalidInput` when one identifier is given two different stick specs
pub fn optimize_batch(
    requests: &[ProcurementRequest],
    policy: &ProcurementPolicy,
) -> CoreResult<Vec<ProcurementPlan>> {
    let mut grouped: BTreeMap<&str, (f64, StickSpec)> = BTreeMap::new();

    for request in requests {
        let footage = request.source.footage_needed()?;
        match grouped.get_mut(request.item_identifier.as_str()) {
            Some((total, stick)) => {
                if *stick != request.stick {
                    return Err(ValidationError::InvalidFormat {
                        field: "item_identifier".to_string(),
                        reason: format!(
                            "{} appears with different stick specs",
                            request.item_identifier
                        ),
                    }
                    .into());
                }
                *total += footage;
            }
            None => {
                grouped.insert(&request.item_identifier, (footage, request.stick));
            }
        }
    }

    grouped
        .into_iter()
        .map(|(item, (footage, stick))| {
            let footage = FootageSource::ByFootage(footage).footage_needed()?;
            plan_for_footage(item, footage, &stick, policy)
        })
        .collect()
}

fn plan_for_footage(
    item_identifier: &str,
    footage: f64,
    stick: &StickSpec,
    policy: &ProcurementPolicy,
) -> CoreResult<ProcurementPlan> {
    let length = stick.length_option(footage);
    let chop = stick.chop_option(footage);
    let mixed = stick.mixed_option(footage, policy.min_chop_remainder_feet());

    let mut plan = ProcurementPlan {
        item_identifier: item_identifier.to_string(),
        footage_needed: footage,
        length,
        chop,
        mixed,
        recommendation: Recommendation {
            method: ProcurementMethod::Chop,
            savings: 0.0,
            reason: String::new(),
            alert: None,
        },
    };

    for method in ProcurementMethod::PREFERENCE {
        if let Some(cost) = plan.cost_of(method) {
            if !cost.is_finite() {
                return Err(ValidationError::NotFinite {
                    field: format!("{} cost", method),
                }
                .into());
            }
        }
    }

    plan.recommendation = recommend(&plan, policy);

    debug!(
        item = %plan.item_identifier,
        footage,
        method = %plan.recommendation.method,
        savings = plan.recommendation.savings,
        "Procurement recommendation"
    );

    Ok(plan)
}

fn recommend(plan: &ProcurementPlan, policy: &ProcurementPolicy) -> Recommendation {
    let applicable: Vec<(ProcurementMethod, f64)> = ProcurementMethod::PREFERENCE
        .iter()
        .filter_map(|method| plan.cost_of(*method).map(|cost| (*method, cost)))
        .collect();

    let cheapest = applicable
        .iter()
        .map(|(_, cost)| *cost)
        .fold(f64::INFINITY, f64::min);

    // PREFERENCE order makes the first near-cheapest option the tie winner.
    let (method, chosen_cost) = applicable
        .iter()
        .copied()
        .find(|(_, cost)| *cost - cheapest < TIE_EPSILON)
        .unwrap_or((ProcurementMethod::Chop, plan.chop.total_cost));

    let runner_up = applicable
        .iter()
        .copied()
        .filter(|(other, _)| *other != method)
        .min_by(|a, b| a.1.total_cmp(&b.1));

    let savings = runner_up.map_or(0.0, |(_, cost)| (cost - chosen_cost).max(0.0));

    Recommendation {
        method,
        savings,
        reason: reason_for(plan, method, savings, runner_up.map(|(m, _)| m)),
        alert: alert_for(plan, method, policy),
    }
}

fn reason_for(
    plan: &ProcurementPlan,
    method: ProcurementMethod,
    savings: f64,
    runner_up: Option<ProcurementMethod>,
) -> String {
    let versus = match runner_up {
        Some(other) if savings > 0.0 => format!("; saves {} versus {}", dollars(savings), other),
        Some(other) => format!("; same cost as {}", other),
        None => String::new(),
    };

    match method {
        ProcurementMethod::Mixed => {
            let full_sticks = plan.mixed.as_ref().map_or(0, |m| m.full_sticks);
            format!(
                "Combining {} full stick{} with a chop remainder avoids buying another stick{}",
                full_sticks,
                if full_sticks == 1 { "" } else { "s" },
                versus
            )
        }
        ProcurementMethod::Length if plan.length.waste_footage <= 0.0 => format!(
            "{} ft is an exact multiple of the stick length, so full sticks leave no waste{}",
            feet(plan.footage_needed),
            versus
        ),
        ProcurementMethod::Length => format!(
            "Full sticks are cheapest even with {} ft of waste{}",
            feet(plan.length.waste_footage),
            versus
        ),
        ProcurementMethod::Chop => format!(
            "Chop pricing avoids {} ft of stick waste{}",
            feet(plan.length.waste_footage),
            versus
        ),
    }
}

/// Waste alert for the chosen option. When chop wins, the alert instead
/// reports the remnant that buying full sticks would have left.
fn alert_for(plan: &ProcurementPlan, method: ProcurementMethod, policy: &ProcurementPolicy) -> Option<String> {
    let ratio = |waste: f64| waste / plan.footage_needed;
    let threshold = policy.waste_alert_ratio();

    let chosen_waste = plan.waste_of(method).unwrap_or(0.0);
    if ratio(chosen_waste) > threshold {
        return Some(format!(
            "{} ft of waste ({:.0}% of the footage needed) will be left as remnant",
            feet(chosen_waste),
            ratio(chosen_waste) * 100.0
        ));
    }

    let length_waste = plan.length.waste_footage;
    if method == ProcurementMethod::Chop && ratio(length_waste) > threshold {
        return Some(format!(
            "Buying full sticks would leave {} ft of waste ({:.0}% of the footage needed)",
            feet(length_waste),
            ratio(length_waste) * 100.0
        ));
    }

    None
}

/// Savings rounded to cents for display.
pub fn rounded_savings(recommendation: &Recommendation) -> CoreResult<Money> {
    round_to_money("savings", recommendation.savings)
}

// =============================================================================
// Unit Tests
// =============================================================================
