//! # Order Pricing Aggregator
//!
//! Sums priced components, labor, surcharges and services into
//! subtotal / tax / total.
//!
//! ## Rounding Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  components (f64, unrounded) ──► Σ + labor = subtotal (f64)             │
//! │                                      │                                  │
//! │                                      ├─► tax   = subtotal × rate (f64)  │
//! │                                      └─► total = subtotal + tax (f64)   │
//! │                                                                         │
//! │  rounded() ─► Money for every breakdown line, subtotal, tax, total     │
//! │               each rounded ONCE from its own unrounded value           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::{round_to_money, Money};
use crate::types::{MaterialClass, TaxRate};
use crate::validation::{require_finite, require_non_negative};

// =============================================================================
// Components
// =============================================================================

/// What a priced line represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Frame,
    Mat,
    Glass,
    Backing,
    Labor,
    SizeSurcharge,
    SpecialService,
    Misc,
}

impl From<MaterialClass> for ComponentKind {
    fn from(class: MaterialClass) -> Self {
        match class {
            MaterialClass::Frame => ComponentKind::Frame,
            MaterialClass::Mat => ComponentKind::Mat,
            MaterialClass::Glass => ComponentKind::Glass,
            MaterialClass::Backing => ComponentKind::Backing,
        }
    }
}

/// One unrounded line of an order.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceComponent {
    pub kind: ComponentKind,
    pub label: String,
    pub amount: f64,
}

impl PriceComponent {
    pub fn new(kind: ComponentKind, label: impl Into<String>, amount: f64) -> Self {
        PriceComponent {
            kind,
            label: label.into(),
            amount,
        }
    }

    /// A priced material line labelled with its class.
    pub fn material(class: MaterialClass, amount: f64) -> Self {
        PriceComponent::new(class.into(), class.to_string(), amount)
    }

    pub fn size_surcharge(amount: f64) -> Self {
        PriceComponent::new(ComponentKind::SizeSurcharge, "size surcharge", amount)
    }

    pub fn special_service(label: impl Into<String>, amount: f64) -> Self {
        PriceComponent::new(ComponentKind::SpecialService, label, amount)
    }

    pub fn misc(label: impl Into<String>, amount: f64) -> Self {
        PriceComponent::new(ComponentKind::Misc, label, amount)
    }
}

// =============================================================================
// Order Quote
// =============================================================================

/// Unrounded result of [`price_order`].
#[derive(Debug, Clone, PartialEq)]
pub struct OrderQuote {
    lines: Vec<PriceComponent>,
    tax_rate: TaxRate,
    subtotal: f64,
    tax: f64,
    total: f64,
}

impl OrderQuote {
    /// All lines including the labor line, in input order (labor last).
    pub fn lines(&self) -> &[PriceComponent] {
        &self.lines
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    pub fn subtotal(&self) -> f64 {
        self.subtotal
    }

    pub fn tax(&self) -> f64 {
        self.tax
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Unrounded sum of every line of `kind`.
    pub fn amount_of(&self, kind: ComponentKind) -> f64 {
        self.lines
            .iter()
            .filter(|line| line.kind == kind)
            .map(|line| line.amount)
            .sum()
    }

    /// Unrounded sum of the four material classes.
    pub fn material_total(&self) -> f64 {
        MaterialClass::ALL
            .iter()
            .map(|class| self.amount_of((*class).into()))
            .sum()
    }

    /// Rounds every displayed value, each from its own unrounded amount.
    pub fn rounded(&self) -> CoreResult<RoundedQuote> {
        let breakdown = self
            .lines
            .iter()
            .map(|line| {
                Ok(BreakdownLine {
                    kind: line.kind,
                    label: line.label.clone(),
                    amount: round_to_money(&line.label, line.amount)?,
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(RoundedQuote {
            breakdown,
            subtotal: round_to_money("subtotal", self.subtotal)?,
            tax: round_to_money("tax", self.tax)?,
            total: round_to_money("total", self.total)?,
        })
    }
}

/// A displayed breakdown line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownLine {
    pub kind: ComponentKind,
    pub label: String,
    #[ts(type = "number")]
    pub amount: Money,
}

/// Displayed totals.
///
/// `subtotal + tax` may differ from `total` by a cent: each is rounded from
/// its own exact value rather than from other rounded values.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundedQuote {
    pub breakdown: Vec<BreakdownLine>,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

// =============================================================================
// Aggregation
// =============================================================================

/// Prices an order.
///
/// `subtotal = Σ components + labor_flat_fee`, `tax = subtotal × rate`,
/// `total = subtotal + tax`.
///
/// ## Errors
/// `InvalidInput` when any amount or the labor fee is negative or not finite.
///
/// ## Example
/// ```rust
/// use mitre_core::pricing::{price_order, PriceComponent};
/// use mitre_core::types::{MaterialClass, TaxRate};
///
/// let quote = price_order(
///     &[PriceComponent::material(MaterialClass::Frame, 80.0)],
///     25.0,
///     TaxRate::from_bps(1000),
/// ).unwrap();
///
/// assert_eq!(quote.subtotal(), 105.0);
/// assert!((quote.tax() - 10.5).abs() < 1e-9);
/// assert!((quote.total() - 115.5).abs() < 1e-9);
/// ```
pub fn price_order(
    components: &[PriceComponent],
    labor_flat_fee: f64,
    tax_rate: TaxRate,
) -> CoreResult<OrderQuote> {
    let labor = require_non_negative("labor", labor_flat_fee)?;

    let mut lines = Vec::with_capacity(components.len() + 1);
    for component in components {
        require_non_negative(&component.label, component.amount)?;
        lines.push(component.clone());
    }
    lines.push(PriceComponent::new(ComponentKind::Labor, "labor", labor));

    let subtotal = require_finite("subtotal", lines.iter().map(|l| l.amount).sum())?;
    let tax = require_finite("tax", subtotal * tax_rate.fraction())?;
    let total = require_finite("total", subtotal + tax)?;

    Ok(OrderQuote {
        lines,
        tax_rate,
        subtotal,
        tax,
        total,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_subtotal_tax_total() {
        let components = vec![
            PriceComponent::material(MaterialClass::Frame, 88.0),
            PriceComponent::material(MaterialClass::Mat, 26.67),
            PriceComponent::size_surcharge(35.0),
            PriceComponent::special_service("shadowbox fitting", 20.0),
            PriceComponent::misc("hanging wire", 2.5),
        ];
        let quote = price_order(&components, 30.0, TaxRate::from_bps(825)).unwrap();

        let expected_subtotal = 88.0 + 26.67 + 35.0 + 20.0 + 2.5 + 30.0;
        assert!((quote.subtotal() - expected_subtotal).abs() < 1e-9);
        assert_eq!(quote.tax(), quote.subtotal() * 0.0825);
        assert_eq!(quote.total(), quote.subtotal() + quote.tax());
        assert_eq!(quote.lines().len(), 6);
        assert_eq!(quote.lines()[5].kind, ComponentKind::Labor);
    }

    #[test]
    fn test_frame_plus_labor_only() {
        let quote = price_order(
            &[PriceComponent::material(MaterialClass::Frame, 61.6)],
            25.0,
            TaxRate::from_bps(700),
        )
        .unwrap();

        assert_eq!(quote.subtotal(), 61.6 + 25.0);
        assert_eq!(quote.tax(), quote.subtotal() * TaxRate::from_bps(700).fraction());
        assert_eq!(quote.material_total(), 61.6);
        assert_eq!(quote.amount_of(ComponentKind::Mat), 0.0);
    }

    #[test]
    fn test_rounds_only_at_display() {
        // Three lines of $0.333 each: rounding each gives $0.99,
        // the subtotal is rounded from the exact $0.999 → $1.00.
        let components = vec![
            PriceComponent::misc("a", 0.333),
            PriceComponent::misc("b", 0.333),
            PriceComponent::misc("c", 0.333),
        ];
        let quote = price_order(&components, 0.0, TaxRate::zero()).unwrap();
        let rounded = quote.rounded().unwrap();

        let line_sum: i64 = rounded.breakdown.iter().map(|l| l.amount.cents()).sum();
        assert_eq!(line_sum, 99);
        assert_eq!(rounded.subtotal.cents(), 100);
        assert_eq!(rounded.total.cents(), 100);
    }

    #[test]
    fn test_rejects_negative_amounts() {
        assert!(matches!(
            price_order(&[], -1.0, TaxRate::zero()),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            price_order(&[PriceComponent::misc("credit", -5.0)], 0.0, TaxRate::zero()),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            price_order(&[PriceComponent::misc("nan", f64::NAN)], 0.0, TaxRate::zero()),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_breakdown_serializes_camel_case() {
        let line = BreakdownLine {
            kind: ComponentKind::SizeSurcharge,
            label: "size surcharge".to_string(),
            amount: Money::from_cents(3500),
        };
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["kind"], "size_surcharge");
        assert_eq!(json["amount"], 35.0);
    }
}
