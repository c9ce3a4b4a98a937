//! # Unit Price Calculators
//!
//! Derive how much of each material an order needs, then price it through
//! the class's bracket table.
//!
//! ## Quantity Formulas
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FRAME (linear feet)                                                    │
//! │    2 × (width + height + 4 × mat) / 12                                  │
//! │    16×20 art, 2" mat → 2 × (16 + 20 + 8) / 12 = 7.333 ft                │
//! │                                                                         │
//! │  MAT / GLASS / BACKING (one sheet measure for all three)                │
//! │    outer = (width + 2·mat) × (height + 2·mat)                           │
//! │    SquareFeet   → outer_w × outer_h / 144       20×24 → 3.333 sq ft     │
//! │    UnitedInches → outer_w + outer_h             20×24 → 44 UI           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `retail = rule(wholesale_unit_cost) × quantity`, left unrounded; the
//! aggregator rounds once at the end.

use crate::error::{CoreResult, ValidationError};
use crate::markup::MarkupSchedule;
use crate::types::{MaterialClass, OrderGeometry, SheetMeasure};
use crate::validation::{require_finite, require_positive};

// =============================================================================
// Quantity Formulas
// =============================================================================

/// Linear feet of moulding for the frame around artwork + mat.
///
/// The procurement optimizer's "by dimensions" mode uses this same function,
/// so a quoted frame and its purchase plan always agree on footage.
pub fn frame_linear_feet(geometry: &OrderGeometry) -> f64 {
    2.0 * (geometry.artwork_width() + geometry.artwork_height() + 4.0 * geometry.mat_width())
        / 12.0
}

/// Quantity of a sheet material (mat, glass, backing) in the given measure.
pub fn sheet_quantity(geometry: &OrderGeometry, measure: SheetMeasure) -> f64 {
    match measure {
        SheetMeasure::SquareFeet => geometry.outer_width() * geometry.outer_height() / 144.0,
        SheetMeasure::UnitedInches => geometry.outer_width() + geometry.outer_height(),
    }
}

/// Quantity of `class` needed for `geometry`.
pub fn required_quantity(class: MaterialClass, geometry: &OrderGeometry, measure: SheetMeasure) -> f64 {
    match class {
        MaterialClass::Frame => frame_linear_feet(geometry),
        MaterialClass::Mat | MaterialClass::Glass | MaterialClass::Backing => {
            sheet_quantity(geometry, measure)
        }
    }
}

// =============================================================================
// Material Unit
// =============================================================================

/// A material line before pricing.
///
/// `required_quantity` is always derived from geometry; there is no
/// constructor that takes it from a caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialUnit {
    class: MaterialClass,
    wholesale_unit_cost: f64,
    required_quantity: f64,
}

impl MaterialUnit {
    /// Builds the unit for an order.
    pub fn for_order(
        class: MaterialClass,
        wholesale_unit_cost: f64,
        geometry: &OrderGeometry,
        measure: SheetMeasure,
    ) -> CoreResult<Self> {
        Ok(MaterialUnit {
            class,
            wholesale_unit_cost: require_positive("wholesale_unit_cost", wholesale_unit_cost)?,
            required_quantity: required_quantity(class, geometry, measure),
        })
    }

    pub fn class(&self) -> MaterialClass {
        self.class
    }

    pub fn wholesale_unit_cost(&self) -> f64 {
        self.wholesale_unit_cost
    }

    pub fn required_quantity(&self) -> f64 {
        self.required_quantity
    }

    /// Wholesale cost of the whole quantity (for the optional cost report).
    pub fn wholesale_total(&self) -> f64 {
        self.wholesale_unit_cost * self.required_quantity
    }
}

/// A priced material line (unrounded).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricedMaterial {
    pub unit: MaterialUnit,
    pub retail_unit_price: f64,
    pub retail_total: f64,
}

// =============================================================================
// Pricing
// =============================================================================

/// Retail price for `quantity` units of a class bought at `wholesale_unit_cost`.
///
/// ## Errors
/// - `InvalidInput` when cost or quantity is ≤ 0 or not finite
/// - `InvalidInput` if the product overflows to infinity
///
/// ## Example
/// ```rust
/// use mitre_core::calculator::price_for_unit;
/// use mitre_core::markup::*;
/// use mitre_core::types::MaterialClass;
///
/// let schedule = MarkupSchedule::new(
///     default_frame_brackets(),
///     default_mat_brackets(),
///     default_glass_brackets(),
///     default_backing_brackets(),
/// ).unwrap();
///
/// // $2.50/ft × 3.0 markup × 8 ft
/// let retail = price_for_unit(&schedule, MaterialClass::Frame, 2.5, 8.0).unwrap();
/// assert!((retail - 60.0).abs() < 1e-9);
/// ```
pub fn price_for_unit(
    schedule: &MarkupSchedule,
    class: MaterialClass,
    wholesale_unit_cost: f64,
    quantity: f64,
) -> CoreResult<f64> {
    let quantity = require_positive("quantity", quantity)?;
    let unit_price = schedule.table(class).retail_unit_price(wholesale_unit_cost)?;
    Ok(require_finite("retail_price", unit_price * quantity)?)
}

/// Prices a [`MaterialUnit`] and keeps the intermediate numbers.
pub fn price_material(schedule: &MarkupSchedule, unit: MaterialUnit) -> CoreResult<PricedMaterial> {
    if unit.required_quantity <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: format!("{} quantity", unit.class),
        }
        .into());
    }

    let retail_unit_price = schedule
        .table(unit.class)
        .retail_unit_price(unit.wholesale_unit_cost)?;
    let retail_total = price_for_unit(
        schedule,
        unit.class,
        unit.wholesale_unit_cost,
        unit.required_quantity,
    )?;

    Ok(PricedMaterial {
        unit,
        retail_unit_price,
        retail_total,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::markup::*;

    fn schedule() -> MarkupSchedule {
        MarkupSchedule::new(
            default_frame_brackets(),
            default_mat_brackets(),
            default_glass_brackets(),
            default_backing_brackets(),
        )
        .unwrap()
    }

    #[test]
    fn test_frame_linear_feet() {
        let g = OrderGeometry::new(16.0, 20.0, 2.0).unwrap();
        assert!((frame_linear_feet(&g) - 88.0 / 12.0).abs() < 1e-12);

        let no_mat = OrderGeometry::new(24.0, 36.0, 0.0).unwrap();
        assert!((frame_linear_feet(&no_mat) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_sheet_quantity_both_measures() {
        let g = OrderGeometry::new(16.0, 20.0, 2.0).unwrap();
        assert!((sheet_quantity(&g, SheetMeasure::SquareFeet) - 480.0 / 144.0).abs() < 1e-12);
        assert!((sheet_quantity(&g, SheetMeasure::UnitedInches) - 44.0).abs() < 1e-12);
    }

    #[test]
    fn test_sheet_classes_share_one_measure() {
        let g = OrderGeometry::new(11.0, 14.0, 1.5).unwrap();
        let mat = required_quantity(MaterialClass::Mat, &g, SheetMeasure::SquareFeet);
        let glass = required_quantity(MaterialClass::Glass, &g, SheetMeasure::SquareFeet);
        let backing = required_quantity(MaterialClass::Backing, &g, SheetMeasure::SquareFeet);
        assert_eq!(mat, glass);
        assert_eq!(glass, backing);
    }

    #[test]
    fn test_price_for_unit() {
        let s = schedule();
        // $6.00/ft → +$8.00 → $14.00/ft × 10 ft
        let retail = price_for_unit(&s, MaterialClass::Frame, 6.0, 10.0).unwrap();
        assert!((retail - 140.0).abs() < 1e-9);
    }

    #[test]
    fn test_price_for_unit_rejects_bad_input() {
        let s = schedule();
        assert!(matches!(
            price_for_unit(&s, MaterialClass::Mat, 0.0, 2.0),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            price_for_unit(&s, MaterialClass::Mat, 2.0, 0.0),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            price_for_unit(&s, MaterialClass::Mat, 2.0, -1.0),
            Err(CoreError::InvalidInput(_))
        ));
        assert!(matches!(
            price_for_unit(&s, MaterialClass::Mat, 1e300, 1e300),
            Err(CoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_price_material_keeps_intermediates() {
        let s = schedule();
        let g = OrderGeometry::new(16.0, 20.0, 2.0).unwrap();
        let unit = MaterialUnit::for_order(MaterialClass::Glass, 2.0, &g, SheetMeasure::SquareFeet)
            .unwrap();
        let priced = price_material(&s, unit).unwrap();

        assert!((priced.retail_unit_price - 7.0).abs() < 1e-9);
        assert!((priced.retail_total - 7.0 * 480.0 / 144.0).abs() < 1e-9);
        assert!((unit.wholesale_total() - 2.0 * 480.0 / 144.0).abs() < 1e-9);
    }
}
