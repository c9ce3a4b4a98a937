//! # Pricing Engine
//!
//! The validated, immutable aggregate of every pricing table.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PricingConfig ──from_config()──► PricingEngine (read-only)             │
//! │                                                                         │
//! │   markup schedule   surcharge tiers   labor rates   tax rate            │
//! │   procurement policy   sheet measure   material catalog                 │
//! │                                                                         │
//! │  quote(QuoteRequest)         ──► Quote        (whole frame order)       │
//! │  optimize_frame(id, source)  ──► ProcurementPlan                        │
//! │  optimize_frames([...])      ──► Vec<ProcurementPlan>                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An engine is never mutated; reloading configuration builds a new one.

use tracing::debug;

use crate::calculator::{self, price_material, MaterialUnit, PricedMaterial};
use crate::catalog::{Frame, MaterialCatalog};
use crate::config::{LaborRates, PricingConfig};
use crate::error::{CoreError, CoreResult};
use crate::markup::MarkupSchedule;
use crate::optimizer::{self, FootageSource, ProcurementPlan, ProcurementPolicy, ProcurementRequest};
use crate::pricing::{price_order, OrderQuote, PriceComponent};
use crate::surcharge::SurchargeSchedule;
use crate::types::{MaterialClass, OrderGeometry, SheetMeasure, TaxRate};
use crate::validation::{validate_quantity, validate_tax_rate_bps};

// =============================================================================
// Quote Request / Result
// =============================================================================

/// A validated whole-order quote request.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub frame_id: Option<String>,
    pub mat_id: Option<String>,
    pub glass_id: Option<String>,
    pub backing_id: Option<String>,
    pub geometry: OrderGeometry,
    pub quantity: u32,
}

/// Wholesale cost of an order, per class, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WholesaleCosts {
    pub frame: f64,
    pub mat: f64,
    pub glass: f64,
    pub backing: f64,
}

impl WholesaleCosts {
    pub fn total(&self) -> f64 {
        self.frame + self.mat + self.glass + self.backing
    }

    fn add(&mut self, class: MaterialClass, amount: f64) {
        match class {
            MaterialClass::Frame => self.frame += amount,
            MaterialClass::Mat => self.mat += amount,
            MaterialClass::Glass => self.glass += amount,
            MaterialClass::Backing => self.backing += amount,
        }
    }
}

/// Result of [`PricingEngine::quote`].
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// Totals for the whole quantity.
    pub order: OrderQuote,
    pub quantity: u32,
    /// Per-piece priced materials (absent classes omitted).
    pub materials: Vec<PricedMaterial>,
    /// Wholesale costs for the whole quantity.
    pub wholesale: WholesaleCosts,
    pub labor_rates: LaborRates,
}

// =============================================================================
// Engine
// =============================================================================

#[derive(Debug, Clone)]
pub struct PricingEngine {
    markup: MarkupSchedule,
    surcharges: SurchargeSchedule,
    labor: LaborRates,
    tax_rate: TaxRate,
    policy: ProcurementPolicy,
    sheet_measure: SheetMeasure,
    catalog: MaterialCatalog,
}

impl PricingEngine {
    /// Validates every section of `config` and builds the engine.
    ///
    /// ## Errors
    /// `InvalidConfiguration` naming the first invalid section.
    pub fn from_config(config: PricingConfig) -> CoreResult<Self> {
        validate_tax_rate_bps(config.tax_rate_bps)
            .map_err(|e| CoreError::config(format!("tax_rate_bps: {}", e)))?;
        config.labor.validate()?;

        let engine = PricingEngine {
            markup: config.markup.build()?,
            surcharges: SurchargeSchedule::new(config.size_surcharges)?,
            labor: config.labor,
            tax_rate: TaxRate::from_bps(config.tax_rate_bps),
            policy: config.procurement.build()?,
            sheet_measure: config.sheet_measure,
            catalog: MaterialCatalog::new(config.catalog)?,
        };

        debug!(
            frames = engine.catalog.frames().len(),
            tax_bps = engine.tax_rate.bps(),
            sheet_measure = %engine.sheet_measure,
            "Pricing engine built"
        );

        Ok(engine)
    }

    pub fn markup(&self) -> &MarkupSchedule {
        &self.markup
    }

    pub fn surcharges(&self) -> &SurchargeSchedule {
        &self.surcharges
    }

    pub fn labor_rates(&self) -> &LaborRates {
        &self.labor
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    pub fn policy(&self) -> &ProcurementPolicy {
        &self.policy
    }

    pub fn sheet_measure(&self) -> SheetMeasure {
        self.sheet_measure
    }

    pub fn catalog(&self) -> &MaterialCatalog {
        &self.catalog
    }

    // =========================================================================
    // Pricing
    // =========================================================================

    /// Retail price of `quantity` units through this engine's brackets.
    pub fn price_for_unit(&self, class: MaterialClass, wholesale_unit_cost: f64, quantity: f64) -> CoreResult<f64> {
        calculator::price_for_unit(&self.markup, class, wholesale_unit_cost, quantity)
    }

    pub fn surcharge_for(&self, width: f64, height: f64) -> CoreResult<f64> {
        self.surcharges.surcharge_for(width, height)
    }

    /// Prices a whole frame order.
    ///
    /// Every per-piece amount (materials, labor, surcharge) is multiplied by
    /// the quantity before tax.
    ///
    /// ## Errors
    /// - `InvalidInput` for a bad quantity
    /// - `LookupNotFound` for an unknown material identifier
    pub fn quote(&self, request: &QuoteRequest) -> CoreResult<Quote> {
        let quantity = validate_quantity(request.quantity)?;
        let pieces = f64::from(quantity);
        let geometry = &request.geometry;

        let frame = self.catalog.frame(request.frame_id.as_deref())?;
        let mut selections: Vec<(MaterialClass, f64)> = Vec::with_capacity(4);
        if let Some(frame) = frame {
            selections.push((MaterialClass::Frame, frame.wholesale_cost_per_foot()));
        }
        for (class, id) in [
            (MaterialClass::Mat, &request.mat_id),
            (MaterialClass::Glass, &request.glass_id),
            (MaterialClass::Backing, &request.backing_id),
        ] {
            if let Some(sheet) = self.catalog.sheet(class, id.as_deref())? {
                selections.push((class, sheet.cost_per_unit()));
            }
        }

        let mut materials = Vec::with_capacity(selections.len());
        let mut wholesale = WholesaleCosts::default();
        let mut components = Vec::with_capacity(selections.len() + 1);
        for (class, cost) in selections {
            let unit = MaterialUnit::for_order(class, cost, geometry, self.sheet_measure)?;
            let priced = price_material(&self.markup, unit)?;
            wholesale.add(class, unit.wholesale_total() * pieces);
            components.push(PriceComponent::material(class, priced.retail_total * pieces));
            materials.push(priced);
        }

        let surcharge = self.surcharge_for(geometry.artwork_width(), geometry.artwork_height())?;
        if surcharge > 0.0 {
            components.push(PriceComponent::size_surcharge(surcharge * pieces));
        }

        let has_mat = materials.iter().any(|m| m.unit.class() == MaterialClass::Mat);
        let has_glass = materials.iter().any(|m| m.unit.class() == MaterialClass::Glass);
        let labor = self.labor.for_piece(has_mat, has_glass) * pieces;

        let order = price_order(&components, labor, self.tax_rate)?;

        debug!(
            frame = request.frame_id.as_deref().unwrap_or("none"),
            quantity,
            total = order.total(),
            "Order quoted"
        );

        Ok(Quote {
            order,
            quantity,
            materials,
            wholesale,
            labor_rates: self.labor,
        })
    }

    // =========================================================================
    // Procurement
    // =========================================================================

    fn procurement_request(&self, frame: &Frame, source: FootageSource) -> ProcurementRequest {
        ProcurementRequest {
            item_identifier: frame.item_number().to_string(),
            source,
            stick: *frame.stick(),
        }
    }

    /// Plans the purchase of a catalog frame's moulding.
    ///
    /// ## Errors
    /// - `LookupNotFound` for an unknown frame
    /// - `InvalidInput` for non-positive footage or dimensions
    pub fn optimize_frame(&self, frame_identifier: &str, source: FootageSource) -> CoreResult<ProcurementPlan> {
        let frame = self.catalog.require_frame(frame_identifier)?;
        optimizer::optimize(&self.procurement_request(frame, source), &self.policy)
    }

    /// Plans several frames at once, aggregating footage per moulding.
    pub fn optimize_frames(&self, items: &[(String, FootageSource)]) -> CoreResult<Vec<ProcurementPlan>> {
        let requests = items
            .iter()
            .map(|(id, source)| {
                let frame = self.catalog.require_frame(id)?;
                Ok(self.procurement_request(frame, *source))
            })
            .collect::<CoreResult<Vec<_>>>()?;
        optimizer::optimize_batch(&requests, &self.policy)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::ProcurementMethod;
    use crate::pricing::ComponentKind;

    fn engine() -> PricingEngine {
        let config = PricingConfig {
            tax_rate_bps: 825,
            ..PricingConfig::default()
        };
        PricingEngine::from_config(config).unwrap()
    }

    fn request(frame: &str, mat: &str, glass: &str) -> QuoteRequest {
        QuoteRequest {
            frame_id: Some(frame.to_string()),
            mat_id: Some(mat.to_string()),
            glass_id: Some(glass.to_string()),
            backing_id: None,
            geometry: OrderGeometry::new(16.0, 20.0, 2.0).unwrap(),
            quantity: 1,
        }
    }

    #[test]
    fn test_frame_plus_labor_only() {
        let e = engine();
        let quote = e.quote(&request("oak-classic", "none", "none")).unwrap();

        // oak chop $6.50/ft → +$8.00 → $14.50/ft × 88/12 ft
        let frame_price = 14.5 * 88.0 / 12.0;
        let order = &quote.order;
        assert!((order.amount_of(ComponentKind::Frame) - frame_price).abs() < 1e-9);
        assert_eq!(order.amount_of(ComponentKind::Labor), 25.0);
        assert_eq!(order.amount_of(ComponentKind::Mat), 0.0);
        assert_eq!(order.amount_of(ComponentKind::Glass), 0.0);
        assert_eq!(order.subtotal(), order.amount_of(ComponentKind::Frame) + 25.0);
        assert_eq!(order.tax(), order.subtotal() * e.tax_rate().fraction());
    }

    #[test]
    fn test_full_quote_adds_cutting_labor() {
        let e = engine();
        let mut req = request("oak-classic", "white-core", "regular");
        req.backing_id = Some("foam-core".to_string());
        let quote = e.quote(&req).unwrap();

        assert_eq!(quote.materials.len(), 4);
        assert_eq!(quote.order.amount_of(ComponentKind::Labor), 40.0);
        // white-core $1.25 → ×4 = $5.00/sq ft × 480/144
        let mat = 5.0 * 480.0 / 144.0;
        assert!((quote.order.amount_of(ComponentKind::Mat) - mat).abs() < 1e-9);
        assert!(quote.wholesale.total() > 0.0);
        assert!(quote.order.material_total() > quote.wholesale.total());
    }

    #[test]
    fn test_quantity_multiplies_everything() {
        let e = engine();
        let one = e.quote(&request("oak-classic", "white-core", "none")).unwrap();
        let mut req = request("oak-classic", "white-core", "none");
        req.quantity = 3;
        let three = e.quote(&req).unwrap();

        assert!((three.order.subtotal() - 3.0 * one.order.subtotal()).abs() < 1e-9);
        assert!((three.wholesale.frame - 3.0 * one.wholesale.frame).abs() < 1e-9);
        assert_eq!(three.quantity, 3);
    }

    #[test]
    fn test_size_surcharge_applies() {
        let e = engine();
        let mut req = request("black-gallery", "none", "none");
        req.geometry = OrderGeometry::new(36.0, 48.0, 0.0).unwrap();
        let quote = e.quote(&req).unwrap();
        assert_eq!(quote.order.amount_of(ComponentKind::SizeSurcharge), 35.0);
    }

    #[test]
    fn test_quote_errors() {
        let e = engine();
        assert!(matches!(
            e.quote(&request("MLD-9999", "none", "none")),
            Err(CoreError::LookupNotFound { .. })
        ));
        let mut req = request("oak-classic", "none", "none");
        req.quantity = 0;
        assert!(matches!(e.quote(&req), Err(CoreError::InvalidInput(_))));
        req.quantity = 1000;
        assert!(matches!(e.quote(&req), Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn test_optimize_catalog_frame() {
        let e = engine();
        let plan = e
            .optimize_frame("oak-classic", FootageSource::ByFootage(12.0))
            .unwrap();
        assert_eq!(plan.item_identifier, "MLD-2041");
        assert_eq!(plan.recommendation.method, ProcurementMethod::Mixed);

        assert!(matches!(
            e.optimize_frame("nope", FootageSource::ByFootage(12.0)),
            Err(CoreError::LookupNotFound { .. })
        ));
    }

    #[test]
    fn test_optimize_frames_merges_id_and_item_number() {
        let e = engine();
        let plans = e
            .optimize_frames(&[
                ("oak-classic".to_string(), FootageSource::ByFootage(6.0)),
                ("MLD-2041".to_string(), FootageSource::ByFootage(6.0)),
                ("black-gallery".to_string(), FootageSource::ByFootage(4.0)),
            ])
            .unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].item_identifier, "MLD-2041");
        assert_eq!(plans[0].footage_needed, 12.0);
        assert_eq!(plans[1].item_identifier, "MLD-3310");
    }

    #[test]
    fn test_rejects_bad_tax_rate() {
        let config = PricingConfig {
            tax_rate_bps: 10_001,
            ..PricingConfig::default()
        };
        assert!(matches!(
            PricingEngine::from_config(config),
            Err(CoreError::InvalidConfiguration(_))
        ));
    }
}
