//! # Pricing Configuration
//!
//! The serde shape of every table the engine needs. Parsing a file and
//! applying environment overrides belong to the application; this module
//! only describes the shape, its defaults and its validation.
//!
//! ## File Format
//! ```toml
//! tax_rate_bps = 825
//! sheet_measure = "square_feet"   # or "united_inches"
//!
//! [labor]
//! base_fee = 25.0
//! mat_cutting_fee = 10.0
//! glass_cutting_fee = 5.0
//!
//! [procurement]
//! waste_alert_percent = 25.0
//! min_chop_remainder_feet = 0.5
//!
//! [[markup.frame]]
//! min_cost = 0.0
//! max_cost = 4.0
//! rule = { multiplier = 3.0 }
//!
//! [[size_surcharges]]
//! width = 40.0
//! height = 60.0
//! amount = 75.0
//! ```
//!
//! Every section is optional; a missing section takes the defaults below.

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogConfig;
use crate::engine::PricingEngine;
use crate::error::{CoreError, CoreResult};
use crate::markup::{
    default_backing_brackets, default_frame_brackets, default_glass_brackets,
    default_mat_brackets, MarkupBracket, MarkupSchedule,
};
use crate::optimizer::{
    ProcurementPolicy, DEFAULT_MIN_CHOP_REMAINDER_FEET, DEFAULT_WASTE_ALERT_PERCENT,
};
use crate::surcharge::{default_surcharge_tiers, SurchargeTier};
use crate::types::SheetMeasure;

// =============================================================================
// Markup
// =============================================================================

/// Bracket lists per material class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkupConfig {
    #[serde(default = "default_frame_brackets")]
    pub frame: Vec<MarkupBracket>,
    #[serde(default = "default_mat_brackets")]
    pub mat: Vec<MarkupBracket>,
    #[serde(default = "default_glass_brackets")]
    pub glass: Vec<MarkupBracket>,
    #[serde(default = "default_backing_brackets")]
    pub backing: Vec<MarkupBracket>,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        MarkupConfig {
            frame: default_frame_brackets(),
            mat: default_mat_brackets(),
            glass: default_glass_brackets(),
            backing: default_backing_brackets(),
        }
    }
}

impl MarkupConfig {
    pub fn build(&self) -> CoreResult<MarkupSchedule> {
        MarkupSchedule::new(
            self.frame.clone(),
            self.mat.clone(),
            self.glass.clone(),
            self.backing.clone(),
        )
    }
}

// =============================================================================
// Labor
// =============================================================================

/// Flat labor fees charged per framed piece.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaborRates {
    /// Charged on every piece (joining, fitting, wiring).
    #[serde(default = "default_base_fee")]
    pub base_fee: f64,

    /// Added when a mat is cut.
    #[serde(default = "default_mat_cutting_fee")]
    pub mat_cutting_fee: f64,

    /// Added when glass is cut.
    #[serde(default = "default_glass_cutting_fee")]
    pub glass_cutting_fee: f64,
}

fn default_base_fee() -> f64 {
    25.0
}

fn default_mat_cutting_fee() -> f64 {
    10.0
}

fn default_glass_cutting_fee() -> f64 {
    5.0
}

impl Default for LaborRates {
    fn default() -> Self {
        LaborRates {
            base_fee: default_base_fee(),
            mat_cutting_fee: default_mat_cutting_fee(),
            glass_cutting_fee: default_glass_cutting_fee(),
        }
    }
}

impl LaborRates {
    /// Labor for one piece.
    pub fn for_piece(&self, has_mat: bool, has_glass: bool) -> f64 {
        let mut fee = self.base_fee;
        if has_mat {
            fee += self.mat_cutting_fee;
        }
        if has_glass {
            fee += self.glass_cutting_fee;
        }
        fee
    }

    pub fn validate(&self) -> CoreResult<()> {
        for (name, fee) in [
            ("labor base_fee", self.base_fee),
            ("labor mat_cutting_fee", self.mat_cutting_fee),
            ("labor glass_cutting_fee", self.glass_cutting_fee),
        ] {
            if !fee.is_finite() || fee < 0.0 {
                return Err(CoreError::config(format!(
                    "{} must not be negative, got {}",
                    name, fee
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Procurement
// =============================================================================

/// Optimizer tunables as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcurementSettings {
    #[serde(default = "default_waste_alert_percent")]
    pub waste_alert_percent: f64,

    #[serde(default = "default_min_chop_remainder")]
    pub min_chop_remainder_feet: f64,
}

fn default_waste_alert_percent() -> f64 {
    DEFAULT_WASTE_ALERT_PERCENT
}

fn default_min_chop_remainder() -> f64 {
    DEFAULT_MIN_CHOP_REMAINDER_FEET
}

impl Default for ProcurementSettings {
    fn default() -> Self {
        ProcurementSettings {
            waste_alert_percent: default_waste_alert_percent(),
            min_chop_remainder_feet: default_min_chop_remainder(),
        }
    }
}

impl ProcurementSettings {
    pub fn build(&self) -> CoreResult<ProcurementPolicy> {
        ProcurementPolicy::new(self.waste_alert_percent, self.min_chop_remainder_feet)
    }
}

// =============================================================================
// Main Pricing Configuration
// =============================================================================

/// Complete pricing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Sales tax in basis points (825 = 8.25%).
    #[serde(default)]
    pub tax_rate_bps: u32,

    /// Unit used for mat, glass and backing quantities.
    #[serde(default)]
    pub sheet_measure: SheetMeasure,

    #[serde(default)]
    pub labor: LaborRates,

    #[serde(default)]
    pub procurement: ProcurementSettings,

    #[serde(default)]
    pub markup: MarkupConfig,

    /// Oversize tiers; evaluated highest amount first, never summed.
    #[serde(default = "default_surcharge_tiers")]
    pub size_surcharges: Vec<SurchargeTier>,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            tax_rate_bps: 0,
            sheet_measure: SheetMeasure::default(),
            labor: LaborRates::default(),
            procurement: ProcurementSettings::default(),
            markup: MarkupConfig::default(),
            size_surcharges: default_surcharge_tiers(),
            catalog: CatalogConfig::default(),
        }
    }
}

impl PricingConfig {
    /// Validates by building an engine and discarding it.
    pub fn validate(&self) -> CoreResult<()> {
        PricingEngine::from_config(self.clone()).map(|_| ())
    }

    /// Validates and builds the engine.
    pub fn into_engine(self) -> CoreResult<PricingEngine> {
        PricingEngine::from_config(self)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::MarkupRule;

    #[test]
    fn test_default_config_is_valid() {
        let config = PricingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.procurement.waste_alert_percent, 25.0);
        assert_eq!(config.procurement.min_chop_remainder_feet, 0.5);
        assert_eq!(config.sheet_measure, SheetMeasure::SquareFeet);
    }

    #[test]
    fn test_labor_for_piece() {
        let labor = LaborRates::default();
        assert_eq!(labor.for_piece(false, false), 25.0);
        assert_eq!(labor.for_piece(true, false), 35.0);
        assert_eq!(labor.for_piece(true, true), 40.0);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let text = r#"
            tax_rate_bps = 825
            sheet_measure = "united_inches"

            [labor]
            base_fee = 30.0

            [[markup.frame]]
            min_cost = 0.0
            rule = { multiplier = 2.5 }
        "#;
        let config: PricingConfig = toml::from_str(text).unwrap();

        assert_eq!(config.tax_rate_bps, 825);
        assert_eq!(config.sheet_measure, SheetMeasure::UnitedInches);
        assert_eq!(config.labor.base_fee, 30.0);
        assert_eq!(config.labor.mat_cutting_fee, 10.0);
        assert_eq!(config.markup.frame.len(), 1);
        assert_eq!(config.markup.frame[0].rule, MarkupRule::Multiplier(2.5));
        assert_eq!(config.markup.mat, default_mat_brackets());
        assert_eq!(config.size_surcharges.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_sections_fail_validation() {
        let mut config = PricingConfig::default();
        config.labor.glass_cutting_fee = -1.0;
        assert!(matches!(
            config.validate(),
            Err(CoreError::InvalidConfiguration(_))
        ));

        let mut config = PricingConfig::default();
        config.procurement.waste_alert_percent = 150.0;
        assert!(config.validate().is_err());

        let mut config = PricingConfig::default();
        config.markup.glass = vec![MarkupBracket::closed(0.0, 5.0, MarkupRule::Multiplier(2.0))];
        assert!(config.validate().is_err());

        let mut config = PricingConfig::default();
        config.tax_rate_bps = 20_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip_of_defaults() {
        let text = toml::to_string(&PricingConfig::default()).unwrap();
        let parsed: PricingConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, PricingConfig::default());
    }
}
