//! # Wire Contracts
//!
//! JSON request and response shapes (camelCase), plus their conversion to
//! and from the strongly-typed core.
//!
//! ## Boundary
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  JSON (all fields optional)        Core (tagged, validated)            │
//! │  ──────────────────────────        ────────────────────────            │
//! │  OptimizeRequest ──by_dimensions()──► FootageSource::ByDimensions       │
//! │                  ──by_footage()────► FootageSource::ByFootage          │
//! │                  ──resolve()───────► whichever the fields describe      │
//! │  PriceCalculationRequest ──into_quote_request()──► QuoteRequest         │
//! │                                                                         │
//! │  ProcurementPlan ──from_plan()──► OptimizeResponse  (Money rounded once) │
//! │  Quote           ──from_quote()──► PriceCalculationResponse             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Missing fields become `Required` validation errors rather than
//! deserialization failures, so every caller mistake reads the same way.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::LaborRates;
use crate::engine::{Quote, QuoteRequest, WholesaleCosts};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{round_to_money, Money};
use crate::optimizer::{rounded_savings, FootageSource, ProcurementMethod, ProcurementPlan};
use crate::pricing::{BreakdownLine, ComponentKind};
use crate::stick::{ChopOption, LengthOption, MixedOption};
use crate::types::OrderGeometry;
use crate::validation::validate_identifier;

fn required<T>(field: &str, value: Option<T>) -> CoreResult<T> {
    value.ok_or_else(|| {
        ValidationError::Required {
            field: field.to_string(),
        }
        .into()
    })
}

// =============================================================================
// Optimization Requests
// =============================================================================

/// Body of `/optimize/frame`, `/optimize/footage` and each batch item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    pub item_identifier: Option<String>,
    pub artwork_width: Option<f64>,
    pub artwork_height: Option<f64>,
    pub mat_width: Option<f64>,
    pub footage_needed: Option<f64>,
}

impl OptimizeRequest {
    fn item(&self) -> CoreResult<String> {
        let id = required("itemIdentifier", self.item_identifier.as_deref())?;
        Ok(validate_identifier("itemIdentifier", id)?)
    }

    fn has_dimensions(&self) -> bool {
        self.artwork_width.is_some() || self.artwork_height.is_some() || self.mat_width.is_some()
    }

    /// Frame-dimension mode; `mat_width` defaults to 0.
    pub fn by_dimensions(&self) -> CoreResult<(String, FootageSource)> {
        let item = self.item()?;
        let geometry = OrderGeometry::new(
            required("artworkWidth", self.artwork_width)?,
            required("artworkHeight", self.artwork_height)?,
            self.mat_width.unwrap_or(0.0),
        )?;
        Ok((item, FootageSource::ByDimensions(geometry)))
    }

    /// Explicit-footage mode.
    pub fn by_footage(&self) -> CoreResult<(String, FootageSource)> {
        let item = self.item()?;
        let footage = required("footageNeeded", self.footage_needed)?;
        Ok((item, FootageSource::ByFootage(footage)))
    }

    /// Picks the mode from the fields present; both at once is rejected.
    pub fn resolve(&self) -> CoreResult<(String, FootageSource)> {
        match (self.footage_needed.is_some(), self.has_dimensions()) {
            (true, true) => Err(ValidationError::InvalidFormat {
                field: "footageNeeded".to_string(),
                reason: "give either footageNeeded or artwork dimensions, not both".to_string(),
            }
            .into()),
            (true, false) => self.by_footage(),
            (false, _) => self.by_dimensions(),
        }
    }
}

/// Body of `/optimize/batch`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BatchOptimizeRequest {
    #[serde(default)]
    pub items: Vec<OptimizeRequest>,
}

impl BatchOptimizeRequest {
    /// Resolves every item; the first invalid item names its index.
    pub fn resolve(&self) -> CoreResult<Vec<(String, FootageSource)>> {
        self.items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.resolve().map_err(|e| match e {
                    CoreError::InvalidInput(inner) => CoreError::from(ValidationError::InvalidFormat {
                        field: format!("items[{}]", index),
                        reason: inner.to_string(),
                    }),
                    other => other,
                })
            })
            .collect()
    }
}

// =============================================================================
// Optimization Responses
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LengthOptionDto {
    pub sticks_needed: u32,
    pub total_footage: f64,
    pub waste_footage: f64,
    #[ts(type = "number")]
    pub total_cost: Money,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ChopOptionDto {
    pub footage: f64,
    pub waste_footage: f64,
    #[ts(type = "number")]
    pub total_cost: Money,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MixedOptionDto {
    pub full_sticks: u32,
    pub chop_footage: f64,
    pub waste_footage: f64,
    #[ts(type = "number")]
    pub total_cost: Money,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationDto {
    pub method: ProcurementMethod,
    #[ts(type = "number")]
    pub savings: Money,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub alert: Option<String>,
}

/// Response of the optimization endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    pub item_number: String,
    pub footage_needed: f64,
    pub length_option: LengthOptionDto,
    pub chop_option: ChopOptionDto,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub mixed_option: Option<MixedOptionDto>,
    pub recommendation: RecommendationDto,
}

/// Response of `/optimize/batch`, ordered by item number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BatchOptimizeResponse {
    pub results: Vec<OptimizeResponse>,
}

impl OptimizeResponse {
    pub fn from_plan(plan: &ProcurementPlan) -> CoreResult<Self> {
        Ok(OptimizeResponse {
            item_number: plan.item_identifier.clone(),
            footage_needed: plan.footage_needed,
            length_option: length_dto(&plan.length)?,
            chop_option: chop_dto(&plan.chop)?,
            mixed_option: plan.mixed.as_ref().map(mixed_dto).transpose()?,
            recommendation: RecommendationDto {
                method: plan.recommendation.method,
                savings: rounded_savings(&plan.recommendation)?,
                reason: plan.recommendation.reason.clone(),
                alert: plan.recommendation.alert.clone(),
            },
        })
    }
}

fn length_dto(option: &LengthOption) -> CoreResult<LengthOptionDto> {
    Ok(LengthOptionDto {
        sticks_needed: option.sticks_needed,
        total_footage: option.total_footage,
        waste_footage: option.waste_footage,
        total_cost: round_to_money("lengthOption.totalCost", option.total_cost)?,
        description: option.description.clone(),
    })
}

fn chop_dto(option: &ChopOption) -> CoreResult<ChopOptionDto> {
    Ok(ChopOptionDto {
        footage: option.footage,
        waste_footage: option.waste_footage,
        total_cost: round_to_money("chopOption.totalCost", option.total_cost)?,
        description: option.description.clone(),
    })
}

fn mixed_dto(option: &MixedOption) -> CoreResult<MixedOptionDto> {
    Ok(MixedOptionDto {
        full_sticks: option.full_sticks,
        chop_footage: option.chop_footage,
        waste_footage: option.waste_footage,
        total_cost: round_to_money("mixedOption.totalCost", option.total_cost)?,
        description: option.description.clone(),
    })
}

// =============================================================================
// Price Calculation
// =============================================================================

/// Body of `/pricing/calculate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceCalculationRequest {
    pub frame_id: Option<String>,
    pub mat_color_id: Option<String>,
    pub glass_option_id: Option<String>,
    pub backing_id: Option<String>,
    pub artwork_width: Option<f64>,
    pub artwork_height: Option<f64>,
    pub mat_width: Option<f64>,
    pub quantity: Option<u32>,
    #[serde(default)]
    pub include_wholesale_prices: bool,
}

impl PriceCalculationRequest {
    /// Quantity defaults to 1 and mat width to 0.
    pub fn into_quote_request(self) -> CoreResult<QuoteRequest> {
        let geometry = OrderGeometry::new(
            required("artworkWidth", self.artwork_width)?,
            required("artworkHeight", self.artwork_height)?,
            self.mat_width.unwrap_or(0.0),
        )?;
        Ok(QuoteRequest {
            frame_id: self.frame_id,
            mat_id: self.mat_color_id,
            glass_id: self.glass_option_id,
            backing_id: self.backing_id,
            geometry,
            quantity: self.quantity.unwrap_or(1),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WholesalePricesDto {
    #[ts(type = "number")]
    pub frame: Money,
    #[ts(type = "number")]
    pub mat: Money,
    #[ts(type = "number")]
    pub glass: Money,
    #[ts(type = "number")]
    pub backing: Money,
    #[ts(type = "number")]
    pub total: Money,
}

impl WholesalePricesDto {
    fn from_costs(costs: &WholesaleCosts) -> CoreResult<Self> {
        Ok(WholesalePricesDto {
            frame: round_to_money("wholesale frame", costs.frame)?,
            mat: round_to_money("wholesale mat", costs.mat)?,
            glass: round_to_money("wholesale glass", costs.glass)?,
            backing: round_to_money("wholesale backing", costs.backing)?,
            total: round_to_money("wholesale total", costs.total())?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LaborRatesDto {
    #[ts(type = "number")]
    pub base_fee: Money,
    #[ts(type = "number")]
    pub mat_cutting_fee: Money,
    #[ts(type = "number")]
    pub glass_cutting_fee: Money,
}

impl LaborRatesDto {
    fn from_rates(rates: &LaborRates) -> CoreResult<Self> {
        Ok(LaborRatesDto {
            base_fee: round_to_money("labor base fee", rates.base_fee)?,
            mat_cutting_fee: round_to_money("labor mat cutting fee", rates.mat_cutting_fee)?,
            glass_cutting_fee: round_to_money("labor glass cutting fee", rates.glass_cutting_fee)?,
        })
    }
}

/// Response of `/pricing/calculate`. Amounts cover the whole quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceCalculationResponse {
    #[ts(type = "number")]
    pub frame_price: Money,
    #[ts(type = "number")]
    pub mat_price: Money,
    #[ts(type = "number")]
    pub glass_price: Money,
    #[ts(type = "number")]
    pub backing_price: Money,
    #[ts(type = "number")]
    pub labor_cost: Money,
    #[ts(type = "number")]
    pub material_cost: Money,
    #[ts(type = "number")]
    pub size_surcharge: Money,
    #[ts(type = "number")]
    pub subtotal: Money,
    #[ts(type = "number")]
    pub tax: Money,
    #[ts(type = "number")]
    pub total_price: Money,
    pub quantity: u32,
    pub breakdown: Vec<BreakdownLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub wholesale_prices: Option<WholesalePricesDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub labor_rates: Option<LaborRatesDto>,
}

impl PriceCalculationResponse {
    pub fn from_quote(quote: &Quote, include_wholesale_prices: bool) -> CoreResult<Self> {
        let order = &quote.order;
        let rounded = order.rounded()?;
        let amount = |field: &str, kind: ComponentKind| round_to_money(field, order.amount_of(kind));

        let (wholesale_prices, labor_rates) = if include_wholesale_prices {
            (
                Some(WholesalePricesDto::from_costs(&quote.wholesale)?),
                Some(LaborRatesDto::from_rates(&quote.labor_rates)?),
            )
        } else {
            (None, None)
        };

        Ok(PriceCalculationResponse {
            frame_price: amount("framePrice", ComponentKind::Frame)?,
            mat_price: amount("matPrice", ComponentKind::Mat)?,
            glass_price: amount("glassPrice", ComponentKind::Glass)?,
            backing_price: amount("backingPrice", ComponentKind::Backing)?,
            labor_cost: amount("laborCost", ComponentKind::Labor)?,
            material_cost: round_to_money("materialCost", order.material_total())?,
            size_surcharge: amount("sizeSurcharge", ComponentKind::SizeSurcharge)?,
            subtotal: rounded.subtotal,
            tax: rounded.tax,
            total_price: rounded.total,
            quantity: quote.quantity,
            breakdown: rounded.breakdown,
            wholesale_prices,
            labor_rates,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PricingConfig;
    use crate::engine::PricingEngine;
    use crate::optimizer::{optimize, ProcurementPolicy, ProcurementRequest};
    use crate::stick::StickSpec;

    fn scenario_a() -> ProcurementPlan {
        let request = ProcurementRequest {
            item_identifier: "MLD-2041".to_string(),
            source: FootageSource::ByFootage(12.0),
            stick: StickSpec::new(9.5, 4.0, 6.5).unwrap(),
        };
        optimize(&request, &ProcurementPolicy::default()).unwrap()
    }

    #[test]
    fn test_optimize_request_modes() {
        let req: OptimizeRequest = serde_json::from_str(
            r#"{"itemIdentifier":"MLD-2041","artworkWidth":16,"artworkHeight":20,"matWidth":2}"#,
        )
        .unwrap();
        let (item, source) = req.resolve().unwrap();
        assert_eq!(item, "MLD-2041");
        assert!(matches!(source, FootageSource::ByDimensions(_)));

        let req: OptimizeRequest =
            serde_json::from_str(r#"{"itemIdentifier":"MLD-2041","footageNeeded":12}"#).unwrap();
        assert!(matches!(req.resolve().unwrap().1, FootageSource::ByFootage(f) if f == 12.0));
        // a footage-only body has no dimensions to fall back on
        assert!(req.by_dimensions().is_err());
    }

    #[test]
    fn test_optimize_request_errors() {
        let missing_item = OptimizeRequest {
            footage_needed: Some(3.0),
            ..OptimizeRequest::default()
        };
        let err = missing_item.resolve().unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: itemIdentifier is required");

        let both = OptimizeRequest {
            item_identifier: Some("MLD-2041".to_string()),
            footage_needed: Some(3.0),
            artwork_width: Some(10.0),
            ..OptimizeRequest::default()
        };
        assert!(both.resolve().is_err());

        let no_height = OptimizeRequest {
            item_identifier: Some("MLD-2041".to_string()),
            artwork_width: Some(10.0),
            ..OptimizeRequest::default()
        };
        let err = no_height.by_dimensions().unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: artworkHeight is required");
    }

    #[test]
    fn test_batch_error_names_index() {
        let batch = BatchOptimizeRequest {
            items: vec![
                OptimizeRequest {
                    item_identifier: Some("A".to_string()),
                    footage_needed: Some(3.0),
                    ..OptimizeRequest::default()
                },
                OptimizeRequest::default(),
            ],
        };
        let err = batch.resolve().unwrap_err();
        assert!(err.to_string().contains("items[1]"));
    }

    #[test]
    fn test_optimize_response_json() {
        let response = OptimizeResponse::from_plan(&scenario_a()).unwrap();
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["itemNumber"], "MLD-2041");
        assert_eq!(json["lengthOption"]["sticksNeeded"], 2);
        assert_eq!(json["lengthOption"]["totalCost"], 76.0);
        assert_eq!(json["chopOption"]["totalCost"], 78.0);
        assert_eq!(json["mixedOption"]["fullSticks"], 1);
        assert_eq!(json["mixedOption"]["totalCost"], 54.25);
        assert_eq!(json["recommendation"]["method"], "mixed");
        assert_eq!(json["recommendation"]["savings"], 21.75);
    }

    #[test]
    fn test_absent_mixed_option_is_omitted() {
        let request = ProcurementRequest {
            item_identifier: "MLD-2041".to_string(),
            source: FootageSource::ByFootage(3.0),
            stick: StickSpec::new(9.5, 4.0, 6.5).unwrap(),
        };
        let plan = optimize(&request, &ProcurementPolicy::default()).unwrap();
        let json = serde_json::to_value(OptimizeResponse::from_plan(&plan).unwrap()).unwrap();

        assert!(json.get("mixedOption").is_none());
        assert_eq!(json["recommendation"]["method"], "chop");
        assert!(json["recommendation"]["alert"].is_string());
    }

    #[test]
    fn test_price_calculation_round_trip() {
        let engine = PricingEngine::from_config(PricingConfig {
            tax_rate_bps: 800,
            ..PricingConfig::default()
        })
        .unwrap();
        let request: PriceCalculationRequest = serde_json::from_str(
            r#"{
                "frameId": "oak-classic",
                "matColorId": "none",
                "glassOptionId": "none",
                "artworkWidth": 16,
                "artworkHeight": 20,
                "matWidth": 2,
                "quantity": 1,
                "includeWholesalePrices": true
            }"#,
        )
        .unwrap();
        let include = request.include_wholesale_prices;
        let quote = engine.quote(&request.into_quote_request().unwrap()).unwrap();
        let response = PriceCalculationResponse::from_quote(&quote, include).unwrap();

        // 14.50/ft × 7.333 ft = 106.333 → $106.33
        assert_eq!(response.frame_price.cents(), 10633);
        assert_eq!(response.mat_price, Money::zero());
        assert_eq!(response.glass_price, Money::zero());
        assert_eq!(response.labor_cost.cents(), 2500);
        assert_eq!(response.subtotal.cents(), 13133);
        assert_eq!(response.tax.cents(), 1051);
        assert_eq!(response.total_price.cents(), 14184);
        assert!(response.wholesale_prices.is_some());
        assert_eq!(response.labor_rates.as_ref().unwrap().base_fee.cents(), 2500);
    }

    #[test]
    fn test_price_calculation_requires_dimensions() {
        let request = PriceCalculationRequest {
            frame_id: Some("oak-classic".to_string()),
            ..PriceCalculationRequest::default()
        };
        let err = request.into_quote_request().unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: artworkWidth is required");
    }
}
