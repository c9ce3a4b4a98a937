//! # mitre-core: Pricing & Procurement Logic for Mitre
//!
//! This crate turns wholesale material costs into retail prices for custom
//! picture framing, and decides the cheapest way to buy frame moulding.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mitre Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 pricing-api (Axum, JSON)                        │   │
//! │  │  /optimize/frame  /optimize/footage  /optimize/batch            │   │
//! │  │  /pricing/calculate  /config/reload  /health                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ contract DTOs                          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ mitre-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   markup ──► calculator ──┐                                     │   │
//! │  │   surcharge ──────────────┼──► pricing ──┐                      │   │
//! │  │   stick ──► optimizer ────┘              ├──► engine            │   │
//! │  │   catalog, config ───────────────────────┘                      │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO GLOBALS • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`markup`] - Bracket markup tables per material class
//! - [`calculator`] - Quantity formulas and unit pricing
//! - [`surcharge`] - Oversize surcharge tiers
//! - [`pricing`] - Order subtotal / tax / total with display rounding
//! - [`stick`] - Stick specs and the length / chop / mixed options
//! - [`optimizer`] - Procurement recommendation
//! - [`catalog`] - Frame and sheet material lookup
//! - [`config`] - Serde configuration shape and defaults
//! - [`engine`] - Validated aggregate of all tables
//! - [`contract`] - JSON request / response DTOs
//! - [`money`], [`types`], [`error`], [`validation`] - shared building blocks
//!
//! ## Example Usage
//!
//! ```rust
//! use mitre_core::config::PricingConfig;
//! use mitre_core::optimizer::{FootageSource, ProcurementMethod};
//!
//! let engine = PricingConfig::default().into_engine().unwrap();
//!
//! // 12 ft of a 9.5 ft stick: one full stick plus a 2.5 ft chop
//! let plan = engine
//!     .optimize_frame("MLD-2041", FootageSource::ByFootage(12.0))
//!     .unwrap();
//!
//! assert_eq!(plan.recommendation.method, ProcurementMethod::Mixed);
//! assert_eq!(plan.mixed.unwrap().total_cost, 54.25);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculator;
pub mod catalog;
pub mod config;
pub mod contract;
pub mod engine;
pub mod error;
pub mod markup;
pub mod money;
pub mod optimizer;
pub mod pricing;
pub mod stick;
pub mod surcharge;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::PricingConfig;
pub use engine::PricingEngine;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of identical frames in one quote.
///
/// Guards against typing 1000 instead of 10.
pub const MAX_ORDER_QUANTITY: u32 = 999;
