//! # Domain Types
//!
//! Small value types used throughout the pricing core.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  MaterialClass  │   │  OrderGeometry  │   │    TaxRate      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Frame          │   │  artwork_width  │   │  bps (u32)      │       │
//! │  │  Mat            │   │  artwork_height │   │  825 = 8.25%    │       │
//! │  │  Glass          │   │  mat_width      │   └─────────────────┘       │
//! │  │  Backing        │   │  (inches)       │                             │
//! │  └─────────────────┘   └─────────────────┘   ┌─────────────────┐       │
//! │                                              │  SheetMeasure   │       │
//! │                                              │  ─────────────  │       │
//! │                                              │  SquareFeet     │       │
//! │                                              │  UnitedInches   │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::CoreResult;
use crate::validation::{require_non_negative, require_positive};

// =============================================================================
// Material Class
// =============================================================================

/// The four material classes that carry their own markup brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MaterialClass {
    /// Moulding, priced per linear foot.
    Frame,
    /// Mat board, priced per sheet measure.
    Mat,
    /// Glazing, priced per sheet measure.
    Glass,
    /// Backing board, priced per sheet measure.
    Backing,
}

impl MaterialClass {
    /// Every class, in display order.
    pub const ALL: [MaterialClass; 4] = [
        MaterialClass::Frame,
        MaterialClass::Mat,
        MaterialClass::Glass,
        MaterialClass::Backing,
    ];
}

impl fmt::Display for MaterialClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialClass::Frame => write!(f, "frame"),
            MaterialClass::Mat => write!(f, "mat"),
            MaterialClass::Glass => write!(f, "glass"),
            MaterialClass::Backing => write!(f, "backing"),
        }
    }
}

// =============================================================================
// Sheet Measure
// =============================================================================

/// How mat, glass and backing quantities are measured.
///
/// One convention applies to ALL sheet classes of an engine; mixing them
/// would let a cheaper-per-unit board out-price a pricier one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetMeasure {
    /// True area: outer width × outer height / 144.
    #[default]
    SquareFeet,
    /// Outer width + outer height (framing-industry sizing).
    UnitedInches,
}

impl fmt::Display for SheetMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetMeasure::SquareFeet => write!(f, "square_feet"),
            SheetMeasure::UnitedInches => write!(f, "united_inches"),
        }
    }
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 825 bps = 8.25%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a fraction (825 bps → 0.0825).
    #[inline]
    pub fn fraction(&self) -> f64 {
        f64::from(self.0) / 10_000.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Order Geometry
// =============================================================================

/// Artwork size plus mat border, all in inches.
///
/// ## Invariants
/// - `artwork_width > 0`, `artwork_height > 0`
/// - `mat_width >= 0` (zero = no mat border)
///
/// Fields are private so a constructed geometry is always valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderGeometry {
    artwork_width: f64,
    artwork_height: f64,
    mat_width: f64,
}

impl OrderGeometry {
    /// Validates and builds a geometry.
    ///
    /// ## Example
    /// ```rust
    /// use mitre_core::types::OrderGeometry;
    ///
    /// let g = OrderGeometry::new(16.0, 20.0, 2.0).unwrap();
    /// assert_eq!(g.outer_width(), 20.0);
    /// assert!(OrderGeometry::new(0.0, 20.0, 2.0).is_err());
    /// ```
    pub fn new(artwork_width: f64, artwork_height: f64, mat_width: f64) -> CoreResult<Self> {
        Ok(OrderGeometry {
            artwork_width: require_positive("artwork_width", artwork_width)?,
            artwork_height: require_positive("artwork_height", artwork_height)?,
            mat_width: require_non_negative("mat_width", mat_width)?,
        })
    }

    pub fn artwork_width(&self) -> f64 {
        self.artwork_width
    }

    pub fn artwork_height(&self) -> f64 {
        self.artwork_height
    }

    pub fn mat_width(&self) -> f64 {
        self.mat_width
    }

    /// Width including the mat border on both sides.
    pub fn outer_width(&self) -> f64 {
        self.artwork_width + 2.0 * self.mat_width
    }

    /// Height including the mat border on both sides.
    pub fn outer_height(&self) -> f64 {
        self.artwork_height + 2.0 * self.mat_width
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(825);
        assert_eq!(rate.bps(), 825);
        assert!((rate.fraction() - 0.0825).abs() < 1e-12);
    }

    #[test]
    fn test_geometry_outer_dimensions() {
        let g = OrderGeometry::new(16.0, 20.0, 2.5).unwrap();
        assert_eq!(g.outer_width(), 21.0);
        assert_eq!(g.outer_height(), 25.0);
    }

    #[test]
    fn test_geometry_rejects_bad_dimensions() {
        assert!(OrderGeometry::new(-1.0, 20.0, 0.0).is_err());
        assert!(OrderGeometry::new(16.0, 0.0, 0.0).is_err());
        assert!(OrderGeometry::new(16.0, 20.0, -2.0).is_err());
        assert!(OrderGeometry::new(f64::NAN, 20.0, 0.0).is_err());
    }

    #[test]
    fn test_material_class_serde() {
        let json = serde_json::to_string(&MaterialClass::Glass).unwrap();
        assert_eq!(json, "\"glass\"");
    }

    #[test]
    fn test_sheet_measure_default() {
        assert_eq!(SheetMeasure::default(), SheetMeasure::SquareFeet);
    }
}
