//! # Material Catalog
//!
//! Identifier lookup for frames, mat colors, glass options and backing boards.
//!
//! ## Lookup Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  identifier            result                                           │
//! │  ────────────────────  ───────────────────────────────────────────      │
//! │  absent / "" / "none"  Ok(None)    zero-cost, zero-quantity component   │
//! │  "NONE", " None "      Ok(None)    case and whitespace are ignored      │
//! │  known id              Ok(Some(entry))                                  │
//! │  frame item number     Ok(Some(frame))   frames only                    │
//! │  anything else         Err(LookupNotFound)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Frames carry their stick spec, so procurement for a catalog frame can
//! never be missing stick data.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::stick::{StickSpec, DEFAULT_STICK_LENGTH_FEET};
use crate::types::MaterialClass;

/// Identifier meaning "no component".
pub const NONE_IDENTIFIER: &str = "none";

/// True for an absent, empty or `"none"` selection.
pub fn is_none_selection(identifier: Option<&str>) -> bool {
    match identifier {
        None => true,
        Some(id) => {
            let id = id.trim();
            id.is_empty() || id.eq_ignore_ascii_case(NONE_IDENTIFIER)
        }
    }
}

fn lookup_key(identifier: &str) -> String {
    identifier.trim().to_ascii_lowercase()
}

// =============================================================================
// Catalog Entries (configuration shape)
// =============================================================================

/// A moulding profile as written in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameEntry {
    pub id: String,
    pub item_number: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default = "default_stick_length")]
    pub stick_length_feet: f64,
    pub length_cost_per_foot: f64,
    pub chop_cost_per_foot: f64,
}

fn default_stick_length() -> f64 {
    DEFAULT_STICK_LENGTH_FEET
}

/// A mat color, glass option or backing board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetEntry {
    pub id: String,
    pub name: String,
    /// Wholesale cost per sheet unit (square foot or united inch).
    pub cost_per_unit: f64,
}

/// Catalog section of the pricing configuration.
///
/// ```toml
/// [[catalog.frames]]
/// id = "oak-classic"
/// item_number = "MLD-2041"
/// name = "Classic Oak 1.5in"
/// vendor = "Larson-Juhl"
/// length_cost_per_foot = 4.00
/// chop_cost_per_foot = 6.50
///
/// [[catalog.mats]]
/// id = "white-core"
/// name = "Bright White"
/// cost_per_unit = 1.25
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub frames: Vec<FrameEntry>,
    #[serde(default)]
    pub mats: Vec<SheetEntry>,
    #[serde(default)]
    pub glass: Vec<SheetEntry>,
    #[serde(default)]
    pub backing: Vec<SheetEntry>,
}

impl Default for CatalogConfig {
    /// A small starter catalog so a fresh install can quote immediately.
    fn default() -> Self {
        let frame = |id: &str, item: &str, name: &str, length: f64, chop: f64| FrameEntry {
            id: id.to_string(),
            item_number: item.to_string(),
            name: name.to_string(),
            vendor: None,
            stick_length_feet: DEFAULT_STICK_LENGTH_FEET,
            length_cost_per_foot: length,
            chop_cost_per_foot: chop,
        };
        let sheet = |id: &str, name: &str, cost: f64| SheetEntry {
            id: id.to_string(),
            name: name.to_string(),
            cost_per_unit: cost,
        };

        CatalogConfig {
            frames: vec![
                frame("oak-classic", "MLD-2041", "Classic Oak 1.5in", 4.00, 6.50),
                frame("black-gallery", "MLD-3310", "Gallery Black 1in", 2.10, 3.20),
                frame("gold-ornate", "MLD-5120", "Ornate Gold 3in", 9.80, 14.25),
            ],
            mats: vec![
                sheet("white-core", "Bright White", 1.25),
                sheet("museum-rag", "Museum Rag", 3.40),
            ],
            glass: vec![
                sheet("regular", "Regular Clear", 1.10),
                sheet("uv-conservation", "UV Conservation", 4.20),
                sheet("museum", "Museum Glass", 9.50),
            ],
            backing: vec![sheet("foam-core", "Acid-Free Foam Core", 0.60)],
        }
    }
}

// =============================================================================
// Validated Catalog
// =============================================================================

/// A catalog frame with its validated stick spec.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    entry: FrameEntry,
    stick: StickSpec,
}

impl Frame {
    pub fn id(&self) -> &str {
        &self.entry.id
    }

    pub fn item_number(&self) -> &str {
        &self.entry.item_number
    }

    pub fn name(&self) -> &str {
        &self.entry.name
    }

    pub fn vendor(&self) -> Option<&str> {
        self.entry.vendor.as_deref()
    }

    pub fn stick(&self) -> &StickSpec {
        &self.stick
    }

    /// Wholesale cost per foot used for retail pricing (the chop price).
    pub fn wholesale_cost_per_foot(&self) -> f64 {
        self.stick.chop_cost_per_foot()
    }
}

/// A validated sheet material.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetMaterial {
    class: MaterialClass,
    entry: SheetEntry,
}

impl SheetMaterial {
    pub fn class(&self) -> MaterialClass {
        self.class
    }

    pub fn id(&self) -> &str {
        &self.entry.id
    }

    pub fn name(&self) -> &str {
        &self.entry.name
    }

    pub fn cost_per_unit(&self) -> f64 {
        self.entry.cost_per_unit
    }
}

/// Immutable, indexed catalog.
#[derive(Debug, Clone, Default)]
pub struct MaterialCatalog {
    frames: Vec<Frame>,
    frame_index: HashMap<String, usize>,
    sheets: HashMap<(MaterialClass, String), SheetMaterial>,
}

impl MaterialCatalog {
    /// Validates every entry and builds the lookup indexes.
    ///
    /// ## Errors
    /// `InvalidConfiguration` for an empty or reserved identifier, a duplicate
    /// identifier within one class, an invalid stick spec, or a cost that is
    /// not a positive number.
    pub fn new(config: CatalogConfig) -> CoreResult<Self> {
        let mut catalog = MaterialCatalog::default();

        for entry in config.frames {
            check_identifier(MaterialClass::Frame, &entry.id)?;
            check_identifier(MaterialClass::Frame, &entry.item_number)?;

            let stick = StickSpec::new(
                entry.stick_length_feet,
                entry.length_cost_per_foot,
                entry.chop_cost_per_foot,
            )
            .map_err(|e| CoreError::config(format!("frame {}: {}", entry.id, config_message(e))))?;
            if stick.chop_cost_per_foot() <= 0.0 {
                return Err(CoreError::config(format!(
                    "frame {}: chop cost per foot must be positive",
                    entry.id
                )));
            }

            let position = catalog.frames.len();
            let id_key = lookup_key(&entry.id);
            let item_key = lookup_key(&entry.item_number);
            for key in [&id_key, &item_key] {
                if catalog.frame_index.contains_key(key) {
                    return Err(CoreError::config(format!("duplicate frame identifier: {}", key)));
                }
            }
            catalog.frame_index.insert(id_key, position);
            catalog.frame_index.insert(item_key, position);
            catalog.frames.push(Frame { entry, stick });
        }

        for (class, entries) in [
            (MaterialClass::Mat, config.mats),
            (MaterialClass::Glass, config.glass),
            (MaterialClass::Backing, config.backing),
        ] {
            for entry in entries {
                check_identifier(class, &entry.id)?;
                if !entry.cost_per_unit.is_finite() || entry.cost_per_unit <= 0.0 {
                    return Err(CoreError::config(format!(
                        "{} {}: cost per unit must be positive, got {}",
                        class, entry.id, entry.cost_per_unit
                    )));
                }
                let key = (class, lookup_key(&entry.id));
                if catalog.sheets.contains_key(&key) {
                    return Err(CoreError::config(format!(
                        "duplicate {} identifier: {}",
                        class, entry.id
                    )));
                }
                catalog.sheets.insert(key, SheetMaterial { class, entry });
            }
        }

        Ok(catalog)
    }

    /// All frames in configuration order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of sheet materials of `class`.
    pub fn sheet_count(&self, class: MaterialClass) -> usize {
        self.sheets.keys().filter(|(c, _)| *c == class).count()
    }

    /// Resolves a frame by id or item number. `None` for a none selection.
    pub fn frame(&self, identifier: Option<&str>) -> CoreResult<Option<&Frame>> {
        match identifier {
            Some(id) if !is_none_selection(identifier) => self.require_frame(id).map(Some),
            _ => Ok(None),
        }
    }

    /// Resolves a frame that must exist.
    pub fn require_frame(&self, identifier: &str) -> CoreResult<&Frame> {
        self.frame_index
            .get(&lookup_key(identifier))
            .and_then(|position| self.frames.get(*position))
            .ok_or_else(|| CoreError::not_found("frame", identifier.trim()))
    }

    /// Resolves a mat, glass or backing selection. `None` for a none selection.
    pub fn sheet(&self, class: MaterialClass, identifier: Option<&str>) -> CoreResult<Option<&SheetMaterial>> {
        let id = match identifier {
            Some(id) if !is_none_selection(identifier) => id,
            _ => return Ok(None),
        };
        self.sheets
            .get(&(class, lookup_key(id)))
            .map(Some)
            .ok_or_else(|| CoreError::not_found(entity_name(class), id.trim()))
    }
}

fn check_identifier(class: MaterialClass, identifier: &str) -> CoreResult<()> {
    if identifier.trim().is_empty() {
        return Err(CoreError::config(format!("{} identifier must not be empty", class)));
    }
    if identifier.trim().eq_ignore_ascii_case(NONE_IDENTIFIER) {
        return Err(CoreError::config(format!(
            "\"{}\" is reserved and cannot be a {} identifier",
            NONE_IDENTIFIER, class
        )));
    }
    Ok(())
}

fn entity_name(class: MaterialClass) -> &'static str {
    match class {
        MaterialClass::Frame => "frame",
        MaterialClass::Mat => "mat color",
        MaterialClass::Glass => "glass option",
        MaterialClass::Backing => "backing board",
    }
}

fn config_message(error: CoreError) -> String {
    match error {
        CoreError::InvalidConfiguration(message) => message,
        other => other.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
