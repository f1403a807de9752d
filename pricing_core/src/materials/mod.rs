//! # Materials
//!
//! Cost Aggregator. Reduces bulk-purchased materials and their per-unit
//! usage into the single material cost of one product unit.
//!
//! - [`PackagedInput`] - a material bought as a package (a bottle of resin,
//!   a box of 500 labels) whose unit cost is derived from price / quantity
//! - [`usage::MaterialUsage`] - how much of a packaged input (or of a
//!   manually priced item) one product unit consumes
//!
//! ## Example
//!
//! ```rust
//! use pricing_core::materials::{derive_packaged_unit_costs, PackagedInput, UnitKind};
//! use pricing_core::materials::usage::{total_material_cost, MaterialUsage};
//!
//! let inputs = vec![
//!     PackagedInput::new("Resin", 120.0, 1000.0, UnitKind::Volume),
//!     PackagedInput::new("Labels", 25.0, 500.0, UnitKind::Unit),
//! ];
//! let table = derive_packaged_unit_costs(&inputs);
//! assert_eq!(table["Resin"], 0.12);
//!
//! let usages = vec![
//!     MaterialUsage::linked("Resin", table["Resin"], 150.0),
//!     MaterialUsage::linked("Labels", table["Labels"], 2.0),
//!     MaterialUsage::manual("Gift box", 4.5, 1.0),
//! ];
//! let cost = total_material_cost(&usages);
//! assert!((cost - 22.6).abs() < 1e-9);
//! ```

pub mod usage;

pub use usage::{refresh_linked_costs, total_material_cost, MaterialSource, MaterialUsage};

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{PricingError, PricingResult};

/// Derived unit cost per packaged input name.
pub type UnitCostTable = BTreeMap<String, f64>;

/// What the package quantity counts. Informational only; the arithmetic
/// is identical for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitKind {
    /// Discrete pieces (labels, beads, boxes)
    #[default]
    Unit,
    /// Volume (ml of resin, paint, essence)
    Volume,
}

impl UnitKind {
    /// Short label for tables and prompts
    pub fn display_name(&self) -> &'static str {
        match self {
            UnitKind::Unit => "units",
            UnitKind::Volume => "volume",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A material purchased in bulk.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "Resin",
///   "package_price": 120.0,
///   "package_quantity": 1000.0,
///   "unit_kind": "Volume"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackagedInput {
    /// Name usages link against. Empty names are ignored by aggregation.
    pub name: String,

    /// Price paid for the whole package
    pub package_price: f64,

    /// Units or volume contained in the package
    pub package_quantity: f64,

    /// What `package_quantity` counts
    #[serde(default)]
    pub unit_kind: UnitKind,
}

impl PackagedInput {
    /// Create a packaged input.
    pub fn new(
        name: impl Into<String>,
        package_price: f64,
        package_quantity: f64,
        unit_kind: UnitKind,
    ) -> Self {
        PackagedInput {
            name: name.into(),
            package_price,
            package_quantity,
            unit_kind,
        }
    }

    /// Cost of a single unit (or volume unit) of this package.
    ///
    /// A non-positive package quantity degrades to zero cost instead of
    /// dividing by zero.
    pub fn unit_cost(&self) -> f64 {
        if self.package_quantity > 0.0 {
            self.package_price / self.package_quantity
        } else {
            0.0
        }
    }

    /// Whether the unit cost is the zero fallback for a bad quantity.
    pub fn is_degenerate(&self) -> bool {
        !(self.package_quantity > 0.0)
    }

    /// Validate at the input boundary. The aggregator itself never calls this.
    ///
    /// A non-positive package quantity passes: it is reported through
    /// [`is_degenerate`](Self::is_degenerate) and costs zero.
    pub fn validate(&self) -> PricingResult<()> {
        if self.name.trim().is_empty() {
            return Err(PricingError::invalid_input(
                "name",
                format!("{:?}", self.name),
                "Packaged input needs a name",
            ));
        }
        if self.package_price < 0.0 || !self.package_price.is_finite() {
            return Err(PricingError::invalid_input(
                "package_price",
                self.package_price.to_string(),
                "Package price must be a non-negative amount",
            ));
        }
        Ok(())
    }
}

/// Derive the unit cost of every named packaged input.
///
/// Inputs with an empty name are skipped; other names are keyed exactly as
/// given. When two inputs share a name the
/// later one wins. Zero or negative package quantities produce a unit cost
/// of `0.0` and a warning, never an error.
pub fn derive_packaged_unit_costs(inputs: &[PackagedInput]) -> UnitCostTable {
    let mut table = UnitCostTable::new();
    for input in inputs {
        if input.name.is_empty() {
            continue;
        }
        if input.is_degenerate() {
            tracing::warn!(
                name = %input.name,
                package_quantity = input.package_quantity,
                "non-positive package quantity, unit cost falls back to zero"
            );
        }
        table.insert(input.name.clone(), input.unit_cost());
    }
    table
}
