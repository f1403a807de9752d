//! Material usage per product unit.
//!
//! A usage either links to a [`PackagedInput`](super::PackagedInput) by name,
//! carrying a copy of its derived unit cost, or is priced manually.

use serde::{Deserialize, Serialize};

use super::UnitCostTable;
use crate::errors::{PricingError, PricingResult};

/// Where a usage's unit cost comes from.
///
/// ## JSON Example
///
/// ```json
/// { "type": "Linked", "name": "Resin", "unit_cost": 0.12 }
/// { "type": "Manual", "description": "Gift box", "unit_cost": 4.5 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MaterialSource {
    /// Tracks a packaged input. `unit_cost` is a copy refreshed by
    /// [`refresh_linked_costs`], not a live reference.
    Linked { name: String, unit_cost: f64 },

    /// Cost typed in directly
    Manual { description: String, unit_cost: f64 },
}

impl MaterialSource {
    /// Unit cost currently carried by this source
    pub fn unit_cost(&self) -> f64 {
        match self {
            MaterialSource::Linked { unit_cost, .. } => *unit_cost,
            MaterialSource::Manual { unit_cost, .. } => *unit_cost,
        }
    }

    /// Packaged input name or manual description
    pub fn label(&self) -> &str {
        match self {
            MaterialSource::Linked { name, .. } => name,
            MaterialSource::Manual { description, .. } => description,
        }
    }

    pub fn is_linked(&self) -> bool {
        matches!(self, MaterialSource::Linked { .. })
    }
}

/// How much of one material a single product unit consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialUsage {
    pub source: MaterialSource,

    /// Quantity used per product unit, in the package's unit kind
    pub quantity_used: f64,
}

impl MaterialUsage {
    /// Usage linked to a packaged input, seeded with its current unit cost.
    pub fn linked(name: impl Into<String>, unit_cost: f64, quantity_used: f64) -> Self {
        MaterialUsage {
            source: MaterialSource::Linked {
                name: name.into(),
                unit_cost,
            },
            quantity_used,
        }
    }

    /// Manually priced usage.
    pub fn manual(description: impl Into<String>, unit_cost: f64, quantity_used: f64) -> Self {
        MaterialUsage {
            source: MaterialSource::Manual {
                description: description.into(),
                unit_cost,
            },
            quantity_used,
        }
    }

    pub fn unit_cost(&self) -> f64 {
        self.source.unit_cost()
    }

    /// `unit_cost * quantity_used`
    pub fn line_cost(&self) -> f64 {
        self.unit_cost() * self.quantity_used
    }

    /// Validate at the input boundary. [`total_material_cost`] accepts
    /// anything and multiplies through.
    pub fn validate(&self) -> PricingResult<()> {
        if !(self.quantity_used > 0.0) || !self.quantity_used.is_finite() {
            return Err(PricingError::invalid_input(
                "quantity_used",
                self.quantity_used.to_string(),
                format!("Quantity used of '{}' must be positive", self.source.label()),
            ));
        }
        if let MaterialSource::Manual { unit_cost, .. } = &self.source {
            if *unit_cost < 0.0 || !unit_cost.is_finite() {
                return Err(PricingError::invalid_input(
                    "unit_cost",
                    unit_cost.to_string(),
                    "Manual unit cost must be a non-negative amount",
                ));
            }
        }
        Ok(())
    }
}

/// Material cost of one product unit: sum of `unit_cost * quantity_used`.
///
/// Empty input yields `0.0`. Zero or negative quantities are multiplied
/// through unchanged.
pub fn total_material_cost(usages: &[MaterialUsage]) -> f64 {
    usages.iter().map(MaterialUsage::line_cost).sum()
}

/// Re-copy the unit cost of every linked usage from `table`.
///
/// Returns the names of linked usages whose packaged input no longer
/// exists; those keep the cost they were last given.
pub fn refresh_linked_costs(usages: &mut [MaterialUsage], table: &UnitCostTable) -> Vec<String> {
    let mut orphaned = Vec::new();
    for usage in usages.iter_mut() {
        if let MaterialSource::Linked { name, unit_cost } = &mut usage.source {
            match table.get(name.as_str()) {
                Some(cost) => *unit_cost = *cost,
                None => {
                    tracing::warn!(
                        name = %name,
                        "linked material has no packaged input, keeping last unit cost"
                    );
                    orphaned.push(name.clone());
                }
            }
        }
    }
    orphaned
}
