//! # pricing_core - Product Pricing Engine
//!
//! `pricing_core` is the computational heart of Margem: it turns material
//! costs, marketplace fees, taxes and shipping into profit figures, and
//! solves for the sale price that reaches a target profit. All inputs and
//! outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Total**: Losses and unreachable targets are values, not errors
//! - **Rich Errors**: Structured error types at the file and validation boundary
//!
//! ## Quick Start
//!
//! ```rust
//! use pricing_core::pricing::{evaluate_forward_price, suggest_price_for_target_profit};
//! use pricing_core::pricing::{PricingConfiguration, ProfitTarget};
//!
//! let config = PricingConfiguration::default();
//!
//! let breakdown = evaluate_forward_price(150.0, 30.0, &config);
//! println!("Net profit: {:.2}", breakdown.net_profit);
//!
//! let suggestion = suggest_price_for_target_profit(30.0, &config, ProfitTarget::Amount(20.0));
//! println!("Charge: {:.2}", suggestion.suggested_price);
//! ```
//!
//! ## Modules
//!
//! - [`materials`] - Packaged inputs, material usage, unit material cost
//! - [`pricing`] - Fees, forward and inverse price calculations
//! - [`snapshot`] - Configuration document owned by front ends
//! - [`file_io`] - Atomic snapshot saves and fail-closed restores
//! - [`export`] - CSV export of a breakdown
//! - [`units`] - Percent and fraction wrappers
//! - [`errors`] - Structured error types

pub mod errors;
pub mod export;
pub mod file_io;
pub mod materials;
pub mod pricing;
pub mod snapshot;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{PricingError, PricingResult};
pub use file_io::{load_snapshot, restore_into, save_snapshot};
pub use materials::{derive_packaged_unit_costs, total_material_cost, MaterialUsage, PackagedInput};
pub use pricing::{
    evaluate_forward_price, suggest_price_for_target_profit, FlexibleFee, PricingBreakdown,
    PricingConfiguration, ProfitTarget, SuggestionStatus,
};
pub use snapshot::PricingSnapshot;
