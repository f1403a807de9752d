//! # Pricing Engine
//!
//! Turns a unit material cost plus a [`PricingConfiguration`] into profit
//! figures, in both directions:
//!
//! - [`forward`] - sale price in, [`PricingBreakdown`] out
//! - [`inverse`] - target profit in, suggested sale price out
//!
//! Every function here is pure and total. Losses are ordinary results,
//! and an unreachable target is reported through
//! [`inverse::SuggestionStatus::Invalid`] rather than an error.
//!
//! ## Example
//!
//! ```rust
//! use pricing_core::pricing::{evaluate_forward_price, FlexibleFee, PricingConfiguration};
//!
//! let config = PricingConfiguration {
//!     fixed_unit_cost: 15.0,
//!     tax_percentage: 6.0,
//!     commission_fee: FlexibleFee::percentage(15.0),
//!     per_item_fee: FlexibleFee::flat(0.0),
//!     shipping_cost: FlexibleFee::flat(0.0),
//! };
//!
//! let breakdown = evaluate_forward_price(150.0, 30.0, &config);
//! assert!((breakdown.net_profit - 73.5).abs() < 1e-9);
//! ```

pub mod forward;
pub mod inverse;

pub use forward::evaluate_forward_price;
pub use inverse::{
    price_terms, quote_for_target, suggest_price_for_target_profit, PriceQuote, PriceSuggestion,
    PriceTerms, ProfitTarget, SuggestionStatus,
};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{PricingError, PricingResult};
use crate::units::{Fraction, Percent};

/// Net profit within this distance of zero counts as break-even.
pub const BREAK_EVEN_TOLERANCE: f64 = 1e-9;

// ============================================================================
// Flexible Fees
// ============================================================================

/// How a fee's magnitude is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeeKind {
    /// Magnitude is a percentage of the sale price
    Percentage,
    /// Magnitude is a currency amount, independent of the sale price
    #[default]
    Flat,
}

/// A cost that is either a percentage of the sale price or a flat amount.
///
/// ## JSON Example
///
/// ```json
/// { "kind": "Percentage", "magnitude": 15.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FlexibleFee {
    pub kind: FeeKind,
    /// Percent (0-100) for `Percentage`, currency amount for `Flat`
    pub magnitude: f64,
}

impl FlexibleFee {
    pub fn percentage(pct: f64) -> Self {
        FlexibleFee {
            kind: FeeKind::Percentage,
            magnitude: pct,
        }
    }

    pub fn flat(amount: f64) -> Self {
        FlexibleFee {
            kind: FeeKind::Flat,
            magnitude: amount,
        }
    }

    /// Currency amount this fee costs at `sale_price`.
    pub fn amount_at(&self, sale_price: f64) -> f64 {
        match self.kind {
            FeeKind::Percentage => Percent(self.magnitude).of(sale_price),
            FeeKind::Flat => self.magnitude,
        }
    }

    /// Share of the sale price this fee takes (zero for flat fees).
    pub fn price_fraction(&self) -> Fraction {
        match self.kind {
            FeeKind::Percentage => Percent(self.magnitude).into(),
            FeeKind::Flat => Fraction(0.0),
        }
    }

    /// Amount owed regardless of price (zero for percentage fees).
    pub fn flat_amount(&self) -> f64 {
        match self.kind {
            FeeKind::Percentage => 0.0,
            FeeKind::Flat => self.magnitude,
        }
    }

    /// Validate at the input boundary.
    pub fn validate(&self, field: &str) -> PricingResult<()> {
        if !self.magnitude.is_finite() || self.magnitude < 0.0 {
            return Err(PricingError::invalid_input(
                field,
                self.magnitude.to_string(),
                "Fee must be a non-negative number",
            ));
        }
        if self.kind == FeeKind::Percentage && !Percent(self.magnitude).is_bounded() {
            return Err(PricingError::invalid_input(
                field,
                self.magnitude.to_string(),
                "Percentage fee must be between 0 and 100",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for FlexibleFee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FeeKind::Percentage => write!(f, "{}", Percent(self.magnitude)),
            FeeKind::Flat => write!(f, "{:.2} flat", self.magnitude),
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Everything besides materials that eats into the sale price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingConfiguration {
    /// Flat cost per unit not covered by materials (labor, packaging)
    pub fixed_unit_cost: f64,

    /// Tax on the sale price, in percent
    pub tax_percentage: f64,

    /// Marketplace commission
    pub commission_fee: FlexibleFee,

    /// Per-sale listing or transaction fee
    pub per_item_fee: FlexibleFee,

    /// Shipping paid by the seller
    pub shipping_cost: FlexibleFee,
}

impl Default for PricingConfiguration {
    fn default() -> Self {
        PricingConfiguration {
            fixed_unit_cost: 15.0,
            tax_percentage: 6.0,
            commission_fee: FlexibleFee::percentage(15.0),
            per_item_fee: FlexibleFee::flat(0.0),
            shipping_cost: FlexibleFee::flat(0.0),
        }
    }
}

impl PricingConfiguration {
    /// The three flexible fees with their field names
    pub fn fees(&self) -> [(&'static str, FlexibleFee); 3] {
        [
            ("commission_fee", self.commission_fee),
            ("per_item_fee", self.per_item_fee),
            ("shipping_cost", self.shipping_cost),
        ]
    }

    /// Validate at the input boundary. The engine never calls this.
    pub fn validate(&self) -> PricingResult<()> {
        if !self.fixed_unit_cost.is_finite() || self.fixed_unit_cost < 0.0 {
            return Err(PricingError::invalid_input(
                "fixed_unit_cost",
                self.fixed_unit_cost.to_string(),
                "Fixed cost must be a non-negative amount",
            ));
        }
        if !Percent(self.tax_percentage).is_bounded() {
            return Err(PricingError::invalid_input(
                "tax_percentage",
                self.tax_percentage.to_string(),
                "Tax must be between 0 and 100 percent",
            ));
        }
        for (field, fee) in self.fees() {
            fee.validate(field)?;
        }
        Ok(())
    }
}

// ============================================================================
// Results
// ============================================================================

/// Sign of the net profit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfitStatus {
    Profit,
    BreakEven,
    Loss,
}

impl ProfitStatus {
    pub fn from_net_profit(net_profit: f64) -> Self {
        if net_profit.abs() <= BREAK_EVEN_TOLERANCE {
            ProfitStatus::BreakEven
        } else if net_profit > 0.0 {
            ProfitStatus::Profit
        } else {
            ProfitStatus::Loss
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProfitStatus::Profit => "PROFIT",
            ProfitStatus::BreakEven => "BREAK-EVEN",
            ProfitStatus::Loss => "LOSS",
        }
    }
}

/// All amounts derived from one sale price.
///
/// ## JSON Example
///
/// ```json
/// {
///   "sale_price": 150.0,
///   "total_sale_cost": 76.5,
///   "gross_profit": 105.0,
///   "net_profit": 73.5,
///   "tax_amount": 9.0,
///   "base_production_cost": 45.0,
///   "commission_amount": 22.5,
///   "per_item_amount": 0.0,
///   "shipping_amount": 0.0
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    /// Price the figures were computed at
    pub sale_price: f64,

    /// Production cost plus every fee and the tax
    pub total_sale_cost: f64,

    /// Sale price minus production cost only
    pub gross_profit: f64,

    /// Sale price minus everything
    pub net_profit: f64,

    pub tax_amount: f64,

    /// Materials plus fixed unit cost
    pub base_production_cost: f64,

    pub commission_amount: f64,
    pub per_item_amount: f64,
    pub shipping_amount: f64,
}

impl PricingBreakdown {
    /// Fees plus tax: everything between gross and net profit
    pub fn total_fees(&self) -> f64 {
        self.commission_amount + self.per_item_amount + self.shipping_amount + self.tax_amount
    }

    /// Net profit as a percentage of the sale price (0 at a zero price)
    pub fn net_margin_pct(&self) -> f64 {
        if self.sale_price == 0.0 {
            0.0
        } else {
            self.net_profit / self.sale_price * 100.0
        }
    }

    pub fn profit_status(&self) -> ProfitStatus {
        ProfitStatus::from_net_profit(self.net_profit)
    }

    /// How much the price would have to rise to break even (0 when profitable)
    pub fn shortfall(&self) -> f64 {
        (-self.net_profit).max(0.0)
    }
}
