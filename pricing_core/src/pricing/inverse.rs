//! Inverse calculation: the sale price that realizes a target profit.
//!
//! Every cost is either proportional to the price (percentage fees, tax,
//! and in margin mode the target itself) or flat (materials, fixed cost,
//! flat fees, and in amount mode the target). The price must cover both:
//!
//! ```text
//! price = price * percent_fraction + flat_total
//! price = flat_total / (1 - percent_fraction)
//! ```
//!
//! When `1 - percent_fraction <= 0` no finite positive price works and the
//! suggestion comes back [`SuggestionStatus::Invalid`] with a zero price.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{evaluate_forward_price, PricingBreakdown, PricingConfiguration};
use crate::units::{Fraction, Percent};

/// What the seller wants to earn per unit.
///
/// ## JSON Example
///
/// ```json
/// { "mode": "MarginPct", "value": 20.0 }
/// { "mode": "Amount", "value": 20.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value")]
pub enum ProfitTarget {
    /// Net profit as a percentage of the sale price
    MarginPct(f64),
    /// Net profit as an absolute amount per unit
    Amount(f64),
}

impl Default for ProfitTarget {
    fn default() -> Self {
        ProfitTarget::MarginPct(20.0)
    }
}

impl fmt::Display for ProfitTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfitTarget::MarginPct(pct) => write!(f, "{} net margin", Percent(*pct)),
            ProfitTarget::Amount(amount) => write!(f, "{:.2} net profit", amount),
        }
    }
}

/// Both sides of the price-balance equation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceTerms {
    /// Share of the price consumed by percentage costs (and margin target)
    pub percent_fraction: Fraction,
    /// Amount the price must cover regardless of its size
    pub flat_total: f64,
}

impl PriceTerms {
    pub fn denominator(&self) -> f64 {
        self.percent_fraction.complement()
    }

    /// Whether some finite positive price satisfies the equation
    pub fn is_feasible(&self) -> bool {
        self.denominator() > 0.0
    }
}

/// Collect the price-proportional and flat parts of the cost structure.
pub fn price_terms(
    material_cost: f64,
    config: &PricingConfiguration,
    target: ProfitTarget,
) -> PriceTerms {
    let mut percent_fraction: Fraction = Percent(config.tax_percentage).into();
    let mut flat_total = material_cost + config.fixed_unit_cost;

    for (_, fee) in config.fees() {
        percent_fraction = percent_fraction + fee.price_fraction();
        flat_total += fee.flat_amount();
    }

    match target {
        ProfitTarget::MarginPct(pct) => percent_fraction = percent_fraction + Percent(pct).into(),
        ProfitTarget::Amount(amount) => flat_total += amount,
    }

    PriceTerms {
        percent_fraction,
        flat_total,
    }
}

/// Outcome of a price suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestionStatus {
    Ok,
    /// Percentage costs plus the margin target reach 100 % of the price
    Invalid,
}

/// Suggested price together with the terms that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSuggestion {
    /// Zero whenever `status` is `Invalid`
    pub suggested_price: f64,
    pub status: SuggestionStatus,
    pub terms: PriceTerms,
}

impl PriceSuggestion {
    pub fn is_ok(&self) -> bool {
        self.status == SuggestionStatus::Ok
    }

    /// The suggested price, or `None` when the target is unreachable
    pub fn price(&self) -> Option<f64> {
        self.is_ok().then_some(self.suggested_price)
    }
}

/// Solve for the sale price that yields `target`.
///
/// Only the denominator is checked. A negative `flat_total` (possible with
/// negative usage quantities or a negative target amount) comes back as a
/// negative price with status `Ok`; front ends should not present that as
/// a quote.
///
/// # Example
///
/// ```rust
/// use pricing_core::pricing::{suggest_price_for_target_profit, PricingConfiguration, ProfitTarget};
///
/// let config = PricingConfiguration::default(); // 15 fixed, 6 % tax, 15 % commission
/// let suggestion = suggest_price_for_target_profit(30.0, &config, ProfitTarget::Amount(20.0));
/// assert!(suggestion.is_ok());
/// assert!((suggestion.suggested_price - 82.2785).abs() < 1e-4);
/// ```
pub fn suggest_price_for_target_profit(
    material_cost: f64,
    config: &PricingConfiguration,
    target: ProfitTarget,
) -> PriceSuggestion {
    let terms = price_terms(material_cost, config, target);

    if !terms.is_feasible() {
        tracing::debug!(
            percent_fraction = terms.percent_fraction.0,
            %target,
            "target profit is unreachable, percentage costs reach the whole price"
        );
        return PriceSuggestion {
            suggested_price: 0.0,
            status: SuggestionStatus::Invalid,
            terms,
        };
    }

    PriceSuggestion {
        suggested_price: terms.flat_total / terms.denominator(),
        status: SuggestionStatus::Ok,
        terms,
    }
}

/// A suggestion plus the full breakdown at the suggested price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub target: ProfitTarget,
    pub suggestion: PriceSuggestion,
    /// Present only when the suggestion is `Ok`
    pub breakdown: Option<PricingBreakdown>,
}

/// Suggest a price for `target` and evaluate it forward.
pub fn quote_for_target(
    material_cost: f64,
    config: &PricingConfiguration,
    target: ProfitTarget,
) -> PriceQuote {
    let suggestion = suggest_price_for_target_profit(material_cost, config, target);
    let breakdown = suggestion
        .price()
        .map(|price| evaluate_forward_price(price, material_cost, config));
    PriceQuote {
        target,
        suggestion,
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::FlexibleFee;

    fn reference_config() -> PricingConfiguration {
        PricingConfiguration {
            fixed_unit_cost: 15.0,
            tax_percentage: 6.0,
            commission_fee: FlexibleFee::percentage(15.0),
            per_item_fee: FlexibleFee::flat(0.0),
            shipping_cost: FlexibleFee::flat(0.0),
        }
    }

    #[test]
    fn test_amount_target_reference_scenario() {
        let config = reference_config();
        let suggestion = suggest_price_for_target_profit(30.0, &config, ProfitTarget::Amount(20.0));

        assert!((suggestion.terms.flat_total - 65.0).abs() < 1e-9);
        assert!((suggestion.terms.percent_fraction.0 - 0.21).abs() < 1e-9);
        assert!((suggestion.terms.denominator() - 0.79).abs() < 1e-9);
        assert_eq!(suggestion.status, SuggestionStatus::Ok);
        assert!((suggestion.suggested_price - 82.278_481).abs() < 1e-5);

        let breakdown = evaluate_forward_price(suggestion.suggested_price, 30.0, &config);
        assert!((breakdown.net_profit - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_margin_target() {
        let config = reference_config();
        let suggestion = suggest_price_for_target_profit(30.0, &config, ProfitTarget::MarginPct(20.0));
        assert!(suggestion.is_ok());

        // 45 / (1 - 0.41)
        assert!((suggestion.suggested_price - 45.0 / 0.59).abs() < 1e-9);

        let breakdown = evaluate_forward_price(suggestion.suggested_price, 30.0, &config);
        assert!((breakdown.net_margin_pct() - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_flat_fees_go_to_flat_total() {
        let config = PricingConfiguration {
            commission_fee: FlexibleFee::flat(3.0),
            per_item_fee: FlexibleFee::flat(2.0),
            shipping_cost: FlexibleFee::percentage(10.0),
            ..reference_config()
        };
        let terms = price_terms(30.0, &config, ProfitTarget::Amount(0.0));
        assert!((terms.flat_total - 50.0).abs() < 1e-9);
        assert!((terms.percent_fraction.0 - 0.16).abs() < 1e-9);
    }

    #[test]
    fn test_infeasible_margin_returns_invalid() {
        let config = PricingConfiguration {
            tax_percentage: 45.0,
            commission_fee: FlexibleFee::percentage(60.0),
            ..reference_config()
        };
        for margin in [0.0, 10.0, 50.0] {
            let suggestion = suggest_price_for_target_profit(30.0, &config, ProfitTarget::MarginPct(margin));
            assert!(suggestion.terms.percent_fraction.0 >= 1.0);
            assert_eq!(suggestion.status, SuggestionStatus::Invalid);
            assert_eq!(suggestion.suggested_price, 0.0);
            assert_eq!(suggestion.price(), None);
        }
    }

    #[test]
    fn test_exactly_one_hundred_percent_is_invalid() {
        let config = PricingConfiguration {
            tax_percentage: 0.0,
            commission_fee: FlexibleFee::percentage(80.0),
            ..reference_config()
        };
        let suggestion = suggest_price_for_target_profit(30.0, &config, ProfitTarget::MarginPct(20.0));
        assert_eq!(suggestion.status, SuggestionStatus::Invalid);
    }

    #[test]
    fn test_negative_flat_total_gives_negative_price() {
        let config = reference_config();
        let suggestion = suggest_price_for_target_profit(-100.0, &config, ProfitTarget::MarginPct(0.0));
        assert_eq!(suggestion.status, SuggestionStatus::Ok);
        assert!(suggestion.terms.flat_total < 0.0);
        assert!((suggestion.suggested_price - (-85.0 / 0.79)).abs() < 1e-9);
    }

    #[test]
    fn test_quote_includes_breakdown_only_when_ok() {
        let config = reference_config();
        let quote = quote_for_target(30.0, &config, ProfitTarget::Amount(20.0));
        let breakdown = quote.breakdown.expect("feasible target has a breakdown");
        assert_eq!(breakdown.sale_price, quote.suggestion.suggested_price);

        let config = PricingConfiguration {
            commission_fee: FlexibleFee::percentage(100.0),
            ..reference_config()
        };
        let quote = quote_for_target(30.0, &config, ProfitTarget::Amount(20.0));
        assert!(quote.breakdown.is_none());
    }

    #[test]
    fn test_target_serialization() {
        let json = serde_json::to_string(&ProfitTarget::Amount(20.0)).unwrap();
        assert_eq!(json, r#"{"mode":"Amount","value":20.0}"#);
        let target: ProfitTarget = serde_json::from_str(r#"{"mode":"MarginPct","value":12.5}"#).unwrap();
        assert_eq!(target, ProfitTarget::MarginPct(12.5));
    }
}
