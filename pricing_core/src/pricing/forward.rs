//! Forward calculation: profit from a chosen sale price.

use super::{PricingBreakdown, PricingConfiguration};
use crate::units::Percent;

/// Compute every cost and profit figure for `sale_price`.
///
/// Negative gross or net profit is a valid loss scenario. No bounds are
/// checked here; validate the configuration at the input boundary.
///
/// # Example
///
/// ```rust
/// use pricing_core::pricing::{evaluate_forward_price, PricingConfiguration};
///
/// let breakdown = evaluate_forward_price(150.0, 30.0, &PricingConfiguration::default());
/// assert!((breakdown.total_sale_cost - 76.5).abs() < 1e-9);
/// assert!((breakdown.gross_profit - 105.0).abs() < 1e-9);
/// ```
pub fn evaluate_forward_price(
    sale_price: f64,
    material_cost: f64,
    config: &PricingConfiguration,
) -> PricingBreakdown {
    let commission_amount = config.commission_fee.amount_at(sale_price);
    let per_item_amount = config.per_item_fee.amount_at(sale_price);
    let shipping_amount = config.shipping_cost.amount_at(sale_price);
    let tax_amount = Percent(config.tax_percentage).of(sale_price);

    let base_production_cost = material_cost + config.fixed_unit_cost;
    let total_sale_cost =
        base_production_cost + commission_amount + per_item_amount + shipping_amount + tax_amount;

    let breakdown = PricingBreakdown {
        sale_price,
        total_sale_cost,
        gross_profit: sale_price - base_production_cost,
        net_profit: sale_price - total_sale_cost,
        tax_amount,
        base_production_cost,
        commission_amount,
        per_item_amount,
        shipping_amount,
    };
    tracing::debug!(sale_price, net_profit = breakdown.net_profit, "forward price evaluated");
    breakdown
}
