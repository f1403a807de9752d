//! End-to-end scenarios: raw inputs through aggregation to both
//! calculation directions.

use pricing_core::materials::{
    derive_packaged_unit_costs, total_material_cost, MaterialUsage, PackagedInput, UnitKind,
};
use pricing_core::pricing::{
    evaluate_forward_price, quote_for_target, suggest_price_for_target_profit, FlexibleFee,
    PricingConfiguration, ProfitStatus, ProfitTarget, SuggestionStatus,
};
use pricing_core::snapshot::PricingSnapshot;

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
fn aggregation_identities() {
    assert_eq!(total_material_cost(&[]), 0.0);
    assert_eq!(total_material_cost(&[MaterialUsage::manual("Bead", 2.5, 4.0)]), 10.0);

    let table = derive_packaged_unit_costs(&[PackagedInput::new("X", 10.0, 0.0, UnitKind::Unit)]);
    assert_eq!(table.len(), 1);
    assert_eq!(table["X"], 0.0);
}

#[test]
fn forward_reference_scenario() {
    let r = evaluate_forward_price(150.0, 30.0, &reference_config());
    assert!((r.commission_amount - 22.50).abs() < 1e-9);
    assert!((r.tax_amount - 9.00).abs() < 1e-9);
    assert!((r.base_production_cost - 45.00).abs() < 1e-9);
    assert!((r.total_sale_cost - 76.50).abs() < 1e-9);
    assert!((r.gross_profit - 105.00).abs() < 1e-9);
    assert!((r.net_profit - 73.50).abs() < 1e-9);
}

#[test]
fn inverse_reference_scenario() {
    let config = reference_config();
    let suggestion = suggest_price_for_target_profit(30.0, &config, ProfitTarget::Amount(20.0));
    assert_eq!(suggestion.status, SuggestionStatus::Ok);
    assert!((suggestion.terms.flat_total - 65.0).abs() < 1e-9);
    assert!((suggestion.terms.percent_fraction.0 - 0.21).abs() < 1e-9);
    assert!((suggestion.terms.denominator() - 0.79).abs() < 1e-9);
    assert!((suggestion.suggested_price - 82.2785).abs() < 1e-4);

    let r = evaluate_forward_price(suggestion.suggested_price, 30.0, &config);
    assert!((r.net_profit - 20.0).abs() < 1e-6);
}

#[test]
fn infeasibility_boundary() {
    let config = PricingConfiguration {
        tax_percentage: 45.0,
        commission_fee: FlexibleFee::percentage(60.0),
        ..reference_config()
    };
    let quote = quote_for_target(30.0, &config, ProfitTarget::MarginPct(0.0));
    assert_eq!(quote.suggestion.status, SuggestionStatus::Invalid);
    assert_eq!(quote.suggestion.suggested_price, 0.0);
    assert!(quote.breakdown.is_none());
}

#[test]
fn handmade_product_from_raw_inputs() {
    let mut snapshot = PricingSnapshot::new("Macrame keychain");
    snapshot.add_packaged_input(PackagedInput::new("Cotton cord", 32.0, 200.0, UnitKind::Unit));
    snapshot.add_packaged_input(PackagedInput::new("Key ring", 18.0, 100.0, UnitKind::Unit));
    snapshot.add_usage(MaterialUsage::linked("Cotton cord", 0.0, 3.0));
    snapshot.add_usage(MaterialUsage::linked("Key ring", 0.0, 1.0));
    snapshot.add_usage(MaterialUsage::manual("Tag", 0.5, 1.0));
    snapshot.set_configuration(PricingConfiguration {
        fixed_unit_cost: 4.0,
        tax_percentage: 6.0,
        commission_fee: FlexibleFee::percentage(12.0),
        per_item_fee: FlexibleFee::flat(1.0),
        shipping_cost: FlexibleFee::flat(0.0),
    });

    // 0.16 * 3 + 0.18 + 0.5
    assert!((snapshot.material_cost() - 1.16).abs() < 1e-9);

    let at_ten = snapshot.evaluate(10.0);
    assert_eq!(at_ten.profit_status(), ProfitStatus::Profit);

    let at_five = snapshot.evaluate(5.0);
    assert_eq!(at_five.profit_status(), ProfitStatus::Loss);
    assert!((at_five.shortfall() - (-at_five.net_profit)).abs() < 1e-12);

    let quote = snapshot.quote(ProfitTarget::MarginPct(30.0));
    let breakdown = quote.breakdown.expect("30% margin is reachable");
    assert!((breakdown.net_margin_pct() - 30.0).abs() < 1e-6);
}
