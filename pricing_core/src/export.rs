//! Tabular export of a single breakdown.
//!
//! Writes one `metric,value` row per figure, preceded by the price and the
//! margin that produced it. Write-only: there is no import path.
//!
//! ```text
//! metric,value
//! Sale price,150.00
//! Net margin (%),49.00
//! Base production cost,45.00
//! ...
//! ```

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::errors::{PricingError, PricingResult};
use crate::pricing::{PricingBreakdown, ProfitTarget};
use crate::units::round_cents;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub metric: &'static str,
    pub value: String,
}

impl ExportRow {
    fn amount(metric: &'static str, amount: f64) -> Self {
        ExportRow {
            metric,
            value: format!("{:.2}", round_cents(amount)),
        }
    }
}

/// Rows for `breakdown`.
///
/// The margin row carries the requested target margin when the price came
/// from a margin target, otherwise the realized net margin.
pub fn breakdown_rows(breakdown: &PricingBreakdown, target: Option<ProfitTarget>) -> Vec<ExportRow> {
    let margin_pct = match target {
        Some(ProfitTarget::MarginPct(pct)) => pct,
        _ => breakdown.net_margin_pct(),
    };

    let mut rows = vec![
        ExportRow::amount("Sale price", breakdown.sale_price),
        ExportRow {
            metric: "Net margin (%)",
            value: format!("{:.2}", margin_pct),
        },
    ];
    if let Some(ProfitTarget::Amount(amount)) = target {
        rows.push(ExportRow::amount("Target profit", amount));
    }
    rows.extend([
        ExportRow::amount("Base production cost", breakdown.base_production_cost),
        ExportRow::amount("Commission", breakdown.commission_amount),
        ExportRow::amount("Per-item fee", breakdown.per_item_amount),
        ExportRow::amount("Shipping", breakdown.shipping_amount),
        ExportRow::amount("Tax", breakdown.tax_amount),
        ExportRow::amount("Total sale cost", breakdown.total_sale_cost),
        ExportRow::amount("Gross profit", breakdown.gross_profit),
        ExportRow::amount("Net profit", breakdown.net_profit),
        ExportRow {
            metric: "Status",
            value: breakdown.profit_status().display_name().to_string(),
        },
    ]);
    rows
}

/// Write the CSV table to any writer.
pub fn write_breakdown_csv<W: Write>(
    writer: W,
    breakdown: &PricingBreakdown,
    target: Option<ProfitTarget>,
) -> PricingResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in breakdown_rows(breakdown, target) {
        csv_writer.serialize(row)?;
    }
    csv_writer
        .flush()
        .map_err(|e| PricingError::ExportError { reason: e.to_string() })?;
    Ok(())
}

/// Write the CSV table to `path`, replacing any existing file.
pub fn export_breakdown_csv(
    path: &Path,
    breakdown: &PricingBreakdown,
    target: Option<ProfitTarget>,
) -> PricingResult<()> {
    let file = std::fs::File::create(path)
        .map_err(|e| PricingError::file_error("create export", path.display().to_string(), e.to_string()))?;
    write_breakdown_csv(file, breakdown, target)?;
    tracing::info!(path = %path.display(), "breakdown exported");
    Ok(())
}
