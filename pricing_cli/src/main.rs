//! # Margem CLI Application
//!
//! Prompt-driven terminal front end for the pricing engine.
//!
//! ```text
//! pricing_cli [SNAPSHOT.json] [--save PATH] [--export PATH]
//! ```
//!
//! Without a snapshot the CLI starts from a demo product. Log verbosity is
//! read from `PRICING_LOG` (error, warn, info, debug, trace; default warn).

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;

use pricing_core::errors::{PricingError, PricingResult};
use pricing_core::export::export_breakdown_csv;
use pricing_core::file_io::{restore_into, save_snapshot};
use pricing_core::materials::{MaterialUsage, PackagedInput, UnitKind};
use pricing_core::pricing::{PricingBreakdown, ProfitStatus, ProfitTarget};
use pricing_core::snapshot::PricingSnapshot;
use pricing_core::units::Percent;

const USAGE: &str = "usage: pricing_cli [SNAPSHOT.json] [--save PATH] [--export PATH]";

#[derive(Debug, Default)]
struct Args {
    snapshot: Option<PathBuf>,
    save: Option<PathBuf>,
    export: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--save" => {
                args.save = Some(iter.next().ok_or("--save needs a path")?.into());
            }
            "--export" => {
                args.export = Some(iter.next().ok_or("--export needs a path")?.into());
            }
            "-h" | "--help" => {
                return Err(USAGE.to_string());
            }
            other if other.starts_with("--") => return Err(format!("unknown option '{}'", other)),
            other => args.snapshot = Some(other.into()),
        }
    }
    Ok(args)
}

fn init_logging() {
    let level = std::env::var("PRICING_LOG")
        .ok()
        .and_then(|value| tracing::Level::from_str(&value).ok())
        .unwrap_or(tracing::Level::WARN);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn prompt_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input).ok()?;
    Some(input.trim().to_string())
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    prompt_line(prompt)
        .and_then(|input| input.parse().ok())
        .unwrap_or(default)
}

fn prompt_target() -> ProfitTarget {
    let mode = prompt_line("Target by (m)argin % or (a)mount? [a]: ").unwrap_or_default();
    if mode.eq_ignore_ascii_case("m") {
        ProfitTarget::MarginPct(prompt_f64("Enter target net margin (%) [20.0]: ", 20.0))
    } else {
        ProfitTarget::Amount(prompt_f64("Enter target net profit per unit [20.00]: ", 20.0))
    }
}

/// The original one-screen calculator: 30.00 of materials, defaults elsewhere.
fn demo_snapshot() -> PricingSnapshot {
    let mut snapshot = PricingSnapshot::new("Demo product");
    snapshot.add_packaged_input(PackagedInput::new("Fabric roll", 90.0, 6.0, UnitKind::Unit));
    snapshot.add_usage(MaterialUsage::linked("Fabric roll", 15.0, 1.0));
    snapshot.add_usage(MaterialUsage::manual("Trims and thread", 15.0, 1.0));
    snapshot
}

/// The demo product, or the snapshot at `path`. A snapshot that cannot be
/// loaded is an error: nothing downstream may run on substituted data.
fn starting_snapshot(path: Option<&Path>) -> PricingResult<PricingSnapshot> {
    let mut snapshot = demo_snapshot();
    let Some(path) = path else {
        return Ok(snapshot);
    };

    let defaulted = restore_into(&mut snapshot, path)?;
    println!("Loaded snapshot '{}' from {}", snapshot.meta.label, path.display());
    if !defaulted.is_empty() {
        println!("  [WARN] defaulted: {}", defaulted.join(", "));
    }
    println!();
    Ok(snapshot)
}

fn exit_with_error(e: &PricingError) -> ! {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
    process::exit(1);
}

fn main() {
    init_logging();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            process::exit(2);
        }
    };

    println!("Margem CLI - Pricing Calculator");
    println!("===============================");
    println!();

    let mut snapshot = match starting_snapshot(args.snapshot.as_deref()) {
        Ok(snapshot) => snapshot,
        Err(e) => exit_with_error(&e),
    };

    if let Err(e) = snapshot.validate() {
        exit_with_error(&e);
    }

    for name in snapshot.sync_linked_costs() {
        println!("[WARN] '{}' is linked but no packaged input has that name", name);
    }

    print_materials(&snapshot);

    let sale_price = prompt_f64("Enter sale price [150.00]: ", 150.0);
    let breakdown = snapshot.evaluate(sale_price);
    println!();
    print_breakdown("FORWARD CALCULATION", &breakdown);

    println!();
    let target = prompt_target();
    let quote = snapshot.quote(target);
    println!();
    println!("═══════════════════════════════════════");
    println!("  PRICE SUGGESTION ({})", target);
    println!("═══════════════════════════════════════");
    println!(
        "  Percentage costs: {}   Flat costs: {:.2}",
        Percent::from(quote.suggestion.terms.percent_fraction),
        quote.suggestion.terms.flat_total
    );
    match quote.breakdown {
        Some(at_price) => {
            println!("  Suggested price:  {:.2}", quote.suggestion.suggested_price);
            println!();
            print_breakdown("AT SUGGESTED PRICE", &at_price);
        }
        None => {
            println!("  [INVALID] Percentage-based costs plus the target reach 100% of the price.");
            println!("  Lower the fees, the tax or the target margin.");
        }
    }

    if let Some(path) = &args.save {
        match save_snapshot(&snapshot, path) {
            Ok(()) => println!("Snapshot saved to {}", path.display()),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    if let Some(path) = &args.export {
        match export_breakdown_csv(path, &breakdown, None) {
            Ok(()) => println!("Breakdown exported to {}", path.display()),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    println!();
    println!("JSON Output (for API use):");
    if let Ok(json) = serde_json::to_string_pretty(&quote) {
        println!("{}", json);
    }
}

fn print_materials(snapshot: &PricingSnapshot) {
    println!("Materials for '{}':", snapshot.meta.label);
    for usage in &snapshot.material_usages {
        println!(
            "  {:<24} {:>8.4} x {:>8.2} = {:>8.2}",
            usage.source.label(),
            usage.unit_cost(),
            usage.quantity_used,
            usage.line_cost()
        );
    }
    println!("  Unit material cost: {:.2}", snapshot.material_cost());
    println!(
        "  Fixed cost: {:.2}   Tax: {}   Commission: {}   Per item: {}   Shipping: {}",
        snapshot.configuration.fixed_unit_cost,
        Percent(snapshot.configuration.tax_percentage),
        snapshot.configuration.commission_fee,
        snapshot.configuration.per_item_fee,
        snapshot.configuration.shipping_cost
    );
    println!();
}

fn print_breakdown(title: &str, b: &PricingBreakdown) {
    println!("═══════════════════════════════════════");
    println!("  {}", title);
    println!("═══════════════════════════════════════");
    println!("  Sale price:           {:>10.2}", b.sale_price);
    println!("  Production cost:      {:>10.2}", b.base_production_cost);
    println!("  Gross profit:         {:>10.2}", b.gross_profit);
    println!("  Commission:           {:>10.2}", b.commission_amount);
    println!("  Per-item fee:         {:>10.2}", b.per_item_amount);
    println!("  Shipping:             {:>10.2}", b.shipping_amount);
    println!("  Tax:                  {:>10.2}", b.tax_amount);
    println!("  Total sale cost:      {:>10.2}", b.total_sale_cost);
    println!("  Net profit:           {:>10.2}  ({:.2}% margin)", b.net_profit, b.net_margin_pct());
    println!();
    println!("  RESULT: {}", status_icon(b.profit_status()));
    if b.profit_status() == ProfitStatus::Loss {
        println!("  Raise the price or cut costs by {:.2} to break even.", b.shortfall());
    }
}

fn status_icon(status: ProfitStatus) -> &'static str {
    match status {
        ProfitStatus::Profit => "[OK] PROFIT",
        ProfitStatus::BreakEven => "[WARN] BREAK-EVEN",
        ProfitStatus::Loss => "[FAIL] LOSS",
    }
}
