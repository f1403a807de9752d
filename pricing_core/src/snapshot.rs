//! # Pricing Snapshot
//!
//! The configuration document a front end owns and hands to the engine by
//! value. Snapshots serialize to human-readable JSON for backups.
//!
//! ## Structure
//!
//! ```text
//! PricingSnapshot
//! ├── meta: SnapshotMetadata (version, id, label, timestamps)
//! ├── packaged_inputs: Vec<PackagedInput>
//! ├── material_usages: Vec<MaterialUsage>
//! └── configuration: PricingConfiguration
//! ```
//!
//! ## Restoring
//!
//! [`PricingSnapshot::restore_from_str`] decodes each top-level key on its
//! own. A missing or malformed key falls back to its default and is listed
//! in [`Restored::defaulted_keys`]. Text that is not a JSON object, a `meta`
//! object without a `version`, or a file written by an incompatible schema
//! version is rejected.
//!
//! ## Example
//!
//! ```rust
//! use pricing_core::materials::{MaterialUsage, PackagedInput, UnitKind};
//! use pricing_core::snapshot::PricingSnapshot;
//!
//! let mut snapshot = PricingSnapshot::new("Scented candle");
//! snapshot.add_packaged_input(PackagedInput::new("Wax", 60.0, 1000.0, UnitKind::Volume));
//! snapshot.add_usage(MaterialUsage::linked("Wax", 0.0, 200.0));
//! snapshot.add_usage(MaterialUsage::manual("Jar", 6.0, 1.0));
//!
//! assert!((snapshot.material_cost() - 18.0).abs() < 1e-9);
//!
//! let json = snapshot.to_json().unwrap();
//! let restored = PricingSnapshot::restore_from_str(&json).unwrap();
//! assert_eq!(restored.snapshot, snapshot);
//! ```

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::{PricingError, PricingResult};
use crate::materials::{
    derive_packaged_unit_costs, refresh_linked_costs, total_material_cost, MaterialUsage,
    PackagedInput, UnitCostTable,
};
use crate::pricing::{
    evaluate_forward_price, quote_for_target, PriceQuote, PricingBreakdown, PricingConfiguration,
    ProfitTarget,
};

/// Current schema version for snapshot files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSnapshot {
    pub meta: SnapshotMetadata,

    #[serde(default)]
    pub packaged_inputs: Vec<PackagedInput>,

    #[serde(default)]
    pub material_usages: Vec<MaterialUsage>,

    #[serde(default)]
    pub configuration: PricingConfiguration,
}

impl PricingSnapshot {
    /// Create an empty snapshot with default fees and taxes.
    pub fn new(label: impl Into<String>) -> Self {
        PricingSnapshot {
            meta: SnapshotMetadata::new(label),
            packaged_inputs: Vec::new(),
            material_usages: Vec::new(),
            configuration: PricingConfiguration::default(),
        }
    }

    pub fn add_packaged_input(&mut self, input: PackagedInput) {
        self.packaged_inputs.push(input);
        self.touch();
    }

    pub fn add_usage(&mut self, usage: MaterialUsage) {
        self.material_usages.push(usage);
        self.touch();
    }

    /// Remove every packaged input called `name`. Usages linked to it keep
    /// their last copied cost. Returns how many inputs were removed.
    pub fn remove_packaged_input(&mut self, name: &str) -> usize {
        let before = self.packaged_inputs.len();
        self.packaged_inputs.retain(|input| input.name != name);
        let removed = before - self.packaged_inputs.len();
        if removed > 0 {
            self.touch();
        }
        removed
    }

    pub fn set_configuration(&mut self, configuration: PricingConfiguration) {
        self.configuration = configuration;
        self.touch();
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn unit_costs(&self) -> UnitCostTable {
        derive_packaged_unit_costs(&self.packaged_inputs)
    }

    /// Bring linked usage costs in line with the packaged inputs.
    ///
    /// Returns the linked names that no longer resolve.
    pub fn sync_linked_costs(&mut self) -> Vec<String> {
        let table = self.unit_costs();
        refresh_linked_costs(&mut self.material_usages, &table)
    }

    /// Usages with linked costs refreshed, leaving `self` untouched.
    pub fn synced_usages(&self) -> Vec<MaterialUsage> {
        let mut usages = self.material_usages.clone();
        refresh_linked_costs(&mut usages, &self.unit_costs());
        usages
    }

    /// Material cost of one product unit, using current packaged prices.
    pub fn material_cost(&self) -> f64 {
        total_material_cost(&self.synced_usages())
    }

    /// Forward calculation at `sale_price`.
    pub fn evaluate(&self, sale_price: f64) -> PricingBreakdown {
        evaluate_forward_price(sale_price, self.material_cost(), &self.configuration)
    }

    /// Inverse calculation for `target`, with the breakdown at the result.
    pub fn quote(&self, target: ProfitTarget) -> PriceQuote {
        quote_for_target(self.material_cost(), &self.configuration, target)
    }

    /// Validate every record at the input boundary.
    pub fn validate(&self) -> PricingResult<()> {
        for input in &self.packaged_inputs {
            input.validate()?;
        }
        for usage in &self.material_usages {
            usage.validate()?;
        }
        self.configuration.validate()
    }

    pub fn to_json(&self) -> PricingResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Leniently decode a snapshot document.
    pub fn restore_from_str(text: &str) -> PricingResult<Restored> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| PricingError::malformed_snapshot(format!("not valid JSON: {}", e)))?;
        let Value::Object(mut document) = value else {
            return Err(PricingError::malformed_snapshot("top level must be a JSON object"));
        };

        check_document_version(&document)?;

        let mut defaulted_keys = Vec::new();
        let meta: SnapshotMetadata = take_or_default(&mut document, "meta", &mut defaulted_keys);

        let snapshot = PricingSnapshot {
            meta,
            packaged_inputs: take_or_default(&mut document, "packaged_inputs", &mut defaulted_keys),
            material_usages: take_or_default(&mut document, "material_usages", &mut defaulted_keys),
            configuration: take_or_default(&mut document, "configuration", &mut defaulted_keys),
        };

        Ok(Restored {
            snapshot,
            defaulted_keys,
        })
    }
}

impl Default for PricingSnapshot {
    fn default() -> Self {
        PricingSnapshot::new("")
    }
}

/// Outcome of a lenient restore.
#[derive(Debug, Clone, PartialEq)]
pub struct Restored {
    pub snapshot: PricingSnapshot,
    /// Top-level keys that were missing or malformed and got defaults
    pub defaulted_keys: Vec<&'static str>,
}

impl Restored {
    pub fn is_complete(&self) -> bool {
        self.defaulted_keys.is_empty()
    }
}

/// Check the version the file was written with, before `meta` is decoded
/// leniently. A `meta` object must carry a string `version`; a missing or
/// non-object `meta` is left to the defaulting path.
fn check_document_version(document: &Map<String, Value>) -> PricingResult<()> {
    let Some(Value::Object(meta)) = document.get("meta") else {
        return Ok(());
    };
    match meta.get("version") {
        Some(Value::String(version)) => validate_version(version),
        _ => Err(PricingError::missing_field("meta.version")),
    }
}

fn take_or_default<T>(
    document: &mut Map<String, Value>,
    key: &'static str,
    defaulted: &mut Vec<&'static str>,
) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(value) = document.remove(key) else {
        tracing::warn!(key, "snapshot key missing, using default");
        defaulted.push(key);
        return T::default();
    };
    match serde_json::from_value(value) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::warn!(key, error = %e, "snapshot key malformed, using default");
            defaulted.push(key);
            T::default()
        }
    }
}

/// Snapshot metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    pub id: Uuid,

    /// Product this pricing belongs to
    #[serde(default)]
    pub label: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

impl SnapshotMetadata {
    pub fn new(label: impl Into<String>) -> Self {
        let now = Utc::now();
        SnapshotMetadata {
            version: SCHEMA_VERSION.to_string(),
            id: Uuid::new_v4(),
            label: label.into(),
            created: now,
            modified: now,
        }
    }
}

impl Default for SnapshotMetadata {
    fn default() -> Self {
        SnapshotMetadata::new("")
    }
}

/// Validate that a file version is compatible with the current schema.
pub fn validate_version(file_version: &str) -> PricingResult<()> {
    let mismatch = || PricingError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    let (Some(file_major), Some(current_major)) = (file_parts.first(), current_parts.first()) else {
        return Err(mismatch());
    };
    if file_major != current_major {
        return Err(mismatch());
    }

    // On 0.x a newer minor may carry breaking changes
    if *current_major == 0 {
        if let (Some(file_minor), Some(current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::UnitKind;
    use crate::pricing::FlexibleFee;

    fn candle() -> PricingSnapshot {
        let mut snapshot = PricingSnapshot::new("Scented candle");
        snapshot.add_packaged_input(PackagedInput::new("Wax", 60.0, 1000.0, UnitKind::Volume));
        snapshot.add_packaged_input(PackagedInput::new("Wick", 10.0, 50.0, UnitKind::Unit));
        snapshot.add_usage(MaterialUsage::linked("Wax", 0.0, 200.0));
        snapshot.add_usage(MaterialUsage::linked("Wick", 0.0, 1.0));
        snapshot.add_usage(MaterialUsage::manual("Jar", 6.0, 1.0));
        snapshot
    }

    #[test]
    fn test_snapshot_creation() {
        let snapshot = PricingSnapshot::new("Soap");
        assert_eq!(snapshot.meta.label, "Soap");
        assert_eq!(snapshot.meta.version, SCHEMA_VERSION);
        assert!(snapshot.packaged_inputs.is_empty());
        assert_eq!(snapshot.configuration, PricingConfiguration::default());
    }

    #[test]
    fn test_material_cost_uses_current_package_prices() {
        let snapshot = candle();
        // 0.06 * 200 + 0.2 * 1 + 6
        assert!((snapshot.material_cost() - 18.2).abs() < 1e-9);
        // stored copies are untouched
        assert_eq!(snapshot.material_usages[0].unit_cost(), 0.0);
    }

    #[test]
    fn test_sync_linked_costs_reports_orphans() {
        let mut snapshot = candle();
        assert_eq!(snapshot.remove_packaged_input("Wick"), 1);
        let orphaned = snapshot.sync_linked_costs();
        assert_eq!(orphaned, vec!["Wick".to_string()]);
        assert!((snapshot.material_usages[0].unit_cost() - 0.06).abs() < 1e-12);
    }

    #[test]
    fn test_evaluate_and_quote() {
        let snapshot = candle();
        let breakdown = snapshot.evaluate(80.0);
        assert!((breakdown.base_production_cost - 33.2).abs() < 1e-9);

        let quote = snapshot.quote(ProfitTarget::Amount(10.0));
        let at_price = quote.breakdown.unwrap();
        assert!((at_price.net_profit - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_roundtrip_is_exact() {
        let mut snapshot = candle();
        snapshot.set_configuration(PricingConfiguration {
            fixed_unit_cost: 0.1 + 0.2,
            tax_percentage: 6.333_333_333_333_333,
            commission_fee: FlexibleFee::percentage(14.99),
            per_item_fee: FlexibleFee::flat(1.0 / 3.0),
            shipping_cost: FlexibleFee::flat(22.07),
        });

        let json = snapshot.to_json().unwrap();
        let restored = PricingSnapshot::restore_from_str(&json).unwrap();
        assert!(restored.is_complete());
        assert_eq!(restored.snapshot, snapshot);
        assert_eq!(
            restored.snapshot.configuration.fixed_unit_cost.to_bits(),
            (0.1f64 + 0.2).to_bits()
        );
    }

    #[test]
    fn test_missing_keys_default() {
        let restored = PricingSnapshot::restore_from_str(r#"{"packaged_inputs": []}"#).unwrap();
        assert_eq!(restored.defaulted_keys, vec!["meta", "material_usages", "configuration"]);
        assert_eq!(restored.snapshot.configuration, PricingConfiguration::default());
    }

    #[test]
    fn test_malformed_key_defaults_without_touching_others() {
        let mut snapshot = candle();
        snapshot.set_configuration(PricingConfiguration {
            tax_percentage: 4.0,
            ..PricingConfiguration::default()
        });
        let mut value = serde_json::to_value(&snapshot).unwrap();
        value["material_usages"] = serde_json::json!("not a list");

        let restored = PricingSnapshot::restore_from_str(&value.to_string()).unwrap();
        assert_eq!(restored.defaulted_keys, vec!["material_usages"]);
        assert!(restored.snapshot.material_usages.is_empty());
        assert_eq!(restored.snapshot.packaged_inputs, snapshot.packaged_inputs);
        assert_eq!(restored.snapshot.configuration.tax_percentage, 4.0);
    }

    #[test]
    fn test_unparsable_text_is_malformed() {
        let err = PricingSnapshot::restore_from_str("{ not json").unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_SNAPSHOT");

        let err = PricingSnapshot::restore_from_str("[1, 2, 3]").unwrap_err();
        assert_eq!(err.error_code(), "MALFORMED_SNAPSHOT");
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let mut value = serde_json::to_value(candle()).unwrap();
        value["meta"]["version"] = serde_json::json!("1.0.0");
        let err = PricingSnapshot::restore_from_str(&value.to_string()).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_newer_schema_with_incomplete_meta_is_rejected() {
        let text = r#"{"meta": {"version": "9.0.0"}, "packaged_inputs": [], "material_usages": []}"#;
        let err = PricingSnapshot::restore_from_str(text).unwrap_err();
        assert_eq!(
            err,
            PricingError::VersionMismatch {
                file_version: "9.0.0".to_string(),
                expected_version: SCHEMA_VERSION.to_string(),
            }
        );
    }

    #[test]
    fn test_compatible_incomplete_meta_defaults() {
        let text = r#"{"meta": {"version": "0.1.0"}, "packaged_inputs": []}"#;
        let restored = PricingSnapshot::restore_from_str(text).unwrap();
        assert!(restored.defaulted_keys.contains(&"meta"));
        assert_eq!(restored.snapshot.meta.version, SCHEMA_VERSION);
    }

    #[test]
    fn test_meta_without_version_is_rejected() {
        let err = PricingSnapshot::restore_from_str(r#"{"meta": {"label": "Soap"}}"#).unwrap_err();
        assert_eq!(err, PricingError::missing_field("meta.version"));

        let err = PricingSnapshot::restore_from_str(r#"{"meta": {"version": 2}}"#).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_validate() {
        let mut snapshot = candle();
        assert!(snapshot.validate().is_ok());

        snapshot.add_usage(MaterialUsage::manual("Ribbon", 1.0, 0.0));
        assert!(snapshot.validate().is_err());
    }
}
