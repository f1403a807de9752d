//! # File I/O Module
//!
//! Snapshot backups on disk:
//! - **Atomic saves**: Write to .tmp, sync, rename to prevent corruption
//! - **Lenient loads**: Missing or malformed top-level keys fall back to defaults
//! - **Fail-closed restores**: A failed restore never touches the caller's snapshot
//!
//! ## Example
//!
//! ```rust,no_run
//! use pricing_core::file_io::{restore_into, save_snapshot};
//! use pricing_core::snapshot::PricingSnapshot;
//! use std::path::Path;
//!
//! let mut snapshot = PricingSnapshot::new("Soap bar");
//! save_snapshot(&snapshot, Path::new("soap.json"))?;
//!
//! // Later: replace the in-memory snapshot only if the file is usable
//! let defaulted = restore_into(&mut snapshot, Path::new("soap.json"))?;
//! assert!(defaulted.is_empty());
//! # Ok::<(), pricing_core::errors::PricingError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use crate::errors::{PricingError, PricingResult};
use crate::snapshot::{PricingSnapshot, Restored};

/// Save a snapshot to a file with atomic write semantics.
///
/// The save process:
/// 1. Serialize snapshot to JSON
/// 2. Write to a temporary file next to the target
/// 3. Sync to disk (fsync)
/// 4. Rename over the target (atomic on most filesystems)
pub fn save_snapshot(snapshot: &PricingSnapshot, path: &Path) -> PricingResult<()> {
    let json = snapshot.to_json()?;
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        PricingError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        PricingError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        PricingError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        PricingError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    tracing::info!(path = %path.display(), "snapshot saved");
    Ok(())
}

/// Load a snapshot from a file.
///
/// # Returns
///
/// * `Ok(Restored)` - Snapshot plus the keys that had to be defaulted
/// * `Err(PricingError::MalformedSnapshot)` - Not a JSON object
/// * `Err(PricingError::VersionMismatch)` - Written by an incompatible schema
/// * `Err(PricingError::FileError)` - I/O error
pub fn load_snapshot(path: &Path) -> PricingResult<Restored> {
    let mut file = File::open(path)
        .map_err(|e| PricingError::file_error("open", path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| PricingError::file_error("read", path.display().to_string(), e.to_string()))?;

    PricingSnapshot::restore_from_str(&contents).map_err(|e| match e {
        PricingError::MalformedSnapshot { reason } => {
            PricingError::malformed_snapshot(format!("{}: {}", path.display(), reason))
        }
        other => other,
    })
}

/// Replace `target` with the snapshot stored at `path`.
///
/// On any error `target` is left exactly as it was. On success returns the
/// top-level keys that were defaulted.
pub fn restore_into(target: &mut PricingSnapshot, path: &Path) -> PricingResult<Vec<&'static str>> {
    let restored = load_snapshot(path)?;
    *target = restored.snapshot;
    Ok(restored.defaulted_keys)
}

fn tmp_path_for(path: &Path) -> std::path::PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
