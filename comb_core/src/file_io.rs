//! # File I/O
//!
//! Atomic JSON persistence for catalogue documents, computed snapshots and
//! reference fixtures.
//!
//! Writes go to a `.tmp` sibling, are synced to disk and then renamed over
//! the target, so an interrupted save never leaves a truncated file.
//! Documents are checked against [`SCHEMA_VERSION`] when loaded.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::combinations::CombinationSnapshot;
use crate::document::{CatalogDocument, SCHEMA_VERSION};
use crate::errors::{CombError, CombResult};

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Serialize `value` as pretty JSON and atomically replace `path`.
pub fn write_json_atomic<T: Serialize>(value: &T, path: &Path) -> CombResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| CombError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| CombError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp_file
        .sync_all()
        .map_err(|e| CombError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CombError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    log::debug!("wrote {}", path.display());
    Ok(())
}

/// Read and parse a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> CombResult<T> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CombError::file_error("read", path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&contents).map_err(|e| CombError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}

/// Save a catalogue document.
///
/// # Example
///
/// ```rust,no_run
/// use comb_core::document::footbridge_example;
/// use comb_core::file_io::save_document;
/// use std::path::Path;
///
/// save_document(&footbridge_example(), Path::new("footbridge.json"))?;
/// # Ok::<(), comb_core::errors::CombError>(())
/// ```
pub fn save_document(document: &CatalogDocument, path: &Path) -> CombResult<()> {
    write_json_atomic(document, path)
}

/// Load a catalogue document, rejecting incompatible schema versions.
pub fn load_document(path: &Path) -> CombResult<CatalogDocument> {
    let document: CatalogDocument = read_json(path)?;
    validate_version(&document.meta.version)?;
    Ok(document)
}

/// Export a computed snapshot.
pub fn save_snapshot(snapshot: &CombinationSnapshot, path: &Path) -> CombResult<()> {
    write_json_atomic(snapshot, path)
}

/// Same major version, and for 0.x files no newer minor version than ours.
fn validate_version(file_version: &str) -> CombResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    let mismatch = || CombError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    match (file_parts.as_slice(), current_parts.as_slice()) {
        ([file_major, ..], [current_major, ..]) if file_major != current_major => Err(mismatch()),
        ([0, file_minor, ..], [0, current_minor, ..]) if file_minor > current_minor => Err(mismatch()),
        ([_, ..], [_, ..]) => Ok(()),
        _ => Err(mismatch()),
    }
}
