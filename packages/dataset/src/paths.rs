#![allow(clippy::module_name_repetitions)]
//! Canonical file paths for the `data/` directory.
//!
//! All paths are relative to the project root's `data/` directory.

use std::path::{Path, PathBuf};

/// Returns the workspace root directory.
///
/// Resolved at compile time from `CARGO_MANIFEST_DIR`. This ensures input
/// and output paths are always relative to the project root regardless of
/// the caller's working directory.
///
/// # Panics
///
/// Panics if the project root cannot be resolved.
#[must_use]
pub fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .expect("Failed to find project root from CARGO_MANIFEST_DIR")
        .to_path_buf()
}

/// Returns the `data/` directory path.
#[must_use]
pub fn data_dir() -> PathBuf {
    project_root().join("data")
}

/// Returns the path of the cleaned accidents Parquet file.
#[must_use]
pub fn accidents_parquet_path() -> PathBuf {
    data_dir().join("UK_Accidents_Fully_Cleaned.parquet")
}

/// Returns the path of the cleaned vehicles Parquet file.
#[must_use]
pub fn vehicles_parquet_path() -> PathBuf {
    data_dir().join("UK_Vehicles_Fully_Cleaned.parquet")
}

/// Returns the `data/maps/` directory for pre-generated map documents.
#[must_use]
pub fn maps_dir() -> PathBuf {
    data_dir().join("maps")
}

/// Ensures a directory exists, creating it if necessary.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
