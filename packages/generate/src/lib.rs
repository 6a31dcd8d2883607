#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Library for generating the pre-rendered map and chart documents.
//!
//! Renders each output as a standalone HTML document under the maps
//! directory. Generation is idempotent: identical input produces
//! byte-identical documents (deterministic sampling and ordering, no
//! timestamps inside the artifacts), so rerunning simply overwrites.
//!
//! Supports fingerprint-based caching: a manifest file records the
//! (size, mtime, row count) of each input dataset so unchanged data is
//! not re-rendered. Each output is tracked independently, allowing
//! partial regeneration after interrupted runs or when only some
//! outputs are missing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use accident_map_accident_models::AreaType;
use accident_map_analytics::{AnalyticsError, queries};
use accident_map_charts::{Figure, figures, html};
use accident_map_dataset::{
    ACCIDENTS_VIEW, DatasetError, DatasetPaths, VEHICLES_VIEW, paths::ensure_dir, row_count,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of coordinates sampled for the density heatmap.
pub const HEATMAP_SAMPLE_SIZE: usize = 20_000;

/// Current manifest schema version. Bump this when the manifest format
/// changes in a backward-incompatible way.
const MANIFEST_VERSION: u32 = 1;

/// File name of the generation manifest inside the output directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Output name for the density heatmap document.
pub const OUTPUT_DENSITY_HEATMAP: &str = "density_heatmap";

/// Output name for the urban-vs-rural authority bubble map document.
pub const OUTPUT_URBAN_VS_RURAL_MAP: &str = "urban_vs_rural_map";

/// Output name for the accident-count-by-area bar chart document.
pub const OUTPUT_AREA_COUNT_CHART: &str = "urban_rural_chart1_count";

/// Output name for the urban severity distribution donut document.
pub const OUTPUT_URBAN_SEVERITY_CHART: &str = "urban_rural_chart2_urban_severity";

/// Output name for the rural severity distribution donut document.
pub const OUTPUT_RURAL_SEVERITY_CHART: &str = "urban_rural_chart3_rural_severity";

/// Output name for the casualties box plot document.
pub const OUTPUT_CASUALTIES_CHART: &str = "urban_rural_chart4_casualties";

/// The two map documents.
pub const MAP_OUTPUTS: &[&str] = &[OUTPUT_DENSITY_HEATMAP, OUTPUT_URBAN_VS_RURAL_MAP];

/// The four urban-vs-rural comparison chart documents.
pub const CHART_OUTPUTS: &[&str] = &[
    OUTPUT_AREA_COUNT_CHART,
    OUTPUT_URBAN_SEVERITY_CHART,
    OUTPUT_RURAL_SEVERITY_CHART,
    OUTPUT_CASUALTIES_CHART,
];

/// Every output, in generation order.
pub const ALL_OUTPUTS: &[&str] = &[
    OUTPUT_DENSITY_HEATMAP,
    OUTPUT_URBAN_VS_RURAL_MAP,
    OUTPUT_AREA_COUNT_CHART,
    OUTPUT_URBAN_SEVERITY_CHART,
    OUTPUT_RURAL_SEVERITY_CHART,
    OUTPUT_CASUALTIES_CHART,
];

/// Errors that can occur during a generation run. Any of them aborts
/// the whole run; there are no partial-output guarantees.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Opening or fingerprinting a dataset failed.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// An aggregation query failed.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    /// A figure could not be serialised into a document.
    #[error("Render error: {0}")]
    Render(#[from] serde_json::Error),

    /// Writing an output file or reading dataset metadata failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An output name was requested that this generator does not know.
    #[error("unknown output: {name}")]
    UnknownOutput {
        /// The unrecognised output name.
        name: String,
    },
}

/// Per-dataset fingerprint capturing the input state at generation time.
///
/// The datasets are static snapshots, so size, modification time, and
/// row count together are a reliable change indicator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct DatasetFingerprint {
    path: String,
    size_bytes: u64,
    modified: Option<String>,
    row_count: u64,
}

/// Generation manifest stored at `<out_dir>/manifest.json`.
///
/// Records the input state at the time of last generation so subsequent
/// runs can skip unchanged outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Manifest {
    version: u32,
    fingerprints: Vec<DatasetFingerprint>,
    /// Map of output name to ISO 8601 timestamp of last successful
    /// generation.
    outputs: BTreeMap<String, String>,
}

/// Returns the document path for an output name.
#[must_use]
pub fn output_file_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.html"))
}

/// Runs the generation pipeline with manifest-based caching.
///
/// Compares current dataset fingerprints against the stored manifest to
/// determine which `requested_outputs` actually need regeneration, then
/// renders those in order. `on_output` is invoked with each output name
/// just before it is rendered (progress reporting). Returns the names
/// that were regenerated.
///
/// # Errors
///
/// Returns [`GenerateError`] if fingerprinting, a query, rendering, or
/// a file write fails. The run aborts on the first failure.
pub fn run_with_cache(
    conn: &duckdb::Connection,
    dataset_paths: &DatasetPaths,
    dir: &Path,
    requested_outputs: &[&str],
    force: bool,
    mut on_output: impl FnMut(&str),
) -> Result<Vec<String>, GenerateError> {
    let fingerprints = query_fingerprints(conn, dataset_paths)?;
    let manifest = load_manifest(dir);

    let needs: Vec<(&str, bool)> = requested_outputs
        .iter()
        .map(|&name| {
            let path = output_file_path(dir, name);
            let needed = force
                || !path.exists()
                || manifest.as_ref().is_none_or(|m| {
                    m.fingerprints != fingerprints || !m.outputs.contains_key(name)
                });
            (name, needed)
        })
        .collect();

    if needs.iter().all(|&(_, needed)| !needed) {
        log::info!("All requested outputs are up-to-date, nothing to regenerate");
        return Ok(Vec::new());
    }

    for &(name, needed) in &needs {
        if needed {
            log::info!("{name}: needs regeneration");
        } else {
            log::info!("{name}: up-to-date, skipping");
        }
    }

    let mut manifest = manifest.unwrap_or(Manifest {
        version: MANIFEST_VERSION,
        fingerprints: Vec::new(),
        outputs: BTreeMap::new(),
    });

    // A changed input invalidates every recorded output, not just the
    // requested ones.
    if manifest.fingerprints != fingerprints {
        manifest.outputs.clear();
        manifest.fingerprints = fingerprints;
    }

    let mut regenerated = Vec::new();
    for &(name, needed) in &needs {
        if !needed {
            continue;
        }
        on_output(name);
        generate_output(conn, dir, name)?;
        manifest
            .outputs
            .insert(name.to_string(), chrono::Utc::now().to_rfc3339());
        regenerated.push(name.to_string());
    }

    write_manifest(dir, &manifest)?;
    Ok(regenerated)
}

/// Renders one named output document.
///
/// # Errors
///
/// Returns [`GenerateError::UnknownOutput`] for an unrecognised name,
/// or the underlying failure otherwise.
pub fn generate_output(
    conn: &duckdb::Connection,
    dir: &Path,
    name: &str,
) -> Result<(), GenerateError> {
    match name {
        OUTPUT_DENSITY_HEATMAP => generate_density_heatmap(conn, dir),
        OUTPUT_URBAN_VS_RURAL_MAP => generate_urban_vs_rural_map(conn, dir),
        OUTPUT_AREA_COUNT_CHART => generate_area_count_chart(conn, dir),
        OUTPUT_URBAN_SEVERITY_CHART => generate_severity_chart(conn, dir, AreaType::Urban),
        OUTPUT_RURAL_SEVERITY_CHART => generate_severity_chart(conn, dir, AreaType::Rural),
        OUTPUT_CASUALTIES_CHART => generate_casualties_chart(conn, dir),
        _ => Err(GenerateError::UnknownOutput {
            name: name.to_string(),
        }),
    }
}

/// Renders the density heatmap of sampled accident coordinates.
///
/// # Errors
///
/// Returns [`GenerateError`] if the query, render, or write fails.
pub fn generate_density_heatmap(
    conn: &duckdb::Connection,
    dir: &Path,
) -> Result<(), GenerateError> {
    let points = queries::heatmap_points(conn, HEATMAP_SAMPLE_SIZE)?;
    log::info!("Sampled {} coordinates for the density heatmap", points.len());
    let figure = figures::density_map(
        "UK Road Accidents Density Heatmap - Hotspots Clearly Visible",
        &points,
    );
    write_document(dir, OUTPUT_DENSITY_HEATMAP, "UK Accidents Density Heatmap", &figure)
}

/// Renders the urban-vs-rural bubble map of local authorities.
///
/// # Errors
///
/// Returns [`GenerateError`] if the query, render, or write fails.
pub fn generate_urban_vs_rural_map(
    conn: &duckdb::Connection,
    dir: &Path,
) -> Result<(), GenerateError> {
    let authorities = queries::authority_summaries(conn)?;
    log::info!("Summarised {} local authorities", authorities.len());
    let figure = figures::authority_bubble_map(
        "UK Accidents: Urban vs Rural by Local Authority (Bubble Size = Total Accidents)",
        &authorities,
    );
    write_document(
        dir,
        OUTPUT_URBAN_VS_RURAL_MAP,
        "UK Accidents: Urban vs Rural",
        &figure,
    )
}

/// Renders the accident-count-by-area bar chart.
///
/// # Errors
///
/// Returns [`GenerateError`] if the query, render, or write fails.
pub fn generate_area_count_chart(
    conn: &duckdb::Connection,
    dir: &Path,
) -> Result<(), GenerateError> {
    let counts = queries::area_counts(conn)?;
    let figure = figures::area_count_bar("Accident Count by Area Type", &counts);
    write_document(dir, OUTPUT_AREA_COUNT_CHART, "Accident Count by Area Type", &figure)
}

/// Renders the severity distribution donut for one classification.
///
/// # Errors
///
/// Returns [`GenerateError`] if the query, render, or write fails.
pub fn generate_severity_chart(
    conn: &duckdb::Connection,
    dir: &Path,
    area: AreaType,
) -> Result<(), GenerateError> {
    let counts = queries::severity_counts_for_area(conn, area)?;
    let title = format!("Severity Distribution in {area} Areas");
    let figure = figures::severity_donut(&title, &counts);
    let name = match area {
        AreaType::Urban => OUTPUT_URBAN_SEVERITY_CHART,
        AreaType::Rural => OUTPUT_RURAL_SEVERITY_CHART,
    };
    write_document(dir, name, &title, &figure)
}

/// Renders the casualties box plot comparing the two classifications.
///
/// # Errors
///
/// Returns [`GenerateError`] if the query, render, or write fails.
pub fn generate_casualties_chart(
    conn: &duckdb::Connection,
    dir: &Path,
) -> Result<(), GenerateError> {
    let summaries = AreaType::all()
        .iter()
        .map(|&area| queries::casualty_summary(conn, area))
        .collect::<Result<Vec<_>, _>>()?;
    let figure = figures::casualty_box_plot("Casualties Comparison: Urban vs Rural", &summaries);
    write_document(
        dir,
        OUTPUT_CASUALTIES_CHART,
        "Casualties Comparison: Urban vs Rural",
        &figure,
    )
}

/// Writes one figure as a standalone document under `dir`.
fn write_document(
    dir: &Path,
    name: &str,
    title: &str,
    figure: &Figure,
) -> Result<(), GenerateError> {
    ensure_dir(dir)?;
    let path = output_file_path(dir, name);
    let document = html::document(title, figure)?;
    std::fs::write(&path, document)?;
    log::info!("Saved: {}", path.display());
    Ok(())
}

/// Computes the current fingerprints of both input datasets.
fn query_fingerprints(
    conn: &duckdb::Connection,
    dataset_paths: &DatasetPaths,
) -> Result<Vec<DatasetFingerprint>, GenerateError> {
    [
        (&dataset_paths.accidents, ACCIDENTS_VIEW),
        (&dataset_paths.vehicles, VEHICLES_VIEW),
    ]
    .into_iter()
    .map(|(path, view)| {
        let metadata = std::fs::metadata(path)?;
        let modified = metadata
            .modified()
            .ok()
            .map(|time| chrono::DateTime::<chrono::Utc>::from(time).to_rfc3339());
        Ok(DatasetFingerprint {
            path: path.display().to_string(),
            size_bytes: metadata.len(),
            modified,
            row_count: row_count(conn, view)?,
        })
    })
    .collect()
}

/// Loads the manifest from the output directory, if present and
/// readable at the current schema version.
fn load_manifest(dir: &Path) -> Option<Manifest> {
    let content = std::fs::read_to_string(dir.join(MANIFEST_FILE)).ok()?;
    let manifest: Manifest = serde_json::from_str(&content)
        .map_err(|e| log::warn!("Ignoring unreadable manifest: {e}"))
        .ok()?;
    (manifest.version == MANIFEST_VERSION).then_some(manifest)
}

/// Writes the manifest into the output directory.
fn write_manifest(dir: &Path, manifest: &Manifest) -> Result<(), GenerateError> {
    ensure_dir(dir)?;
    let content = serde_json::to_string_pretty(manifest)?;
    std::fs::write(dir.join(MANIFEST_FILE), content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use accident_map_dataset::open_dataset;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "accident_map_generate_{tag}_{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// In-memory connection with tables matching the dataset views.
    fn fixture_conn() -> duckdb::Connection {
        let conn = duckdb::Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE accidents AS
             SELECT * FROM (VALUES
                 ('A1', 51.50, -0.12, 'Slight',  'Urban', 'Westminster', 1, 2019, 1,  8, 'Monday'),
                 ('A2', 51.48, -0.10, 'Slight',  'Urban', 'Westminster', 3, 2019, 4, 17, 'Tuesday'),
                 ('A3', 54.00, -2.80, 'Serious', 'Rural', 'Lancaster',   2, 2020, 7,  9, 'Friday'),
                 ('A4', 52.40, -1.90, 'Fatal',   'Urban', 'Birmingham',  2, 2021, 12, 23, 'Saturday')
             ) AS t(\"Accident_Index\", \"Latitude\", \"Longitude\",
                    \"Accident_Severity\", \"Urban_or_Rural_Area\",
                    \"Local_Authority_(District)\", \"Number_of_Casualties\",
                    \"Year\", \"Month\", \"Hour\", \"Day_of_Week\");

             CREATE TABLE vehicles AS
             SELECT * FROM (VALUES ('A1', 'Car'), ('A4', 'Bus or coach'))
             AS t(\"Accident_Index\", \"Vehicle_Type\");",
        )
        .unwrap();
        conn
    }

    /// Parquet fixtures on disk, for the cache path that fingerprints
    /// real files.
    fn parquet_fixture(dir: &Path) -> DatasetPaths {
        let paths = DatasetPaths {
            accidents: dir.join("accidents.parquet"),
            vehicles: dir.join("vehicles.parquet"),
        };
        let conn = fixture_conn();
        conn.execute_batch(&format!(
            "COPY accidents TO '{}' (FORMAT PARQUET);
             COPY vehicles TO '{}' (FORMAT PARQUET);",
            paths.accidents.display(),
            paths.vehicles.display(),
        ))
        .unwrap();
        paths
    }

    #[test]
    fn regeneration_is_byte_identical() {
        let conn = fixture_conn();
        let dir = temp_dir("idempotent");

        for &name in ALL_OUTPUTS {
            generate_output(&conn, &dir, name).unwrap();
        }
        let first: Vec<Vec<u8>> = ALL_OUTPUTS
            .iter()
            .map(|name| std::fs::read(output_file_path(&dir, name)).unwrap())
            .collect();

        for &name in ALL_OUTPUTS {
            generate_output(&conn, &dir, name).unwrap();
        }
        for (i, &name) in ALL_OUTPUTS.iter().enumerate() {
            let second = std::fs::read(output_file_path(&dir, name)).unwrap();
            assert_eq!(first[i], second, "{name} differs between runs");
        }

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn documents_are_standalone_html() {
        let conn = fixture_conn();
        let dir = temp_dir("standalone");

        generate_output(&conn, &dir, OUTPUT_AREA_COUNT_CHART).unwrap();
        let content =
            std::fs::read_to_string(output_file_path(&dir, OUTPUT_AREA_COUNT_CHART)).unwrap();
        assert!(content.starts_with("<!DOCTYPE html>"));
        assert!(content.contains("Plotly.newPlot"));
        assert!(content.contains("Accident Count by Area Type"));

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn unknown_output_is_an_error() {
        let conn = fixture_conn();
        let dir = temp_dir("unknown");
        let err = generate_output(&conn, &dir, "not_a_real_output").unwrap_err();
        assert!(matches!(err, GenerateError::UnknownOutput { .. }));
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn cache_skips_unchanged_inputs() {
        let dir = temp_dir("cache");
        let dataset_paths = parquet_fixture(&dir);
        let conn = open_dataset(&dataset_paths).unwrap();
        let out_dir = dir.join("maps");

        let first =
            run_with_cache(&conn, &dataset_paths, &out_dir, ALL_OUTPUTS, false, |_| {}).unwrap();
        assert_eq!(first.len(), ALL_OUTPUTS.len());

        let second =
            run_with_cache(&conn, &dataset_paths, &out_dir, ALL_OUTPUTS, false, |_| {}).unwrap();
        assert!(second.is_empty(), "expected cached run to skip everything");

        let forced =
            run_with_cache(&conn, &dataset_paths, &out_dir, ALL_OUTPUTS, true, |_| {}).unwrap();
        assert_eq!(forced.len(), ALL_OUTPUTS.len());

        std::fs::remove_dir_all(dir).ok();
    }
}
