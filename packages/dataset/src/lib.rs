#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset loader for the cleaned UK accidents and vehicles Parquet files.
//!
//! Opens an in-memory `DuckDB` database and registers the two datasets as
//! views over `read_parquet(...)`, so every downstream aggregation runs
//! as analytical SQL directly against the columnar files. The datasets
//! are read-only for the lifetime of the process; no table is ever
//! written after load.
//!
//! A missing input file surfaces as [`DatasetError::MissingFile`] rather
//! than a crash — the dashboard catches it and renders an inline message
//! while data-independent tabs stay usable.

pub mod paths;

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;

/// Name of the view over the accidents Parquet file.
pub const ACCIDENTS_VIEW: &str = "accidents";

/// Name of the view over the vehicles Parquet file.
pub const VEHICLES_VIEW: &str = "vehicles";

/// Errors that can occur while opening or reading the datasets.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// An input Parquet file does not exist at the expected path.
    #[error("dataset file not found: {}", path.display())]
    MissingFile {
        /// The path that was checked.
        path: PathBuf,
    },

    /// A `DuckDB` operation failed.
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),
}

/// Locations of the two input Parquet files.
#[derive(Debug, Clone)]
pub struct DatasetPaths {
    /// Accidents dataset path.
    pub accidents: PathBuf,
    /// Vehicles dataset path.
    pub vehicles: PathBuf,
}

impl DatasetPaths {
    /// Returns the canonical locations under the project `data/`
    /// directory.
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            accidents: paths::accidents_parquet_path(),
            vehicles: paths::vehicles_parquet_path(),
        }
    }
}

/// Opens an in-memory `DuckDB` connection with `accidents` and
/// `vehicles` views over the given Parquet files.
///
/// Both files are checked for existence up front so a missing input is
/// reported as [`DatasetError::MissingFile`] instead of a query failure
/// later. No schema validation is performed beyond what the Parquet
/// container self-describes.
///
/// # Errors
///
/// Returns [`DatasetError::MissingFile`] if either path does not exist,
/// or [`DatasetError::DuckDb`] if the connection or views cannot be
/// created.
pub fn open_dataset(paths: &DatasetPaths) -> Result<duckdb::Connection, DatasetError> {
    for path in [&paths.accidents, &paths.vehicles] {
        if !path.exists() {
            return Err(DatasetError::MissingFile { path: path.clone() });
        }
    }

    let conn = duckdb::Connection::open_in_memory()?;
    conn.execute_batch(&format!(
        "CREATE VIEW {ACCIDENTS_VIEW} AS SELECT * FROM read_parquet('{}');
         CREATE VIEW {VEHICLES_VIEW} AS SELECT * FROM read_parquet('{}');",
        sql_quote_path(&paths.accidents),
        sql_quote_path(&paths.vehicles),
    ))?;

    log::debug!(
        "Opened dataset views over {} and {}",
        paths.accidents.display(),
        paths.vehicles.display()
    );

    Ok(conn)
}

/// Returns the number of rows in a dataset view.
///
/// # Errors
///
/// Returns [`DatasetError::DuckDb`] if the count query fails.
pub fn row_count(conn: &duckdb::Connection, view: &str) -> Result<u64, DatasetError> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {view}"), [], |row| {
        row.get(0)
    })?;
    Ok(u64::try_from(count).unwrap_or(0))
}

/// Escapes a filesystem path for inclusion in a single-quoted SQL string
/// literal.
fn sql_quote_path(path: &Path) -> String {
    path.to_string_lossy().replace('\'', "''")
}

/// Round-robin pool of read-only dataset connections.
///
/// `duckdb::Connection` is `Send` but not `Sync`, so each connection is
/// wrapped in a `Mutex`. The pool hands out connections round-robin via
/// an atomic counter, allowing concurrent queries on different
/// connections.
pub struct DatasetPool {
    connections: Vec<Mutex<duckdb::Connection>>,
    next: AtomicUsize,
}

impl DatasetPool {
    /// Opens `size` connections over the given Parquet files.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if either file is missing or any
    /// connection fails to open.
    pub fn open(paths: &DatasetPaths, size: usize) -> Result<Self, DatasetError> {
        let connections = (0..size.max(1))
            .map(|_| open_dataset(paths).map(Mutex::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            connections,
            next: AtomicUsize::new(0),
        })
    }

    /// Acquires the next connection from the pool (round-robin).
    ///
    /// # Panics
    ///
    /// Panics if the `Mutex` is poisoned.
    pub fn acquire(&self) -> std::sync::MutexGuard<'_, duckdb::Connection> {
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.connections.len();
        self.connections[idx]
            .lock()
            .expect("Dataset pool mutex poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "accident_map_dataset_{tag}_{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Writes small accidents/vehicles Parquet fixtures via DuckDB COPY.
    fn write_fixtures(dir: &Path) -> DatasetPaths {
        let accidents = dir.join("accidents.parquet");
        let vehicles = dir.join("vehicles.parquet");
        let conn = duckdb::Connection::open_in_memory().unwrap();
        conn.execute_batch(&format!(
            "COPY (
                 SELECT * FROM (VALUES
                     ('A1', 51.5, -0.1, 'Slight', 'Urban', 'Westminster', 1),
                     ('A2', 53.4, -2.2, 'Serious', 'Rural', 'Cheshire East', 2),
                     ('A3', 52.4, -1.9, 'Fatal', 'Urban', 'Birmingham', 3)
                 ) AS t(\"Accident_Index\", \"Latitude\", \"Longitude\",
                        \"Accident_Severity\", \"Urban_or_Rural_Area\",
                        \"Local_Authority_(District)\", \"Number_of_Casualties\")
             ) TO '{}' (FORMAT PARQUET);
             COPY (
                 SELECT * FROM (VALUES
                     ('A1', 'Car'),
                     ('A2', 'Motorcycle over 500cc')
                 ) AS t(\"Accident_Index\", \"Vehicle_Type\")
             ) TO '{}' (FORMAT PARQUET);",
            sql_quote_path(&accidents),
            sql_quote_path(&vehicles),
        ))
        .unwrap();
        DatasetPaths {
            accidents,
            vehicles,
        }
    }

    #[test]
    fn missing_file_is_a_caught_error() {
        let dir = fixture_dir("missing");
        let paths = DatasetPaths {
            accidents: dir.join("nope.parquet"),
            vehicles: dir.join("also_nope.parquet"),
        };
        let err = open_dataset(&paths).unwrap_err();
        match err {
            DatasetError::MissingFile { path } => {
                assert_eq!(path, dir.join("nope.parquet"));
            }
            other => panic!("expected MissingFile, got {other:?}"),
        }
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn opens_views_over_parquet() {
        let dir = fixture_dir("open");
        let paths = write_fixtures(&dir);

        let conn = open_dataset(&paths).unwrap();
        assert_eq!(row_count(&conn, ACCIDENTS_VIEW).unwrap(), 3);
        assert_eq!(row_count(&conn, VEHICLES_VIEW).unwrap(), 2);

        // Named column access works through the view
        let severity: String = conn
            .query_row(
                "SELECT \"Accident_Severity\" FROM accidents \
                 WHERE \"Accident_Index\" = 'A3'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(severity, "Fatal");

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn pool_round_robins_connections() {
        let dir = fixture_dir("pool");
        let paths = write_fixtures(&dir);

        let pool = DatasetPool::open(&paths, 2).unwrap();
        for _ in 0..4 {
            let conn = pool.acquire();
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM accidents", [], |row| row.get(0))
                .unwrap();
            assert_eq!(count, 3);
        }

        std::fs::remove_dir_all(dir).ok();
    }
}
