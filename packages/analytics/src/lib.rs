#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation query engine over the accident and vehicle datasets.
//!
//! Every public function in [`queries`] is pure with respect to the
//! loaded data: given an unmodified connection it returns identical
//! results on every call, with an explicit `ORDER BY` making row order
//! stable. SQL runs directly against the `DuckDB` views registered by
//! the dataset loader.

pub mod queries;

use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A `DuckDB` query failed, including the malformed-schema case
    /// where an expected column is missing or has an unexpected type.
    #[error("Query error: {0}")]
    Query(#[from] duckdb::Error),
}
