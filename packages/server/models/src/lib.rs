#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the accident map dashboard.

use serde::{Deserialize, Serialize};

/// `GET /api/health` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server considers itself healthy.
    pub healthy: bool,
    /// Crate version serving the API.
    pub version: String,
    /// Whether the datasets loaded successfully at startup.
    pub dataset_loaded: bool,
}

/// Query parameters for `GET /api/casualties`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CasualtyQueryParams {
    /// Area classification to summarise (`Urban` or `Rural`).
    pub area: Option<String>,
}

/// Query parameters for `GET /api/authorities`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorityQueryParams {
    /// Optional area classification filter (`Urban` or `Rural`).
    pub area: Option<String>,
    /// Maximum number of ranked authorities to return.
    pub limit: Option<usize>,
}
