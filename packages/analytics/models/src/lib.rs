#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate result types produced by the accident analytics engine.
//!
//! Every type here is a derived, ephemeral record: recomputed per
//! dashboard interaction or generation run, never persisted.

use accident_map_accident_models::{AreaType, Season, Severity, TimePeriod};
use serde::{Deserialize, Serialize};

/// Accident count for one severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityCount {
    /// Severity level.
    pub severity: Severity,
    /// Number of accidents at this severity.
    pub count: u64,
}

/// Accident count for one urban/rural classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaCount {
    /// Area classification.
    pub area: AreaType,
    /// Number of accidents in this classification.
    pub count: u64,
}

/// Per-local-authority accident summary driving the bubble map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthoritySummary {
    /// Local authority district name.
    pub authority: String,
    /// Mean latitude of the authority's accidents.
    pub latitude: f64,
    /// Mean longitude of the authority's accidents.
    pub longitude: f64,
    /// Total accidents in the authority.
    pub total: u64,
    /// Accidents classified as urban.
    pub urban: u64,
    /// Accidents classified as rural.
    pub rural: u64,
}

impl AuthoritySummary {
    /// Returns the predominant classification for the authority.
    ///
    /// Ties resolve to [`AreaType::Urban`].
    #[must_use]
    pub const fn predominant(&self) -> AreaType {
        if self.urban >= self.rural {
            AreaType::Urban
        } else {
            AreaType::Rural
        }
    }
}

/// Accident count for one local authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorityCount {
    /// Local authority district name.
    pub authority: String,
    /// Number of accidents.
    pub count: u64,
}

/// Five-number summary (plus mean) of casualties per accident for one
/// area classification. Drives the box plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CasualtySummary {
    /// Area classification the summary covers.
    pub area: AreaType,
    /// Minimum casualties in a single accident.
    pub min: f64,
    /// Lower quartile.
    pub q1: f64,
    /// Median.
    pub median: f64,
    /// Upper quartile.
    pub q3: f64,
    /// Maximum casualties in a single accident.
    pub max: f64,
    /// Mean casualties per accident.
    pub mean: f64,
}

/// A sampled accident coordinate for the density heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
}

/// Accident count for one hour of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyCount {
    /// Hour of day (0-23).
    pub hour: u32,
    /// Number of accidents in this hour.
    pub count: u64,
}

/// Accident count for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCount {
    /// Month number (1-12).
    pub month: u32,
    /// Number of accidents in this month.
    pub count: u64,
}

/// Accident count for one derived period of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodCount {
    /// Period of day.
    pub period: TimePeriod,
    /// Number of accidents in this period.
    pub count: u64,
}

/// Accident count for one derived season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonCount {
    /// Season.
    pub season: Season,
    /// Number of accidents in this season.
    pub count: u64,
}

/// Vehicle count for one vehicle type, joined to the accidents dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleTypeCount {
    /// Vehicle type label from the vehicles dataset.
    pub vehicle_type: String,
    /// Number of vehicles of this type involved in accidents.
    pub count: u64,
}

/// Dataset-wide headline figures shown on the Home tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    /// Total accident records.
    pub accidents: u64,
    /// Sum of casualties across all accidents.
    pub casualties: u64,
    /// Number of fatal accidents.
    pub fatal: u64,
    /// Earliest year in the dataset.
    pub min_year: Option<i32>,
    /// Latest year in the dataset.
    pub max_year: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predominant_resolves_ties_to_urban() {
        let summary = AuthoritySummary {
            authority: "Testshire".to_string(),
            latitude: 52.0,
            longitude: -1.0,
            total: 4,
            urban: 2,
            rural: 2,
        };
        assert_eq!(summary.predominant(), AreaType::Urban);
    }

    #[test]
    fn predominant_follows_majority() {
        let summary = AuthoritySummary {
            authority: "Testshire".to_string(),
            latitude: 52.0,
            longitude: -1.0,
            total: 5,
            urban: 1,
            rural: 4,
        };
        assert_eq!(summary.predominant(), AreaType::Rural);
    }
}
