#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Accident taxonomy types and dataset column definitions.
//!
//! This crate defines the canonical severity and urban/rural
//! classification types used across the entire accident-map system,
//! plus the derived temporal categories and the column names of the
//! cleaned Parquet datasets (an external contract with the upstream
//! cleaning process).

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Accident severity, from 1 (slight) to 3 (fatal).
///
/// The dataset stores severity as the display labels `Slight`,
/// `Serious`, and `Fatal`; the numeric value preserves the ordinal
/// ranking.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Severity {
    /// Level 1: injury not requiring hospital treatment
    Slight = 1,
    /// Level 2: injury requiring hospital treatment
    Serious = 2,
    /// Level 3: at least one fatality
    Fatal = 3,
}

impl Severity {
    /// Returns the numeric ordinal of this severity level.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Creates a severity level from a numeric value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not in the range 1-3.
    pub const fn from_value(value: u8) -> Result<Self, InvalidSeverityError> {
        match value {
            1 => Ok(Self::Slight),
            2 => Ok(Self::Serious),
            3 => Ok(Self::Fatal),
            _ => Err(InvalidSeverityError { value }),
        }
    }

    /// Returns the chart colour used for this severity across the
    /// dashboard and the pre-generated documents.
    #[must_use]
    pub const fn chart_color(self) -> &'static str {
        match self {
            Self::Slight => "orange",
            Self::Serious => "lightcoral",
            Self::Fatal => "darkred",
        }
    }

    /// Returns all variants of this enum, in ascending severity order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Slight, Self::Serious, Self::Fatal]
    }
}

/// Error returned when attempting to create a [`Severity`] from an invalid
/// numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidSeverityError {
    /// The invalid severity value that was provided.
    pub value: u8,
}

impl std::fmt::Display for InvalidSeverityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid severity value {}: expected 1-3", self.value)
    }
}

impl std::error::Error for InvalidSeverityError {}

/// Urban or rural classification of the accident location.
///
/// A two-valued categorical attribute on each accident record.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum AreaType {
    /// Accident within an urban area
    Urban,
    /// Accident within a rural area
    Rural,
}

impl AreaType {
    /// Returns the chart colour used for this area type across the
    /// dashboard and the pre-generated documents.
    #[must_use]
    pub const fn chart_color(self) -> &'static str {
        match self {
            Self::Urban => "#FF6B6B",
            Self::Rural => "#4ECDC4",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Urban, Self::Rural]
    }
}

/// Period of day derived from the accident hour.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum TimePeriod {
    /// 06:00 to 11:59
    Morning,
    /// 12:00 to 17:59
    Afternoon,
    /// 18:00 to 21:59
    Evening,
    /// 22:00 to 05:59
    Night,
    /// Hour missing from the record
    Unknown,
}

impl TimePeriod {
    /// Derives the period of day from an hour-of-day value, or
    /// [`Self::Unknown`] when the hour is missing.
    #[must_use]
    pub const fn from_hour(hour: Option<u32>) -> Self {
        match hour {
            Some(6..=11) => Self::Morning,
            Some(12..=17) => Self::Afternoon,
            Some(18..=21) => Self::Evening,
            Some(_) => Self::Night,
            None => Self::Unknown,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Morning,
            Self::Afternoon,
            Self::Evening,
            Self::Night,
            Self::Unknown,
        ]
    }
}

/// Meteorological season derived from the accident month.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Season {
    /// December, January, February
    Winter,
    /// March, April, May
    Spring,
    /// June, July, August
    Summer,
    /// September, October, November
    Autumn,
}

impl Season {
    /// Derives the season from a month number (1-12). Months outside
    /// the winter/spring/summer windows fold into autumn, matching the
    /// dataset's derived-column definition.
    #[must_use]
    pub const fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Self::Winter,
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            _ => Self::Autumn,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Winter, Self::Spring, Self::Summer, Self::Autumn]
    }
}

/// Column names of the cleaned Parquet datasets.
///
/// These are an external contract with the upstream cleaning process;
/// every SQL statement in the workspace references columns through these
/// constants.
pub mod columns {
    /// Accident identifier, shared by both datasets.
    pub const ACCIDENT_INDEX: &str = "Accident_Index";
    /// Accident latitude (WGS84).
    pub const LATITUDE: &str = "Latitude";
    /// Accident longitude (WGS84).
    pub const LONGITUDE: &str = "Longitude";
    /// Severity label column (`Slight`/`Serious`/`Fatal`).
    pub const SEVERITY: &str = "Accident_Severity";
    /// Urban/rural classification column (`Urban`/`Rural`).
    pub const AREA: &str = "Urban_or_Rural_Area";
    /// Local authority district name. The parentheses are part of the
    /// upstream column name and require quoting in SQL.
    pub const LOCAL_AUTHORITY: &str = "Local_Authority_(District)";
    /// Casualty count per accident.
    pub const CASUALTIES: &str = "Number_of_Casualties";
    /// Accident year.
    pub const YEAR: &str = "Year";
    /// Accident month (1-12).
    pub const MONTH: &str = "Month";
    /// Accident hour of day (0-23).
    pub const HOUR: &str = "Hour";
    /// Day-of-week name.
    pub const DAY_OF_WEEK: &str = "Day_of_Week";
    /// Vehicle type label (vehicles dataset).
    pub const VEHICLE_TYPE: &str = "Vehicle_Type";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr as _;

    #[test]
    fn severity_ordering_is_ordinal() {
        assert!(Severity::Slight < Severity::Serious);
        assert!(Severity::Serious < Severity::Fatal);
    }

    #[test]
    fn severity_from_value_roundtrip() {
        for v in 1..=3u8 {
            let severity = Severity::from_value(v).unwrap();
            assert_eq!(severity.value(), v);
        }
        assert!(Severity::from_value(0).is_err());
        assert!(Severity::from_value(4).is_err());
    }

    #[test]
    fn severity_parses_dataset_labels() {
        assert_eq!(Severity::from_str("Slight").unwrap(), Severity::Slight);
        assert_eq!(Severity::from_str("Serious").unwrap(), Severity::Serious);
        assert_eq!(Severity::from_str("Fatal").unwrap(), Severity::Fatal);
        assert!(Severity::from_str("Catastrophic").is_err());
    }

    #[test]
    fn area_parses_dataset_labels() {
        assert_eq!(AreaType::from_str("Urban").unwrap(), AreaType::Urban);
        assert_eq!(AreaType::from_str("Rural").unwrap(), AreaType::Rural);
        assert!(AreaType::from_str("Unallocated").is_err());
    }

    #[test]
    fn time_period_boundaries() {
        assert_eq!(TimePeriod::from_hour(Some(5)), TimePeriod::Night);
        assert_eq!(TimePeriod::from_hour(Some(6)), TimePeriod::Morning);
        assert_eq!(TimePeriod::from_hour(Some(11)), TimePeriod::Morning);
        assert_eq!(TimePeriod::from_hour(Some(12)), TimePeriod::Afternoon);
        assert_eq!(TimePeriod::from_hour(Some(17)), TimePeriod::Afternoon);
        assert_eq!(TimePeriod::from_hour(Some(18)), TimePeriod::Evening);
        assert_eq!(TimePeriod::from_hour(Some(21)), TimePeriod::Evening);
        assert_eq!(TimePeriod::from_hour(Some(22)), TimePeriod::Night);
        assert_eq!(TimePeriod::from_hour(None), TimePeriod::Unknown);
    }

    #[test]
    fn season_mapping() {
        assert_eq!(Season::from_month(12), Season::Winter);
        assert_eq!(Season::from_month(1), Season::Winter);
        assert_eq!(Season::from_month(3), Season::Spring);
        assert_eq!(Season::from_month(7), Season::Summer);
        assert_eq!(Season::from_month(10), Season::Autumn);
    }
}
