//! Aggregation queries over the `accidents` and `vehicles` views.
//!
//! Grouping keys come back ordered (severity by ordinal, authorities by
//! name, ranked counts descending with name tie-break) so repeated calls
//! are directly comparable. Rows whose severity or area label is not a
//! recognised value are excluded from grouped counts and logged.

use std::str::FromStr as _;

use accident_map_accident_models::{AreaType, Season, Severity, TimePeriod, columns};
use accident_map_analytics_models::{
    AreaCount, AuthorityCount, AuthoritySummary, CasualtySummary, DatasetSummary, GeoPoint,
    HourlyCount, MonthlyCount, PeriodCount, SeasonCount, SeverityCount, VehicleTypeCount,
};
use accident_map_dataset::{ACCIDENTS_VIEW, VEHICLES_VIEW};

use crate::AnalyticsError;

/// Quotes an upstream column name for SQL. Needed because some dataset
/// columns contain characters like parentheses.
fn quoted(column: &str) -> String {
    format!("\"{column}\"")
}

/// Clamps a `COUNT(*)` result to `u64`.
fn non_negative(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

/// Dataset-wide headline figures: totals, fatal count, and year range.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the query fails.
pub fn dataset_summary(conn: &duckdb::Connection) -> Result<DatasetSummary, AnalyticsError> {
    let sql = format!(
        "SELECT COUNT(*),
                CAST(COALESCE(SUM({casualties}), 0) AS BIGINT),
                COUNT(*) FILTER (WHERE {severity} = 'Fatal'),
                CAST(MIN({year}) AS INTEGER),
                CAST(MAX({year}) AS INTEGER)
         FROM {ACCIDENTS_VIEW}",
        casualties = quoted(columns::CASUALTIES),
        severity = quoted(columns::SEVERITY),
        year = quoted(columns::YEAR),
    );

    let (accidents, casualties, fatal, min_year, max_year) =
        conn.query_row(&sql, [], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, Option<i32>>(3)?,
                row.get::<_, Option<i32>>(4)?,
            ))
        })?;

    Ok(DatasetSummary {
        accidents: non_negative(accidents),
        casualties: non_negative(casualties),
        fatal: non_negative(fatal),
        min_year,
        max_year,
    })
}

/// Accident counts grouped by severity, ascending by ordinal.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the query fails.
pub fn severity_counts(conn: &duckdb::Connection) -> Result<Vec<SeverityCount>, AnalyticsError> {
    let sql = format!(
        "SELECT {severity}, COUNT(*) FROM {ACCIDENTS_VIEW}
         WHERE {severity} IS NOT NULL
         GROUP BY 1",
        severity = quoted(columns::SEVERITY),
    );

    let mut counts = Vec::new();
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let label: String = row.get(0)?;
        let count: i64 = row.get(1)?;
        match Severity::from_str(&label) {
            Ok(severity) => counts.push(SeverityCount {
                severity,
                count: non_negative(count),
            }),
            Err(_) => log::warn!("Skipping unrecognised severity label: {label}"),
        }
    }
    counts.sort_by_key(|c| c.severity);
    Ok(counts)
}

/// Accident counts grouped by urban/rural classification.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the query fails.
pub fn area_counts(conn: &duckdb::Connection) -> Result<Vec<AreaCount>, AnalyticsError> {
    let sql = format!(
        "SELECT {area}, COUNT(*) FROM {ACCIDENTS_VIEW}
         WHERE {area} IS NOT NULL
         GROUP BY 1",
        area = quoted(columns::AREA),
    );

    let mut counts = Vec::new();
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let label: String = row.get(0)?;
        let count: i64 = row.get(1)?;
        match AreaType::from_str(&label) {
            Ok(area) => counts.push(AreaCount {
                area,
                count: non_negative(count),
            }),
            Err(_) => log::warn!("Skipping unrecognised area label: {label}"),
        }
    }
    counts.sort_by_key(|c| c.area);
    Ok(counts)
}

/// Severity distribution within one urban/rural classification.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the query fails.
pub fn severity_counts_for_area(
    conn: &duckdb::Connection,
    area: AreaType,
) -> Result<Vec<SeverityCount>, AnalyticsError> {
    let sql = format!(
        "SELECT {severity}, COUNT(*) FROM {ACCIDENTS_VIEW}
         WHERE {severity} IS NOT NULL AND {area_col} = ?
         GROUP BY 1",
        severity = quoted(columns::SEVERITY),
        area_col = quoted(columns::AREA),
    );

    let mut counts = Vec::new();
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(duckdb::params![area.as_ref()])?;
    while let Some(row) = rows.next()? {
        let label: String = row.get(0)?;
        let count: i64 = row.get(1)?;
        match Severity::from_str(&label) {
            Ok(severity) => counts.push(SeverityCount {
                severity,
                count: non_negative(count),
            }),
            Err(_) => log::warn!("Skipping unrecognised severity label: {label}"),
        }
    }
    counts.sort_by_key(|c| c.severity);
    Ok(counts)
}

/// Per-local-authority summaries: mean coordinates plus total, urban,
/// and rural counts. Ordered by authority name.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the query fails.
pub fn authority_summaries(
    conn: &duckdb::Connection,
) -> Result<Vec<AuthoritySummary>, AnalyticsError> {
    let sql = format!(
        "SELECT {authority} AS authority,
                AVG(CAST({lat} AS DOUBLE)) AS latitude,
                AVG(CAST({lng} AS DOUBLE)) AS longitude,
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE {area} = 'Urban') AS urban,
                COUNT(*) FILTER (WHERE {area} = 'Rural') AS rural
         FROM {ACCIDENTS_VIEW}
         WHERE {authority} IS NOT NULL
         GROUP BY authority
         ORDER BY authority",
        authority = quoted(columns::LOCAL_AUTHORITY),
        lat = quoted(columns::LATITUDE),
        lng = quoted(columns::LONGITUDE),
        area = quoted(columns::AREA),
    );

    let mut summaries = Vec::new();
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        summaries.push(AuthoritySummary {
            authority: row.get(0)?,
            latitude: row.get::<_, Option<f64>>(1)?.unwrap_or(0.0),
            longitude: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
            total: non_negative(row.get(3)?),
            urban: non_negative(row.get(4)?),
            rural: non_negative(row.get(5)?),
        });
    }
    Ok(summaries)
}

/// Local authorities ranked by descending accident count, optionally
/// restricted to one classification. Count ties break on name.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the query fails.
pub fn top_authorities(
    conn: &duckdb::Connection,
    area: Option<AreaType>,
    limit: usize,
) -> Result<Vec<AuthorityCount>, AnalyticsError> {
    let authority = quoted(columns::LOCAL_AUTHORITY);
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    let mut counts = Vec::new();
    if let Some(area) = area {
        let sql = format!(
            "SELECT {authority} AS authority, COUNT(*) AS total
             FROM {ACCIDENTS_VIEW}
             WHERE {authority} IS NOT NULL AND {area_col} = ?
             GROUP BY authority
             ORDER BY total DESC, authority
             LIMIT ?",
            area_col = quoted(columns::AREA),
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(duckdb::params![area.as_ref(), limit])?;
        while let Some(row) = rows.next()? {
            counts.push(AuthorityCount {
                authority: row.get(0)?,
                count: non_negative(row.get(1)?),
            });
        }
    } else {
        let sql = format!(
            "SELECT {authority} AS authority, COUNT(*) AS total
             FROM {ACCIDENTS_VIEW}
             WHERE {authority} IS NOT NULL
             GROUP BY authority
             ORDER BY total DESC, authority
             LIMIT ?",
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(duckdb::params![limit])?;
        while let Some(row) = rows.next()? {
            counts.push(AuthorityCount {
                authority: row.get(0)?,
                count: non_negative(row.get(1)?),
            });
        }
    }
    Ok(counts)
}

/// Five-number summary (plus mean) of casualties per accident for one
/// classification. Quantiles are exact, not sampled.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the query fails.
pub fn casualty_summary(
    conn: &duckdb::Connection,
    area: AreaType,
) -> Result<CasualtySummary, AnalyticsError> {
    let sql = format!(
        "SELECT CAST(MIN(c) AS DOUBLE),
                quantile_cont(c, 0.25),
                quantile_cont(c, 0.5),
                quantile_cont(c, 0.75),
                CAST(MAX(c) AS DOUBLE),
                AVG(c)
         FROM (
             SELECT CAST({casualties} AS DOUBLE) AS c
             FROM {ACCIDENTS_VIEW}
             WHERE {area_col} = ? AND {casualties} IS NOT NULL
         )",
        casualties = quoted(columns::CASUALTIES),
        area_col = quoted(columns::AREA),
    );

    let (min, q1, median, q3, max, mean) =
        conn.query_row(&sql, duckdb::params![area.as_ref()], |row| {
            Ok((
                row.get::<_, Option<f64>>(0)?,
                row.get::<_, Option<f64>>(1)?,
                row.get::<_, Option<f64>>(2)?,
                row.get::<_, Option<f64>>(3)?,
                row.get::<_, Option<f64>>(4)?,
                row.get::<_, Option<f64>>(5)?,
            ))
        })?;

    Ok(CasualtySummary {
        area,
        min: min.unwrap_or(0.0),
        q1: q1.unwrap_or(0.0),
        median: median.unwrap_or(0.0),
        q3: q3.unwrap_or(0.0),
        max: max.unwrap_or(0.0),
        mean: mean.unwrap_or(0.0),
    })
}

/// Deterministic pseudo-random sample of accident coordinates for the
/// density heatmap. Rows are ordered by `hash(Accident_Index)` so the
/// same input yields the same sample on every run.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the query fails.
pub fn heatmap_points(
    conn: &duckdb::Connection,
    limit: usize,
) -> Result<Vec<GeoPoint>, AnalyticsError> {
    let sql = format!(
        "SELECT CAST({lat} AS DOUBLE), CAST({lng} AS DOUBLE) FROM {ACCIDENTS_VIEW}
         WHERE {lat} IS NOT NULL AND {lng} IS NOT NULL
         ORDER BY hash({index}), {index}
         LIMIT ?",
        lat = quoted(columns::LATITUDE),
        lng = quoted(columns::LONGITUDE),
        index = quoted(columns::ACCIDENT_INDEX),
    );

    let mut points = Vec::new();
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(duckdb::params![i64::try_from(limit).unwrap_or(i64::MAX)])?;
    while let Some(row) = rows.next()? {
        points.push(GeoPoint {
            latitude: row.get(0)?,
            longitude: row.get(1)?,
        });
    }
    Ok(points)
}

/// Accident counts by hour of day, ascending.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the query fails.
pub fn hourly_counts(conn: &duckdb::Connection) -> Result<Vec<HourlyCount>, AnalyticsError> {
    let sql = format!(
        "SELECT CAST({hour} AS INTEGER) AS hour, COUNT(*) FROM {ACCIDENTS_VIEW}
         WHERE {hour} IS NOT NULL
         GROUP BY hour
         ORDER BY hour",
        hour = quoted(columns::HOUR),
    );

    let mut counts = Vec::new();
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let hour: i32 = row.get(0)?;
        let count: i64 = row.get(1)?;
        counts.push(HourlyCount {
            hour: u32::try_from(hour).unwrap_or(0),
            count: non_negative(count),
        });
    }
    Ok(counts)
}

/// Accident counts by month, ascending.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the query fails.
pub fn monthly_counts(conn: &duckdb::Connection) -> Result<Vec<MonthlyCount>, AnalyticsError> {
    let sql = format!(
        "SELECT CAST({month} AS INTEGER) AS month, COUNT(*) FROM {ACCIDENTS_VIEW}
         WHERE {month} IS NOT NULL
         GROUP BY month
         ORDER BY month",
        month = quoted(columns::MONTH),
    );

    let mut counts = Vec::new();
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let month: i32 = row.get(0)?;
        let count: i64 = row.get(1)?;
        counts.push(MonthlyCount {
            month: u32::try_from(month).unwrap_or(0),
            count: non_negative(count),
        });
    }
    Ok(counts)
}

/// Accident counts folded into derived periods of day. Rows with a
/// missing hour count toward [`TimePeriod::Unknown`]. Periods with no
/// accidents are omitted.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the query fails.
pub fn time_period_counts(conn: &duckdb::Connection) -> Result<Vec<PeriodCount>, AnalyticsError> {
    let hourly = hourly_counts(conn)?;
    let missing: i64 = conn.query_row(
        &format!(
            "SELECT COUNT(*) FROM {ACCIDENTS_VIEW} WHERE {hour} IS NULL",
            hour = quoted(columns::HOUR),
        ),
        [],
        |row| row.get(0),
    )?;

    let counts = TimePeriod::all()
        .iter()
        .map(|&period| {
            let count = if period == TimePeriod::Unknown {
                non_negative(missing)
            } else {
                hourly
                    .iter()
                    .filter(|h| TimePeriod::from_hour(Some(h.hour)) == period)
                    .map(|h| h.count)
                    .sum()
            };
            PeriodCount { period, count }
        })
        .filter(|c| c.count > 0)
        .collect();
    Ok(counts)
}

/// Accident counts folded into derived seasons. Seasons with no
/// accidents are omitted.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the query fails.
pub fn season_counts(conn: &duckdb::Connection) -> Result<Vec<SeasonCount>, AnalyticsError> {
    let monthly = monthly_counts(conn)?;

    let counts = Season::all()
        .iter()
        .map(|&season| SeasonCount {
            season,
            count: monthly
                .iter()
                .filter(|m| Season::from_month(m.month) == season)
                .map(|m| m.count)
                .sum(),
        })
        .filter(|c| c.count > 0)
        .collect();
    Ok(counts)
}

/// Vehicle counts by type, joined to the accidents dataset by accident
/// identifier. Vehicle rows whose identifier matches no accident are
/// excluded by the join; they never fail the aggregation.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the query fails.
pub fn vehicle_type_counts(
    conn: &duckdb::Connection,
    limit: usize,
) -> Result<Vec<VehicleTypeCount>, AnalyticsError> {
    let sql = format!(
        "SELECT v.{vehicle_type} AS vehicle_type, COUNT(*) AS total
         FROM {VEHICLES_VIEW} v
         JOIN {ACCIDENTS_VIEW} a ON a.{index} = v.{index}
         WHERE v.{vehicle_type} IS NOT NULL
         GROUP BY vehicle_type
         ORDER BY total DESC, vehicle_type
         LIMIT ?",
        vehicle_type = quoted(columns::VEHICLE_TYPE),
        index = quoted(columns::ACCIDENT_INDEX),
    );

    let mut counts = Vec::new();
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(duckdb::params![i64::try_from(limit).unwrap_or(i64::MAX)])?;
    while let Some(row) = rows.next()? {
        counts.push(VehicleTypeCount {
            vehicle_type: row.get(0)?,
            count: non_negative(row.get(1)?),
        });
    }
    Ok(counts)
}

/// Number of vehicle rows whose accident identifier matches no accident
/// record. Reported for observability; an orphan is never an error.
///
/// # Errors
///
/// Returns [`AnalyticsError`] if the query fails.
pub fn orphan_vehicle_count(conn: &duckdb::Connection) -> Result<u64, AnalyticsError> {
    let sql = format!(
        "SELECT COUNT(*) FROM {VEHICLES_VIEW} v
         WHERE NOT EXISTS (
             SELECT 1 FROM {ACCIDENTS_VIEW} a WHERE a.{index} = v.{index}
         )",
        index = quoted(columns::ACCIDENT_INDEX),
    );
    let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
    Ok(non_negative(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// In-memory fixture matching the dataset view names: 4 accidents
    /// (2 Urban/Slight, 1 Rural/Serious, 1 Urban/Fatal) and 4 vehicles,
    /// one of which references a nonexistent accident.
    fn fixture_conn() -> duckdb::Connection {
        let conn = duckdb::Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE accidents AS
             SELECT * FROM (VALUES
                 ('A1', 51.50, -0.12, 'Slight',  'Urban', 'Westminster', 1, 2019,  1,  8, 'Monday'),
                 ('A2', 51.48, -0.10, 'Slight',  'Urban', 'Westminster', 3, 2019,  4, 17, 'Tuesday'),
                 ('A3', 54.00, -2.80, 'Serious', 'Rural', 'Lancaster',   2, 2020,  7, CAST(NULL AS INTEGER), 'Friday'),
                 ('A4', 52.40, -1.90, 'Fatal',   'Urban', 'Birmingham',  2, 2021, 12, 23, 'Saturday')
             ) AS t(\"Accident_Index\", \"Latitude\", \"Longitude\",
                    \"Accident_Severity\", \"Urban_or_Rural_Area\",
                    \"Local_Authority_(District)\", \"Number_of_Casualties\",
                    \"Year\", \"Month\", \"Hour\", \"Day_of_Week\");

             CREATE TABLE vehicles AS
             SELECT * FROM (VALUES
                 ('A1', 'Car'),
                 ('A2', 'Car'),
                 ('A4', 'Bus or coach'),
                 ('X9', 'Car')
             ) AS t(\"Accident_Index\", \"Vehicle_Type\");",
        )
        .unwrap();
        conn
    }

    #[test]
    fn fixture_area_and_severity_counts() {
        let conn = fixture_conn();

        let areas = area_counts(&conn).unwrap();
        assert_eq!(
            areas,
            vec![
                AreaCount {
                    area: AreaType::Urban,
                    count: 3
                },
                AreaCount {
                    area: AreaType::Rural,
                    count: 1
                },
            ]
        );

        let severities = severity_counts(&conn).unwrap();
        assert_eq!(
            severities,
            vec![
                SeverityCount {
                    severity: Severity::Slight,
                    count: 2
                },
                SeverityCount {
                    severity: Severity::Serious,
                    count: 1
                },
                SeverityCount {
                    severity: Severity::Fatal,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn severity_counts_sum_to_total() {
        let conn = fixture_conn();
        let total: i64 = conn
            .query_row("SELECT COUNT(*) FROM accidents", [], |row| row.get(0))
            .unwrap();
        let sum: u64 = severity_counts(&conn).unwrap().iter().map(|c| c.count).sum();
        assert_eq!(sum, u64::try_from(total).unwrap());
    }

    #[test]
    fn aggregations_are_deterministic() {
        let conn = fixture_conn();
        assert_eq!(
            severity_counts(&conn).unwrap(),
            severity_counts(&conn).unwrap()
        );
        assert_eq!(
            authority_summaries(&conn).unwrap(),
            authority_summaries(&conn).unwrap()
        );
        assert_eq!(
            heatmap_points(&conn, 3).unwrap(),
            heatmap_points(&conn, 3).unwrap()
        );
    }

    #[test]
    fn severity_breakdown_respects_area_filter() {
        let conn = fixture_conn();
        let urban = severity_counts_for_area(&conn, AreaType::Urban).unwrap();
        assert_eq!(
            urban,
            vec![
                SeverityCount {
                    severity: Severity::Slight,
                    count: 2
                },
                SeverityCount {
                    severity: Severity::Fatal,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn authority_summaries_aggregate_per_district() {
        let conn = fixture_conn();
        let summaries = authority_summaries(&conn).unwrap();
        let names: Vec<&str> = summaries.iter().map(|s| s.authority.as_str()).collect();
        assert_eq!(names, vec!["Birmingham", "Lancaster", "Westminster"]);

        let westminster = &summaries[2];
        assert_eq!(westminster.total, 2);
        assert_eq!(westminster.urban, 2);
        assert_eq!(westminster.rural, 0);
        assert_eq!(westminster.predominant(), AreaType::Urban);
        assert!((westminster.latitude - 51.49).abs() < 1e-9);
    }

    #[test]
    fn top_authorities_rank_by_count_then_name() {
        let conn = fixture_conn();
        let top = top_authorities(&conn, None, 2).unwrap();
        assert_eq!(top[0].authority, "Westminster");
        assert_eq!(top[0].count, 2);
        assert_eq!(top[1].authority, "Birmingham");
    }

    #[test]
    fn casualty_summary_computes_exact_quantiles() {
        let conn = fixture_conn();
        // Urban casualties are [1, 3, 2] -> sorted [1, 2, 3]
        let summary = casualty_summary(&conn, AreaType::Urban).unwrap();
        assert!((summary.min - 1.0).abs() < 1e-9);
        assert!((summary.q1 - 1.5).abs() < 1e-9);
        assert!((summary.median - 2.0).abs() < 1e-9);
        assert!((summary.q3 - 2.5).abs() < 1e-9);
        assert!((summary.max - 3.0).abs() < 1e-9);
        assert!((summary.mean - 2.0).abs() < 1e-9);
    }

    #[test]
    fn heatmap_points_respect_limit() {
        let conn = fixture_conn();
        assert_eq!(heatmap_points(&conn, 3).unwrap().len(), 3);
        assert_eq!(heatmap_points(&conn, 10).unwrap().len(), 4);
    }

    #[test]
    fn orphan_vehicle_never_fails_the_join() {
        let conn = fixture_conn();

        let types = vehicle_type_counts(&conn, 10).unwrap();
        assert_eq!(
            types,
            vec![
                VehicleTypeCount {
                    vehicle_type: "Car".to_string(),
                    count: 2
                },
                VehicleTypeCount {
                    vehicle_type: "Bus or coach".to_string(),
                    count: 1
                },
            ]
        );

        assert_eq!(orphan_vehicle_count(&conn).unwrap(), 1);
    }

    #[test]
    fn summary_covers_dataset() {
        let conn = fixture_conn();
        let summary = dataset_summary(&conn).unwrap();
        assert_eq!(summary.accidents, 4);
        assert_eq!(summary.casualties, 8);
        assert_eq!(summary.fatal, 1);
        assert_eq!(summary.min_year, Some(2019));
        assert_eq!(summary.max_year, Some(2021));
    }

    #[test]
    fn derived_period_and_season_counts() {
        let conn = fixture_conn();

        let periods = time_period_counts(&conn).unwrap();
        assert_eq!(
            periods,
            vec![
                PeriodCount {
                    period: TimePeriod::Morning,
                    count: 1
                },
                PeriodCount {
                    period: TimePeriod::Afternoon,
                    count: 1
                },
                PeriodCount {
                    period: TimePeriod::Night,
                    count: 1
                },
                PeriodCount {
                    period: TimePeriod::Unknown,
                    count: 1
                },
            ]
        );

        let seasons = season_counts(&conn).unwrap();
        assert_eq!(
            seasons,
            vec![
                SeasonCount {
                    season: Season::Winter,
                    count: 2
                },
                SeasonCount {
                    season: Season::Spring,
                    count: 1
                },
                SeasonCount {
                    season: Season::Summer,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn malformed_schema_propagates_as_error() {
        let conn = duckdb::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE accidents (id INTEGER)")
            .unwrap();
        assert!(severity_counts(&conn).is_err());
    }
}
