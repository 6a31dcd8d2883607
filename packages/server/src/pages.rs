//! Server-rendered dashboard pages.
//!
//! Each tab body is built as a plain HTML string and wrapped by
//! [`layout`]. Map tabs embed the pre-generated documents from the maps
//! directory; when a document is missing the tab renders an explicit
//! hint naming the generator command instead of a broken frame. The
//! analysis tab computes its aggregates live and embeds the figures as
//! inline fragments.

use std::path::Path;

use accident_map_accident_models::{AreaType, Severity};
use accident_map_analytics::{AnalyticsError, queries};
use accident_map_charts::{figures, html};
use accident_map_generate::{
    OUTPUT_AREA_COUNT_CHART, OUTPUT_CASUALTIES_CHART, OUTPUT_DENSITY_HEATMAP,
    OUTPUT_RURAL_SEVERITY_CHART, OUTPUT_URBAN_SEVERITY_CHART, OUTPUT_URBAN_VS_RURAL_MAP,
    output_file_path,
};

use crate::AppState;

/// A failure while building a page body.
#[derive(Debug, thiserror::Error)]
enum PageError {
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error("Render error: {0}")]
    Render(#[from] serde_json::Error),
}

/// The five navigation states of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    /// Landing page with dataset headline figures.
    Home,
    /// Pre-generated density heatmap.
    DensityHeatmap,
    /// Pre-generated urban-vs-rural map and comparison charts.
    UrbanRuralMap,
    /// Live urban-vs-rural analysis charts.
    Analysis,
    /// Static project description.
    About,
}

impl Tab {
    /// URL path serving this tab.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::DensityHeatmap => "/density",
            Self::UrbanRuralMap => "/urban-rural-map",
            Self::Analysis => "/analysis",
            Self::About => "/about",
        }
    }

    /// Navigation label for this tab.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::DensityHeatmap => "Density Heatmap",
            Self::UrbanRuralMap => "Urban vs Rural Map",
            Self::Analysis => "Urban vs Rural Analysis",
            Self::About => "About",
        }
    }

    /// Returns all tabs in navigation order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Home,
            Self::DensityHeatmap,
            Self::UrbanRuralMap,
            Self::Analysis,
            Self::About,
        ]
    }
}

const STYLE: &str = "
body { margin: 0; font-family: system-ui, sans-serif; color: #333; background: #f5f6fa; }
header { padding: 24px; color: #fff; text-align: center;
         background: linear-gradient(90deg, #1f77b4, #ff7f0e); }
header h1 { margin: 0; font-size: 1.8rem; }
nav { display: flex; gap: 4px; padding: 0 16px; background: #fff;
      border-bottom: 1px solid #ddd; }
nav a { padding: 12px 16px; text-decoration: none; color: #333; }
nav a.active { color: #1f77b4; border-bottom: 3px solid #1f77b4; font-weight: bold; }
main { max-width: 1200px; margin: 0 auto; padding: 24px 16px; }
footer { text-align: center; color: #666; padding: 20px; }
.metric-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
               gap: 12px; margin: 16px 0; }
.metric-card { background: #fff; padding: 15px; border-radius: 8px; text-align: center;
               box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
.metric-card .value { font-size: 1.6rem; font-weight: bold; color: #1f77b4; }
.metric-card .label { color: #666; font-size: 0.9rem; }
.chart-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; }
.chart-grid > div { background: #fff; border-radius: 8px; padding: 8px; }
.map-frame { width: 100%; border: none; background: #fff; border-radius: 8px; }
.notice { background: #fff3cd; border-left: 5px solid #ffc107; padding: 16px;
          border-radius: 6px; margin: 16px 0; }
.error { background: #fdecea; border-left: 5px solid #d32f2f; padding: 16px;
         border-radius: 6px; margin: 16px 0; }
.note { color: #666; font-size: 0.9rem; }
";

/// Wraps a tab body in the shared dashboard chrome.
#[must_use]
pub fn layout(active: Tab, body: &str) -> String {
    let nav: String = Tab::all()
        .iter()
        .map(|&tab| {
            let class = if tab == active { " class=\"active\"" } else { "" };
            format!("<a href=\"{}\"{class}>{}</a>", tab.path(), tab.title())
        })
        .collect();

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title} | UK Road Accidents Dashboard</title>\n\
         {plotly}\n\
         <style>{STYLE}</style>\n\
         </head>\n\
         <body>\n\
         <header><h1>UK Road Accidents Analysis Dashboard</h1></header>\n\
         <nav>{nav}</nav>\n\
         <main>{body}</main>\n\
         <footer>Built with Actix Web &amp; Plotly</footer>\n\
         </body>\n\
         </html>\n",
        title = active.title(),
        plotly = html::PLOTLY_SCRIPT_TAG,
    )
}

/// Landing page: intro plus dataset headline metrics.
#[must_use]
pub fn home_body(state: &AppState) -> String {
    let metrics = state.data.as_ref().map_or_else(
        || data_error_box(state),
        |pool| {
            let conn = pool.acquire();
            home_metrics(&conn).unwrap_or_else(|e| {
                log::error!("Failed to compute dataset summary: {e}");
                error_box(&format!("Failed to compute the dataset summary: {e}"))
            })
        },
    );

    format!(
        "<h2>Welcome</h2>\n\
         <p>This dashboard explores UK road accident records to uncover \
         geographic and severity patterns. Use the tabs above to browse \
         the density heatmap, compare urban and rural accidents, and \
         drill into the live analysis charts.</p>\n\
         {metrics}\n\
         <h3>Getting started</h3>\n\
         <p>The two map tabs embed documents pre-rendered by the \
         generator; the analysis tab aggregates the dataset on every \
         visit. If a map tab reports a missing document, run \
         <code>cargo run -p accident_map_generate</code> once.</p>"
    )
}

fn home_metrics(conn: &duckdb::Connection) -> Result<String, PageError> {
    let summary = queries::dataset_summary(conn)?;
    let orphans = queries::orphan_vehicle_count(conn)?;

    let years = match (summary.min_year, summary.max_year) {
        (Some(min), Some(max)) => format!("{min}-{max}"),
        _ => "n/a".to_string(),
    };

    let orphan_note = if orphans > 0 {
        format!(
            "<p class=\"note\">{} vehicle record(s) reference no accident \
             and are excluded from joined statistics.</p>",
            with_separators(orphans)
        )
    } else {
        String::new()
    };

    Ok(format!(
        "<div class=\"metric-grid\">\n\
         {}{}{}{}\
         </div>\n\
         {orphan_note}",
        metric_card("Total Accidents", &with_separators(summary.accidents)),
        metric_card("Total Casualties", &with_separators(summary.casualties)),
        metric_card("Fatal Accidents", &with_separators(summary.fatal)),
        metric_card("Date Range", &years),
    ))
}

/// Density heatmap tab: embeds the pre-generated document.
#[must_use]
pub fn density_body(state: &AppState) -> String {
    format!(
        "<h2>UK Road Accidents Density Heatmap</h2>\n\
         <p>Accident hotspots across the UK, rendered from a fixed \
         sample of accident coordinates.</p>\n\
         {}",
        map_embed(&state.maps_dir, OUTPUT_DENSITY_HEATMAP, 700)
    )
}

/// Urban-vs-rural map tab: the authority bubble map plus the four
/// pre-generated comparison charts.
#[must_use]
pub fn urban_rural_map_body(state: &AppState) -> String {
    let charts: String = [
        OUTPUT_AREA_COUNT_CHART,
        OUTPUT_URBAN_SEVERITY_CHART,
        OUTPUT_RURAL_SEVERITY_CHART,
        OUTPUT_CASUALTIES_CHART,
    ]
    .iter()
    .map(|name| format!("<div>{}</div>\n", map_embed(&state.maps_dir, name, 450)))
    .collect();

    format!(
        "<h2>Urban vs Rural: Local Authority Classification</h2>\n\
         <p>Each bubble is a local authority; size is its total accident \
         count and colour its predominant classification.</p>\n\
         {}\n\
         <h3>Urban vs Rural Detailed Comparison</h3>\n\
         <div class=\"chart-grid\">\n{charts}</div>",
        map_embed(&state.maps_dir, OUTPUT_URBAN_VS_RURAL_MAP, 800)
    )
}

/// Analysis tab: aggregates computed live and rendered inline.
#[must_use]
pub fn analysis_body(state: &AppState) -> String {
    let Some(pool) = state.data.as_ref() else {
        return data_error_box(state);
    };
    let conn = pool.acquire();
    analysis_fragments(&conn).unwrap_or_else(|e| {
        log::error!("Failed to render analysis: {e}");
        error_box(&format!("Failed to render the analysis: {e}"))
    })
}

fn analysis_fragments(conn: &duckdb::Connection) -> Result<String, PageError> {
    let areas = queries::area_counts(conn)?;
    let urban_total = area_total(&areas, AreaType::Urban);
    let rural_total = area_total(&areas, AreaType::Rural);

    let urban_severity = queries::severity_counts_for_area(conn, AreaType::Urban)?;
    let rural_severity = queries::severity_counts_for_area(conn, AreaType::Rural)?;
    let urban_fatal = severity_total(&urban_severity, Severity::Fatal);
    let rural_fatal = severity_total(&rural_severity, Severity::Fatal);

    let metrics = format!(
        "<div class=\"metric-grid\">\n{}{}{}{}</div>\n",
        metric_card(
            "Urban Accidents",
            &format!(
                "{} ({})",
                with_separators(urban_total),
                percentage(urban_total, urban_total + rural_total)
            ),
        ),
        metric_card(
            "Rural Accidents",
            &format!(
                "{} ({})",
                with_separators(rural_total),
                percentage(rural_total, urban_total + rural_total)
            ),
        ),
        metric_card("Urban Fatal Rate", &percentage(urban_fatal, urban_total)),
        metric_card("Rural Fatal Rate", &percentage(rural_fatal, rural_total)),
    );

    let casualty_summaries = AreaType::all()
        .iter()
        .map(|&area| queries::casualty_summary(conn, area))
        .collect::<Result<Vec<_>, _>>()?;

    let top_urban = queries::top_authorities(conn, Some(AreaType::Urban), 10)?;
    let top_rural = queries::top_authorities(conn, Some(AreaType::Rural), 10)?;

    let hourly: Vec<(String, u64)> = queries::hourly_counts(conn)?
        .iter()
        .map(|h| (h.hour.to_string(), h.count))
        .collect();

    let charts = [
        html::fragment(
            "area-count",
            &figures::area_count_bar("Accident Count by Area Type", &areas),
        )?,
        html::fragment(
            "urban-severity",
            &figures::severity_donut("Severity Distribution in Urban Areas", &urban_severity),
        )?,
        html::fragment(
            "rural-severity",
            &figures::severity_donut("Severity Distribution in Rural Areas", &rural_severity),
        )?,
        html::fragment(
            "casualties",
            &figures::casualty_box_plot(
                "Casualties Comparison: Urban vs Rural",
                &casualty_summaries,
            ),
        )?,
        html::fragment(
            "top-urban",
            &figures::authority_hbar(
                "Top 10 Urban Hotspots",
                &top_urban,
                AreaType::Urban.chart_color(),
            ),
        )?,
        html::fragment(
            "top-rural",
            &figures::authority_hbar(
                "Top 10 Rural Hotspots",
                &top_rural,
                AreaType::Rural.chart_color(),
            ),
        )?,
        html::fragment(
            "hourly",
            &figures::count_bar("Accidents by Hour of Day", "Hour of Day", &hourly, "steelblue"),
        )?,
    ];

    let grid: String = charts
        .iter()
        .map(|fragment| format!("<div>{fragment}</div>\n"))
        .collect();

    Ok(format!(
        "<h2>Urban vs Rural Analysis</h2>\n\
         {metrics}\
         <div class=\"chart-grid\">\n{grid}</div>"
    ))
}

/// About tab: static project description.
#[must_use]
pub fn about_body() -> String {
    "<h2>About</h2>\n\
     <p>This dashboard visualises the cleaned UK road accident and \
     vehicle datasets. The data is loaded once at startup from two \
     Parquet files and treated as an immutable snapshot; every chart is \
     an aggregation over that snapshot.</p>\n\
     <p>The heavy map documents are pre-rendered by the \
     <code>accident_map_generate</code> tool and embedded here as \
     static files, so the dashboard never re-renders them per request. \
     Rerun the generator after replacing the datasets.</p>\n\
     <p>Severity follows the published three-level scale (Slight, \
     Serious, Fatal); the urban/rural classification is the two-valued \
     attribute carried on each accident record.</p>"
        .to_string()
}

/// Embeds a pre-generated document, or renders the designed fallback
/// hint when the document has not been generated yet.
fn map_embed(maps_dir: &Path, name: &str, height: u32) -> String {
    if output_file_path(maps_dir, name).exists() {
        format!(
            "<iframe class=\"map-frame\" src=\"/maps/{name}.html\" \
             style=\"height: {height}px\" loading=\"lazy\"></iframe>"
        )
    } else {
        format!(
            "<div class=\"notice\"><strong>{name}.html</strong> has not \
             been generated yet. Run <code>cargo run -p \
             accident_map_generate</code> and reload this page.</div>"
        )
    }
}

fn metric_card(label: &str, value: &str) -> String {
    format!(
        "<div class=\"metric-card\"><div class=\"value\">{value}</div>\
         <div class=\"label\">{label}</div></div>\n"
    )
}

fn error_box(message: &str) -> String {
    format!("<div class=\"error\">{}</div>", html::escape_text(message))
}

fn data_error_box(state: &AppState) -> String {
    let reason = state
        .data_error
        .as_deref()
        .unwrap_or("the datasets are not loaded");
    error_box(&format!(
        "Could not load the accident datasets: {reason}. Place the \
         cleaned Parquet files under the data/ directory and restart \
         the server."
    ))
}

fn area_total(counts: &[accident_map_analytics_models::AreaCount], area: AreaType) -> u64 {
    counts
        .iter()
        .find(|c| c.area == area)
        .map_or(0, |c| c.count)
}

fn severity_total(
    counts: &[accident_map_analytics_models::SeverityCount],
    severity: Severity,
) -> u64 {
    counts
        .iter()
        .find(|c| c.severity == severity)
        .map_or(0, |c| c.count)
}

/// Formats `part` of `total` as a percentage with one decimal place.
fn percentage(part: u64, total: u64) -> String {
    if total == 0 {
        return "n/a".to_string();
    }
    #[allow(clippy::cast_precision_loss)]
    let pct = part as f64 / total as f64 * 100.0;
    format!("{pct:.1}%")
}

/// Formats an integer with thousands separators.
fn with_separators(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
