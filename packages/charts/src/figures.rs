//! Builders for the figures used by the generator and the dashboard.
//!
//! Trace shapes, colours, titles, and map framing follow the published
//! dashboard: UK-centred maps at zoom 5 over the open-street-map
//! basemap, area-type colours from the taxonomy crate.

use accident_map_accident_models::AreaType;
use accident_map_analytics_models::{
    AreaCount, AuthorityCount, AuthoritySummary, CasualtySummary, GeoPoint, SeverityCount,
};
use serde_json::json;

use crate::Figure;

/// Latitude of the map centre covering the UK.
pub const UK_CENTER_LAT: f64 = 54.5;

/// Longitude of the map centre covering the UK.
pub const UK_CENTER_LON: f64 = -3.5;

/// Zoom level framing the whole UK.
pub const UK_ZOOM: u8 = 5;

/// Point radius, in pixels, of the density heatmap.
const HEATMAP_RADIUS: u8 = 8;

/// Maximum bubble diameter, in pixels, on the authority map.
const BUBBLE_SIZE_MAX: f64 = 50.0;

/// Density heatmap of sampled accident coordinates.
#[must_use]
pub fn density_map(title: &str, points: &[GeoPoint]) -> Figure {
    let lat: Vec<f64> = points.iter().map(|p| p.latitude).collect();
    let lon: Vec<f64> = points.iter().map(|p| p.longitude).collect();

    Figure {
        data: vec![json!({
            "type": "densitymapbox",
            "lat": lat,
            "lon": lon,
            "radius": HEATMAP_RADIUS,
            "showscale": true,
        })],
        layout: json!({
            "title": { "text": title },
            "mapbox": {
                "style": "open-street-map",
                "center": { "lat": UK_CENTER_LAT, "lon": UK_CENTER_LON },
                "zoom": UK_ZOOM,
            },
            "height": 700,
            "margin": { "t": 50, "r": 0, "b": 0, "l": 0 },
        }),
    }
}

/// Bubble map of local authorities: one trace per predominant area
/// type, bubble size proportional to the authority's total accidents.
#[must_use]
pub fn authority_bubble_map(title: &str, authorities: &[AuthoritySummary]) -> Figure {
    let max_total = authorities.iter().map(|a| a.total).max().unwrap_or(1).max(1);
    // Plotly's area scaling: sizeref = 2 * max(size) / size_max^2
    #[allow(clippy::cast_precision_loss)]
    let sizeref = 2.0 * max_total as f64 / (BUBBLE_SIZE_MAX * BUBBLE_SIZE_MAX);

    let data = AreaType::all()
        .iter()
        .map(|&area| {
            let members: Vec<&AuthoritySummary> = authorities
                .iter()
                .filter(|a| a.predominant() == area)
                .collect();

            let lat: Vec<f64> = members.iter().map(|a| a.latitude).collect();
            let lon: Vec<f64> = members.iter().map(|a| a.longitude).collect();
            let sizes: Vec<u64> = members.iter().map(|a| a.total).collect();
            let text: Vec<String> = members
                .iter()
                .map(|a| {
                    format!(
                        "{}<br>Total: {}<br>Urban: {}<br>Rural: {}",
                        a.authority, a.total, a.urban, a.rural
                    )
                })
                .collect();

            json!({
                "type": "scattermapbox",
                "name": area.to_string(),
                "mode": "markers",
                "lat": lat,
                "lon": lon,
                "text": text,
                "hoverinfo": "text",
                "marker": {
                    "size": sizes,
                    "sizemode": "area",
                    "sizeref": sizeref,
                    "sizemin": 2,
                    "color": area.chart_color(),
                },
            })
        })
        .collect();

    Figure {
        data,
        layout: json!({
            "title": { "text": title },
            "mapbox": {
                "style": "open-street-map",
                "center": { "lat": UK_CENTER_LAT, "lon": UK_CENTER_LON },
                "zoom": UK_ZOOM,
            },
            "height": 800,
            "margin": { "t": 50, "r": 0, "b": 0, "l": 0 },
            "legend": {
                "title": { "text": "Area Type" },
                "orientation": "h",
                "yanchor": "bottom",
                "y": 1.02,
                "xanchor": "right",
                "x": 1,
            },
        }),
    }
}

/// Vertical bar chart of accident counts per area type.
#[must_use]
pub fn area_count_bar(title: &str, counts: &[AreaCount]) -> Figure {
    let labels: Vec<String> = counts.iter().map(|c| c.area.to_string()).collect();
    let values: Vec<u64> = counts.iter().map(|c| c.count).collect();
    let colors: Vec<&str> = counts.iter().map(|c| c.area.chart_color()).collect();

    Figure {
        data: vec![json!({
            "type": "bar",
            "x": labels,
            "y": values,
            "marker": { "color": colors },
            "text": values,
            "textposition": "auto",
            "texttemplate": "%{text:,.0f}",
        })],
        layout: json!({
            "title": { "text": title },
            "xaxis": { "title": { "text": "Area Type" } },
            "yaxis": { "title": { "text": "Number of Accidents" } },
            "height": 400,
            "showlegend": false,
        }),
    }
}

/// Donut chart of a severity distribution.
#[must_use]
pub fn severity_donut(title: &str, counts: &[SeverityCount]) -> Figure {
    let labels: Vec<String> = counts.iter().map(|c| c.severity.to_string()).collect();
    let values: Vec<u64> = counts.iter().map(|c| c.count).collect();
    let colors: Vec<&str> = counts.iter().map(|c| c.severity.chart_color()).collect();

    Figure {
        data: vec![json!({
            "type": "pie",
            "labels": labels,
            "values": values,
            "marker": { "colors": colors },
            "hole": 0.3,
            "textinfo": "label+percent",
            "textposition": "auto",
        })],
        layout: json!({
            "title": { "text": title },
            "height": 400,
        }),
    }
}

/// Box plot from precomputed casualty summaries, one box per area type.
#[must_use]
pub fn casualty_box_plot(title: &str, summaries: &[CasualtySummary]) -> Figure {
    let data = summaries
        .iter()
        .map(|s| {
            json!({
                "type": "box",
                "name": s.area.to_string(),
                "q1": [s.q1],
                "median": [s.median],
                "q3": [s.q3],
                "lowerfence": [s.min],
                "upperfence": [s.max],
                "mean": [s.mean],
                "marker": { "color": s.area.chart_color() },
            })
        })
        .collect();

    Figure {
        data,
        layout: json!({
            "title": { "text": title },
            "yaxis": { "title": { "text": "Number of Casualties" } },
            "height": 400,
            "showlegend": true,
        }),
    }
}

/// Horizontal bar chart of ranked local authorities, largest on top.
#[must_use]
pub fn authority_hbar(title: &str, counts: &[AuthorityCount], color: &str) -> Figure {
    // Plotly draws horizontal bars bottom-up; reverse so the largest
    // count lands at the top of the chart.
    let labels: Vec<&str> = counts.iter().rev().map(|c| c.authority.as_str()).collect();
    let values: Vec<u64> = counts.iter().rev().map(|c| c.count).collect();

    Figure {
        data: vec![json!({
            "type": "bar",
            "orientation": "h",
            "x": values,
            "y": labels,
            "marker": { "color": color },
        })],
        layout: json!({
            "title": { "text": title },
            "xaxis": { "title": { "text": "Number of Accidents" } },
            "height": 400,
            "margin": { "l": 160 },
            "showlegend": false,
        }),
    }
}

/// Vertical bar chart for generic label/count pairs (hourly counts,
/// vehicle types, derived periods).
#[must_use]
pub fn count_bar(title: &str, x_title: &str, pairs: &[(String, u64)], color: &str) -> Figure {
    let labels: Vec<&str> = pairs.iter().map(|(label, _)| label.as_str()).collect();
    let values: Vec<u64> = pairs.iter().map(|&(_, count)| count).collect();

    Figure {
        data: vec![json!({
            "type": "bar",
            "x": labels,
            "y": values,
            "marker": { "color": color },
        })],
        layout: json!({
            "title": { "text": title },
            "xaxis": { "title": { "text": x_title } },
            "yaxis": { "title": { "text": "Number of Accidents" } },
            "height": 400,
            "showlegend": false,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accident_map_accident_models::Severity;

    #[test]
    fn bubble_map_splits_traces_by_predominant_type() {
        let authorities = vec![
            AuthoritySummary {
                authority: "Westminster".to_string(),
                latitude: 51.5,
                longitude: -0.1,
                total: 10,
                urban: 9,
                rural: 1,
            },
            AuthoritySummary {
                authority: "Eden".to_string(),
                latitude: 54.6,
                longitude: -2.7,
                total: 4,
                urban: 1,
                rural: 3,
            },
        ];
        let figure = authority_bubble_map("title", &authorities);
        assert_eq!(figure.data.len(), 2);
        assert_eq!(figure.data[0]["name"], "Urban");
        assert_eq!(figure.data[1]["name"], "Rural");
        assert_eq!(figure.data[0]["lat"][0], 51.5);
        assert_eq!(figure.data[1]["marker"]["color"], "#4ECDC4");
    }

    #[test]
    fn severity_donut_carries_labels_and_hole() {
        let counts = vec![
            SeverityCount {
                severity: Severity::Slight,
                count: 8,
            },
            SeverityCount {
                severity: Severity::Fatal,
                count: 2,
            },
        ];
        let figure = severity_donut("Severity", &counts);
        assert_eq!(figure.data[0]["labels"][0], "Slight");
        assert_eq!(figure.data[0]["values"][1], 2);
        assert!((figure.data[0]["hole"].as_f64().unwrap() - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn density_map_frames_the_uk() {
        let points = vec![GeoPoint {
            latitude: 51.5,
            longitude: -0.1,
        }];
        let figure = density_map("Density", &points);
        assert_eq!(figure.layout["mapbox"]["center"]["lat"], 54.5);
        assert_eq!(figure.layout["mapbox"]["zoom"], 5);
        assert_eq!(figure.layout["mapbox"]["style"], "open-street-map");
    }

    #[test]
    fn hbar_reverses_for_top_down_ranking() {
        let counts = vec![
            AuthorityCount {
                authority: "First".to_string(),
                count: 9,
            },
            AuthorityCount {
                authority: "Second".to_string(),
                count: 3,
            },
        ];
        let figure = authority_hbar("Top", &counts, "#FF6B6B");
        assert_eq!(figure.data[0]["y"][0], "Second");
        assert_eq!(figure.data[0]["y"][1], "First");
    }
}
