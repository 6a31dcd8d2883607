//! HTTP handler functions for the dashboard pages and the JSON API.

use std::str::FromStr as _;

use accident_map_accident_models::AreaType;
use accident_map_analytics::{AnalyticsError, queries};
use accident_map_server_models::{ApiHealth, AuthorityQueryParams, CasualtyQueryParams};
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::pages::{self, Tab};
use crate::AppState;

/// Wraps a tab body in the dashboard layout.
fn page(tab: Tab, body: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(pages::layout(tab, body))
}

/// Runs a query against the dataset pool and serialises the result.
///
/// Returns 503 when the datasets failed to load at startup and 500 when
/// the query itself fails; both carry a JSON error body and the failure
/// is logged with `context`.
fn with_data<T, F>(state: &AppState, context: &str, f: F) -> HttpResponse
where
    T: Serialize,
    F: FnOnce(&duckdb::Connection) -> Result<T, AnalyticsError>,
{
    let Some(pool) = state.data.as_ref() else {
        return HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "error": state
                .data_error
                .clone()
                .unwrap_or_else(|| "datasets not loaded".to_string()),
        }));
    };

    let conn = pool.acquire();
    match f(&conn) {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => {
            log::error!("{context}: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({ "error": context }))
        }
    }
}

/// Parses an optional `area` query value, rejecting unknown labels.
fn parse_area(value: Option<&str>) -> Result<Option<AreaType>, HttpResponse> {
    match value {
        None => Ok(None),
        Some(label) => AreaType::from_str(label).map(Some).map_err(|_| {
            HttpResponse::BadRequest().json(serde_json::json!({
                "error": format!("unknown area: {label}"),
            }))
        }),
    }
}

// ── Pages ───────────────────────────────────────────

/// `GET /`
pub async fn home(state: web::Data<AppState>) -> HttpResponse {
    page(Tab::Home, &pages::home_body(&state))
}

/// `GET /density`
pub async fn density(state: web::Data<AppState>) -> HttpResponse {
    page(Tab::DensityHeatmap, &pages::density_body(&state))
}

/// `GET /urban-rural-map`
pub async fn urban_rural_map(state: web::Data<AppState>) -> HttpResponse {
    page(Tab::UrbanRuralMap, &pages::urban_rural_map_body(&state))
}

/// `GET /analysis`
pub async fn analysis(state: web::Data<AppState>) -> HttpResponse {
    page(Tab::Analysis, &pages::analysis_body(&state))
}

/// `GET /about`
pub async fn about() -> HttpResponse {
    page(Tab::About, &pages::about_body())
}

// ── API ─────────────────────────────────────────────

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        dataset_loaded: state.data.is_some(),
    })
}

/// `GET /api/summary`
pub async fn summary(state: web::Data<AppState>) -> HttpResponse {
    with_data(&state, "Failed to compute dataset summary", |conn| {
        queries::dataset_summary(conn)
    })
}

/// `GET /api/severity`
pub async fn severity(state: web::Data<AppState>) -> HttpResponse {
    with_data(&state, "Failed to compute severity counts", |conn| {
        queries::severity_counts(conn)
    })
}

/// `GET /api/areas`
pub async fn areas(state: web::Data<AppState>) -> HttpResponse {
    with_data(&state, "Failed to compute area counts", |conn| {
        queries::area_counts(conn)
    })
}

/// `GET /api/authorities`
///
/// Ranked local authorities, optionally filtered by classification.
pub async fn authorities(
    state: web::Data<AppState>,
    params: web::Query<AuthorityQueryParams>,
) -> HttpResponse {
    let area = match parse_area(params.area.as_deref()) {
        Ok(area) => area,
        Err(response) => return response,
    };
    let limit = params.limit.unwrap_or(10);

    with_data(&state, "Failed to rank authorities", move |conn| {
        queries::top_authorities(conn, area, limit)
    })
}

/// `GET /api/casualties`
///
/// Casualty five-number summaries, one per requested classification.
pub async fn casualties(
    state: web::Data<AppState>,
    params: web::Query<CasualtyQueryParams>,
) -> HttpResponse {
    let area = match parse_area(params.area.as_deref()) {
        Ok(area) => area,
        Err(response) => return response,
    };

    with_data(&state, "Failed to summarise casualties", move |conn| {
        let requested: &[AreaType] = match area {
            Some(ref one) => std::slice::from_ref(one),
            None => AreaType::all(),
        };
        requested
            .iter()
            .map(|&area| queries::casualty_summary(conn, area))
            .collect::<Result<Vec<_>, _>>()
    })
}

/// `GET /api/hours`
pub async fn hours(state: web::Data<AppState>) -> HttpResponse {
    with_data(&state, "Failed to compute hourly counts", |conn| {
        queries::hourly_counts(conn)
    })
}

/// `GET /api/vehicles`
pub async fn vehicles(state: web::Data<AppState>) -> HttpResponse {
    with_data(&state, "Failed to count vehicle types", |conn| {
        queries::vehicle_type_counts(conn, 20)
    })
}
