#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web dashboard server for the accident map application.
//!
//! Serves five navigation tabs rendered server-side, the pre-generated
//! map documents under `/maps`, and a JSON API under `/api`. The
//! datasets are loaded once at startup into a read-only connection
//! pool; a missing input file is recorded instead of crashing, so the
//! dashboard still starts and renders the error inline while
//! data-independent tabs stay usable.

mod handlers;
pub mod pages;

use std::path::PathBuf;
use std::sync::Arc;

use accident_map_dataset::{paths, DatasetPaths, DatasetPool};
use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};

/// Connections held by the dataset pool.
const POOL_SIZE: usize = 4;

/// Shared application state.
pub struct AppState {
    /// Dataset connection pool, `None` when loading failed at startup.
    pub data: Option<Arc<DatasetPool>>,
    /// Human-readable reason the datasets are unavailable.
    pub data_error: Option<String>,
    /// Directory holding the pre-generated map documents.
    pub maps_dir: PathBuf,
}

/// Starts the accident map dashboard server.
///
/// Loads the datasets, binds the HTTP server, and attempts to open the
/// dashboard in the system browser. This is a regular async function —
/// the caller is responsible for providing the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    log::info!("Loading datasets...");
    let dataset_paths = DatasetPaths::canonical();
    let (data, data_error) = match DatasetPool::open(&dataset_paths, POOL_SIZE) {
        Ok(pool) => (Some(Arc::new(pool)), None),
        Err(e) => {
            log::error!("Failed to load datasets: {e}");
            (None, Some(e.to_string()))
        }
    };

    let maps_dir = paths::maps_dir();
    if let Err(e) = paths::ensure_dir(&maps_dir) {
        log::warn!("Could not create maps directory {}: {e}", maps_dir.display());
    }

    let state = web::Data::new(AppState {
        data,
        data_error,
        maps_dir: maps_dir.clone(),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/summary", web::get().to(handlers::summary))
                    .route("/severity", web::get().to(handlers::severity))
                    .route("/areas", web::get().to(handlers::areas))
                    .route("/authorities", web::get().to(handlers::authorities))
                    .route("/casualties", web::get().to(handlers::casualties))
                    .route("/hours", web::get().to(handlers::hours))
                    .route("/vehicles", web::get().to(handlers::vehicles)),
            )
            // Serve pre-generated map documents
            .service(Files::new("/maps", maps_dir.clone()))
            .route("/", web::get().to(handlers::home))
            .route("/density", web::get().to(handlers::density))
            .route("/urban-rural-map", web::get().to(handlers::urban_rural_map))
            .route("/analysis", web::get().to(handlers::analysis))
            .route("/about", web::get().to(handlers::about))
    })
    .bind((bind_addr.clone(), port))?;

    open_browser(&format!("http://{bind_addr}:{port}/"));

    server.run().await
}

/// Attempts to open the dashboard URL in the system browser. Failure is
/// logged, never fatal.
fn open_browser(url: &str) {
    #[cfg(target_os = "macos")]
    let command = "open";
    #[cfg(not(target_os = "macos"))]
    let command = "xdg-open";

    match std::process::Command::new(command).arg(url).spawn() {
        Ok(_) => log::info!("Opening {url} in the default browser"),
        Err(e) => log::warn!("Could not open the browser automatically: {e} (visit {url})"),
    }
}
