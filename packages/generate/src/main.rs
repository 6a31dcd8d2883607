#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! CLI tool for generating the pre-rendered map and chart documents.
//!
//! Run this once (and after every dataset refresh) so the dashboard can
//! embed the documents instead of re-rendering them per request.

use std::path::PathBuf;

use accident_map_dataset::{DatasetPaths, open_dataset, paths};
use accident_map_generate::{ALL_OUTPUTS, CHART_OUTPUTS, MAP_OUTPUTS, run_with_cache};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Parser)]
#[command(name = "accident_map_generate", about = "Map document generation tool")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Force regeneration even if the datasets haven't changed.
    #[arg(long)]
    force: bool,

    /// Override the accidents Parquet path.
    #[arg(long)]
    accidents: Option<PathBuf>,

    /// Override the vehicles Parquet path.
    #[arg(long)]
    vehicles: Option<PathBuf>,

    /// Override the output directory for the generated documents.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the density heatmap and urban-vs-rural map documents
    Maps,
    /// Generate the four urban-vs-rural comparison chart documents
    Charts,
    /// Generate every document (default)
    All,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let dataset_paths = DatasetPaths {
        accidents: cli
            .accidents
            .unwrap_or_else(paths::accidents_parquet_path),
        vehicles: cli.vehicles.unwrap_or_else(paths::vehicles_parquet_path),
    };
    let out_dir = cli.out_dir.unwrap_or_else(paths::maps_dir);

    let requested = match cli.command.unwrap_or(Commands::All) {
        Commands::Maps => MAP_OUTPUTS,
        Commands::Charts => CHART_OUTPUTS,
        Commands::All => ALL_OUTPUTS,
    };

    log::info!("Loading datasets...");
    let conn = open_dataset(&dataset_paths)?;

    let bar = ProgressBar::new(requested.len() as u64);
    bar.set_style(
        ProgressStyle::with_template(
            "{msg} {wide_bar:.green/dim} {pos}/{len} [{elapsed_precise}]",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-"),
    );

    let regenerated = run_with_cache(
        &conn,
        &dataset_paths,
        &out_dir,
        requested,
        cli.force,
        |name| {
            bar.set_message(name.to_string());
            bar.inc(1);
        },
    )?;

    if regenerated.is_empty() {
        bar.finish_with_message("up-to-date");
    } else {
        bar.finish_with_message(format!("generated {} document(s)", regenerated.len()));
    }
    log::info!(
        "Documents available under {} and can be loaded instantly in the dashboard",
        out_dir.display()
    );

    Ok(())
}
