mod app;
mod color;
mod config;
mod state;
mod ui;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use serde::Serialize;

use app::DashboardApp;
use config::Args;
use fabric_dashboard::data::{
    load_file, summarize, write_csv, ChartDatasets, Dashboard, FilterCriteria, SummaryStats,
};
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.headless() {
        return run_headless(&args);
    }

    let app = DashboardApp::new(initial_state(&args));
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sustainable Fashion Trends Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("UI terminated with an error: {e}"))
}

/// Load the dataset and apply the filter flags.
fn open_dashboard(path: &Path, args: &Args) -> Result<Dashboard> {
    let table = load_file(path).with_context(|| format!("loading {}", path.display()))?;
    let mut dashboard = Dashboard::new(table)
        .with_context(|| format!("preparing dashboard for {}", path.display()))?;
    args.apply_filters(&mut dashboard)?;
    Ok(dashboard)
}

fn initial_state(args: &Args) -> AppState {
    let mut state = AppState::default();
    if let Some(path) = &args.data {
        match open_dashboard(path, args) {
            Ok(dashboard) => {
                state.source = Some(path.clone());
                state.set_dashboard(dashboard);
            }
            Err(e) => {
                log::error!("{e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
    state
}

#[derive(Serialize)]
struct Report<'a> {
    criteria: &'a FilterCriteria,
    records: usize,
    summary: SummaryStats,
    charts: ChartDatasets,
}

fn run_headless(args: &Args) -> Result<()> {
    let path = args
        .data
        .as_deref()
        .context("a dataset path is required with --summary or --export")?;
    let dashboard = open_dashboard(path, args)?;
    let filtered = dashboard.filtered_table();

    if args.summary {
        let report = Report {
            criteria: dashboard.criteria(),
            records: filtered.len(),
            summary: summarize(&filtered),
            charts: ChartDatasets::from_table(&filtered),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if let Some(out) = &args.export {
        write_csv(&filtered, out).with_context(|| format!("exporting to {}", out.display()))?;
    }
    Ok(())
}
