use std::path::{Path, PathBuf};

use anyhow::Context;
use fabric_dashboard::data::{
    load_file, summarize, write_csv, ChartDatasets, Dashboard, SummaryStats, Table,
};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Cached view of the active criteria
// ---------------------------------------------------------------------------

/// Everything the panels render for the active criteria, computed once per
/// criteria change rather than once per frame.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    pub filtered: Table,
    pub summary: Option<SummaryStats>,
    pub charts: ChartDatasets,
}

impl DashboardView {
    fn compute(dashboard: &Dashboard) -> Self {
        let filtered = dashboard.filtered_table();
        DashboardView {
            summary: Some(summarize(&filtered)),
            charts: ChartDatasets::from_table(&filtered),
            filtered,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset and active criteria (None until a file is loaded).
    pub dashboard: Option<Dashboard>,

    /// Cached results for the active criteria.
    pub view: DashboardView,

    /// Year slider positions; may be invalid until applied.
    pub year_from: i32,
    pub year_to: i32,

    /// Colours per sustainability rating, fixed for the loaded dataset.
    pub rating_colors: ColorMap,

    /// Colours per material type, fixed for the loaded dataset.
    pub material_colors: ColorMap,

    /// File the dataset came from.
    pub source: Option<PathBuf>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded dashboard and reset the widgets to its criteria.
    pub fn set_dashboard(&mut self, dashboard: Dashboard) {
        let table = dashboard.table();
        self.rating_colors = ColorMap::new(table.iter().map(|r| r.sustainability_rating.as_str()));
        self.material_colors = ColorMap::new(table.iter().map(|r| r.material_type.as_str()));

        self.dashboard = Some(dashboard);
        self.status_message = None;
        self.sync_widgets();
        self.refresh();
    }

    /// Load a dataset from disk, keeping the current one on failure.
    pub fn load(&mut self, path: &Path) {
        let loaded = load_file(path)
            .and_then(Dashboard::new)
            .with_context(|| format!("loading {}", path.display()));
        match loaded {
            Ok(dashboard) => {
                log::info!(
                    "Dataset ready: {} records, {} countries, years {:?}",
                    dashboard.table().len(),
                    dashboard.countries().len(),
                    dashboard.year_bounds()
                );
                self.source = Some(path.to_path_buf());
                self.set_dashboard(dashboard);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    pub fn select_country(&mut self, country: &str) {
        let Some(dashboard) = &mut self.dashboard else {
            return;
        };
        match dashboard.set_country(country) {
            Ok(()) => {
                self.status_message = None;
                self.refresh();
            }
            Err(e) => self.status_message = Some(format!("Error: {e}")),
        }
    }

    /// Apply the slider positions. An invalid range is reported and the
    /// sliders snap back to the last valid criteria.
    pub fn apply_year_range(&mut self) {
        let Some(dashboard) = &mut self.dashboard else {
            return;
        };
        let criteria = dashboard.criteria();
        if (criteria.year_min(), criteria.year_max()) == (self.year_from, self.year_to) {
            return;
        }
        match dashboard.set_year_range(self.year_from, self.year_to) {
            Ok(()) => {
                self.status_message = None;
                self.refresh();
            }
            Err(e) => {
                self.status_message = Some(format!("Error: {e}"));
                self.sync_widgets();
            }
        }
    }

    /// Write the current filtered table as CSV.
    pub fn export_to(&mut self, path: &Path) {
        match write_csv(&self.view.filtered, path) {
            Ok(()) => {
                self.status_message = Some(format!(
                    "Exported {} records to {}",
                    self.view.filtered.len(),
                    path.display()
                ));
            }
            Err(e) => {
                log::error!("Export failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    fn sync_widgets(&mut self) {
        if let Some(dashboard) = &self.dashboard {
            self.year_from = dashboard.criteria().year_min();
            self.year_to = dashboard.criteria().year_max();
        }
    }

    /// Recompute the cached view after a criteria change.
    fn refresh(&mut self) {
        if let Some(dashboard) = &self.dashboard {
            self.view = DashboardView::compute(dashboard);
            log::debug!(
                "Recomputed view: {} of {} records visible",
                self.view.filtered.len(),
                dashboard.table().len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fabric_dashboard::data::Record;

    fn record(country: &str, year: i32, brand: &str) -> Record {
        Record {
            country: country.to_string(),
            year,
            brand_name: brand.to_string(),
            sustainability_rating: "B".to_string(),
            carbon_footprint_mt: 2.0,
            water_usage_liters: 800.0,
            average_price_usd: 55.0,
            market_trend: "Growing".to_string(),
            waste_production_kg: Some(40.0),
            material_type: "Tencel".to_string(),
            certifications: "GOTS".to_string(),
        }
    }

    fn state() -> AppState {
        let mut state = AppState::default();
        let table = Table::new(vec![
            record("USA", 2021, "BrandA"),
            record("USA", 2023, "BrandB"),
            record("Kenya", 2022, "BrandC"),
        ]);
        state.set_dashboard(Dashboard::new(table).unwrap());
        state
    }

    #[test]
    fn new_dashboard_fills_the_view() {
        let state = state();
        assert_eq!((state.year_from, state.year_to), (2021, 2023));
        assert_eq!(state.view.filtered.len(), 2);
        assert_eq!(state.view.summary.as_ref().map(|s| s.brand_count), Some(2));
    }

    #[test]
    fn inverted_slider_range_snaps_back() {
        let mut state = state();
        state.year_from = 2023;
        state.year_to = 2022;
        state.apply_year_range();

        assert!(state.status_message.is_some());
        assert_eq!((state.year_from, state.year_to), (2021, 2023));
        assert_eq!(state.view.filtered.len(), 2);
    }

    #[test]
    fn country_change_refreshes_view() {
        let mut state = state();
        state.select_country("Kenya");
        assert_eq!(state.view.filtered.len(), 1);
        assert_eq!(state.view.charts.brand_impact[0].brand_name, "BrandC");

        state.select_country("Atlantis");
        assert!(state.status_message.is_some());
        assert_eq!(state.view.filtered.len(), 1);
    }

    #[test]
    fn failed_load_keeps_current_dataset() {
        let mut state = state();
        state.load(Path::new("/nonexistent/data.csv"));
        assert!(state.status_message.is_some());
        assert!(state.dashboard.is_some());
        assert_eq!(state.view.filtered.len(), 2);
    }
}
