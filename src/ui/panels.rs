use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use fabric_dashboard::data::{SummaryStats, DEFAULT_EXPORT_FILE_NAME};

use crate::state::AppState;
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets and insights
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Data");
    ui.separator();

    // Copy what we need so we can mutate state below.
    let Some((countries, current, (lower, upper))) = state.dashboard.as_ref().map(|d| {
        let countries: Vec<String> = d.countries().iter().map(str::to_string).collect();
        (countries, d.criteria().country().to_string(), d.year_bounds())
    }) else {
        ui.label("No dataset loaded.");
        return;
    };

    // ---- Country selector ----
    ui.strong("Select a Country");
    let mut chosen = None;
    egui::ComboBox::from_id_salt("country")
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for country in &countries {
                if ui.selectable_label(current == *country, country).clicked() {
                    chosen = Some(country.clone());
                }
            }
        });
    if let Some(country) = chosen {
        state.select_country(&country);
    }
    ui.add_space(8.0);

    // ---- Year range ----
    ui.strong("Select Year Range");
    let from = ui.add(egui::Slider::new(&mut state.year_from, lower..=upper).text("From"));
    let to = ui.add(egui::Slider::new(&mut state.year_to, lower..=upper).text("To"));
    if from.changed() || to.changed() {
        state.apply_year_range();
    }

    ui.separator();
    ui.heading("Insights");
    match &state.view.summary {
        Some(stats) if !state.view.filtered.is_empty() => insights(ui, stats),
        _ => {
            ui.label("No data available for selected filters.");
        }
    }
}

fn insights(ui: &mut Ui, stats: &SummaryStats) {
    ui.label(RichText::new(format!("Total Brands: {}", stats.brand_count)).strong());
    ui.label(format!("Avg Price (USD): {}", format_mean(stats.avg_price, "$")));
    ui.label(format!(
        "Avg Carbon Footprint (MT): {}",
        format_mean(stats.avg_carbon_footprint, "")
    ));
}

/// Two-decimal rendering of a mean; an absent mean shows as "n/a".
fn format_mean(value: Option<f64>, prefix: &str) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{prefix}{v:.2}"))
}

// ---------------------------------------------------------------------------
// Central panel – overview table and charts
// ---------------------------------------------------------------------------

/// Render the main dashboard body.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(dashboard) = &state.dashboard else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to explore it  (File → Open…)");
        });
        return;
    };
    let criteria = dashboard.criteria();
    let overview = format!(
        "Data Overview for {} ({} - {})",
        criteria.country(),
        criteria.year_min(),
        criteria.year_max()
    );

    let mut export_clicked = false;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Sustainable Fashion Trends Dashboard");
            ui.separator();

            ui.heading(overview);
            table::records_table(ui, &state.view.filtered);
            ui.add_space(12.0);

            ui.heading("Distribution of Sustainability Ratings");
            plot::rating_donut(ui, &state.view.charts.rating_counts, &state.rating_colors);
            ui.add_space(12.0);

            ui.heading("Environmental Impact by Brand");
            plot::impact_bars(ui, &state.view.charts.brand_impact);
            ui.add_space(12.0);

            ui.heading("Market Trend Analysis");
            plot::market_scatter(ui, &state.view.charts.scatter, &state.material_colors);
            ui.add_space(12.0);

            ui.heading("Download Filtered Data");
            export_clicked = ui.button("Download CSV").clicked();
        });

    if export_clicked {
        export_file_dialog(state);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.dashboard.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export CSV…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dashboard {
            ui.label(format!(
                "{} records loaded, {} visible",
                ds.table().len(),
                state.view.filtered.len()
            ));
        }
        if let Some(name) = state.source.as_ref().and_then(|p| p.file_name()) {
            ui.label(RichText::new(name.to_string_lossy()).weak());
        }

        ui.separator();

        if let Some(msg) = &state.status_message {
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::LIGHT_GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sustainability dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered data")
        .set_file_name(DEFAULT_EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_to(&path);
    }
}
