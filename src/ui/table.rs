use eframe::egui::{self, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use fabric_dashboard::data::{Column, Table};

// ---------------------------------------------------------------------------
// Filtered records table
// ---------------------------------------------------------------------------

/// Render the filtered records, one row per record in table order.
pub fn records_table(ui: &mut Ui, table: &Table) {
    if table.is_empty() {
        ui.label("No records match the selected filters.");
        return;
    }

    ScrollArea::horizontal()
        .id_salt("records_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .columns(TableColumn::auto().at_least(60.0), Column::ALL.len())
                .min_scrolled_height(0.0)
                .max_scroll_height(260.0)
                .header(22.0, |mut header| {
                    for column in Column::ALL {
                        header.col(|ui: &mut Ui| {
                            ui.strong(column.name());
                        });
                    }
                })
                .body(|body| {
                    body.rows(20.0, table.len(), |mut row| {
                        let record = &table.records()[row.index()];
                        for column in Column::ALL {
                            row.col(|ui: &mut Ui| {
                                ui.label(record.field_text(column));
                            });
                        }
                    });
                });
        });
}
