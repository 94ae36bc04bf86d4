use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::text_on;
use crate::data::reference::column_letters;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Data grid (central panel)
// ---------------------------------------------------------------------------

/// Render the current view as a table, painting highlighted rows.
pub fn data_grid(ui: &mut Ui, state: &AppState) {
    if state.store.dataset().columns.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a spreadsheet to begin  (File → Open…)");
        });
        return;
    }

    let columns = state.store.view_columns();
    let rows = state.store.filtered_view();
    if rows.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No data available");
        });
        return;
    }

    let highlight = state.highlight_color;
    let highlight_text = text_on(highlight);
    let marker = state.settings.null_marker.as_str();
    let row_height = state.settings.row_height;

    let mut table = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(36.0));
    for _ in columns {
        table = table.column(Column::initial(120.0).at_least(40.0).clip(true));
    }

    table
        .header(row_height + 8.0, |mut header| {
            header.col(|ui| {
                if state.highlights.header {
                    paint(ui, highlight);
                }
                ui.label("#");
            });
            for (i, name) in columns.iter().enumerate() {
                header.col(|ui| {
                    if state.highlights.header {
                        paint(ui, highlight);
                    }
                    ui.vertical(|ui| {
                        ui.label(RichText::new(column_letters(i)).small().weak());
                        ui.strong(name);
                    });
                });
            }
        })
        .body(|body| {
            body.rows(row_height, rows.len(), |mut row| {
                let index = row.index();
                let lit = state.highlights.is_highlighted(index);
                let record = &rows[index];

                row.col(|ui| {
                    if lit {
                        paint(ui, highlight);
                    }
                    ui.label(RichText::new((index + 1).to_string()).weak());
                });
                for name in columns {
                    row.col(|ui| {
                        let text = record
                            .get(name)
                            .map(|v| v.display_or(marker).into_owned())
                            .unwrap_or_else(|| marker.to_string());
                        let mut text = RichText::new(text);
                        if lit {
                            paint(ui, highlight);
                            text = text.color(highlight_text);
                        }
                        ui.add(egui::Label::new(text).truncate());
                    });
                }
            });
        });
}

fn paint(ui: &Ui, color: egui::Color32) {
    ui.painter().rect_filled(ui.max_rect(), 0.0, color);
}
