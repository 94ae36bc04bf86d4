use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::condition::{Combinator, Predicate};
use crate::export::ExportFormat;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – condition inputs
// ---------------------------------------------------------------------------

/// Render the left condition panel. Any edit recomputes the highlights.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Condition");
    ui.separator();

    let mut changed = false;

    ui.strong("Primary column");
    changed |= ui
        .add(egui::TextEdit::singleline(&mut state.form.primary).hint_text("e.g. A"))
        .changed();

    ui.strong("Columns to check");
    changed |= ui
        .add(egui::TextEdit::singleline(&mut state.form.secondary).hint_text("e.g. B, C"))
        .changed();

    ui.strong("Combine with");
    egui::ComboBox::from_id_salt("combinator")
        .selected_text(state.form.combinator.label())
        .show_ui(ui, |ui: &mut Ui| {
            for c in Combinator::VARIANTS {
                changed |= ui
                    .selectable_value(&mut state.form.combinator, c, c.label())
                    .changed();
            }
        });

    ui.strong("Operation");
    egui::ComboBox::from_id_salt("predicate")
        .selected_text(state.form.predicate.label())
        .show_ui(ui, |ui: &mut Ui| {
            for p in Predicate::VARIANTS {
                changed |= ui
                    .selectable_value(&mut state.form.predicate, p, p.label())
                    .changed();
            }
        });

    ui.strong("Rows");
    ui.horizontal(|ui: &mut Ui| {
        ui.label("from");
        changed |= ui
            .add(egui::TextEdit::singleline(&mut state.form.range_from).desired_width(48.0))
            .changed();
        ui.label("to");
        changed |= ui
            .add(egui::TextEdit::singleline(&mut state.form.range_to).desired_width(48.0))
            .changed();
    });

    if changed {
        state.refresh_highlights();
    }

    ui.add_space(8.0);
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Apply").clicked() {
            // A rejected apply already reports itself in the status line.
            let _ = state.apply();
        }
        if ui.button("Show all rows").clicked() {
            state.reset_view();
        }
    });

    ui.add_space(8.0);
    ui.label(
        RichText::new("Highlighting uses column letters; Apply uses header names.")
            .small()
            .weak(),
    );
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
            if ui.button("Export…").clicked() {
                state.export_dialog.open = true;
                ui.close_menu();
            }
        });

        ui.separator();

        let response = ui.add(
            egui::TextEdit::singleline(&mut state.source_input)
                .hint_text("Path or URL")
                .desired_width(260.0),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if (ui.button("Load").clicked() || submitted) && !state.source_input.trim().is_empty() {
            state.start_load(state.source_input.trim().to_string());
        }
        if state.loading() {
            ui.spinner();
        }

        ui.separator();

        let ds = state.store.dataset();
        if !ds.columns.is_empty() {
            ui.label(format!(
                "{} rows loaded, {} shown, {} highlighted",
                ds.len(),
                state.store.filtered_view().len(),
                state.highlights.count()
            ));
        }

        if let Some(msg) = &state.status_message {
            let color = if msg.starts_with("Error") || msg.starts_with("Please") {
                Color32::RED
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Export window
// ---------------------------------------------------------------------------

/// Modal asking for a file name and format, then a target folder.
pub fn export_window(ctx: &egui::Context, state: &mut AppState) {
    if !state.export_dialog.open {
        return;
    }

    let mut open = true;
    let mut confirmed = false;
    egui::Window::new("Download")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut open)
        .show(ctx, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                ui.label("File name");
                ui.add(
                    egui::TextEdit::singleline(&mut state.export_dialog.filename)
                        .hint_text(state.settings.default_filename.as_str()),
                );
            });
            ui.horizontal(|ui: &mut Ui| {
                ui.label("Format");
                egui::ComboBox::from_id_salt("export_format")
                    .selected_text(state.export_dialog.format.label())
                    .show_ui(ui, |ui: &mut Ui| {
                        for f in ExportFormat::VARIANTS {
                            ui.selectable_value(&mut state.export_dialog.format, f, f.label());
                        }
                    });
            });
            ui.separator();
            if ui.button("Download").clicked() {
                confirmed = true;
            }
        });

    if confirmed {
        if let Some(dir) = rfd::FileDialog::new()
            .set_title("Choose export folder")
            .pick_folder()
        {
            // Errors are logged and shown in the status line.
            let _ = state.export_to(&dir);
        }
        open = false;
    }
    state.export_dialog.open = open;
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open spreadsheet")
        .add_filter(
            "Supported files",
            &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv", "json", "parquet", "pq"],
        )
        .add_filter("Spreadsheets", &["xlsx", "xlsm", "xlsb", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        let reference = path.display().to_string();
        state.source_input = reference.clone();
        state.load_now(&reference);
    }
}
