use eframe::egui;

use crate::state::AppState;
use crate::ui::{grid, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SieveApp {
    pub state: AppState,
}

impl SieveApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for SieveApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Background loads ----
        if self.state.poll_loads() {
            ctx.request_repaint();
        }
        if self.state.loading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: condition ----
        egui::SidePanel::left("condition_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: grid ----
        egui::CentralPanel::default().show(ctx, |ui| {
            grid::data_grid(ui, &self.state);
        });

        // ---- Export modal ----
        panels::export_window(ctx, &mut self.state);
    }
}
