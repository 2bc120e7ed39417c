use eframe::egui;

use crate::state::AppState;
use crate::ui::{heatmap, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CorrMapApp {
    pub state: AppState,
}

impl CorrMapApp {
    pub fn new(state: AppState) -> Self {
        CorrMapApp { state }
    }
}

impl eframe::App for CorrMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: status bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filter builder ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: filtered rows ----
        egui::TopBottomPanel::bottom("preview_panel")
            .resizable(true)
            .default_height(150.0)
            .show(ctx, |ui| {
                panels::preview_table(ui, &self.state);
            });

        // ---- Central panel: heatmap ----
        egui::CentralPanel::default().show(ctx, |ui| {
            heatmap::correlation_heatmap(ui, &mut self.state);
        });
    }
}
