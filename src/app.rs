use eframe::egui;

use crate::config::AppConfig;
use crate::state::{AppState, RECHECK_INTERVAL};
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Pick up new or changed CSVs without user interaction.
        self.state.sync_dataset(false);
        if self.state.unlocked {
            ctx.request_repaint_after(RECHECK_INTERVAL);
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: gate / filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::central_panel(ui, &self.state);
        });
    }
}
