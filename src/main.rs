mod app;
mod auth;
mod color;
mod config;
mod data;
mod format;
mod state;
mod ui;

use app::DashboardApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration, using defaults: {e:#}");
            AppConfig::default()
        }
    };
    if config.app_password.is_none() {
        log::warn!("APP_PASSWORD is not set; the dashboard cannot be unlocked");
    }
    log::info!("Data folder: {}", config.data_dir.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sales Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(config)))),
    )
}
