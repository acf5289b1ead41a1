// Entry point stays minimal: window config and app startup only.
// All logic lives in the app module (src/app.rs).

use eframe::egui;

mod app;
mod filters;
mod logger;
mod ui_constants;
mod views;

fn main() -> eframe::Result<()> {
    // Initialize in-app GUI logger (also mirrors to stderr)
    logger::init();
    app::config::load_config_from_disk();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 640.0])
            .with_resizable(true),
        ..Default::default()
    };

    let res = eframe::run_native(
        "Traffic Dashboard",
        native_options,
        Box::new(|_cc| Box::new(app::DashApp::default())),
    );
    if let Err(ref e) = res {
        log::error!("eframe::run_native failed: {e}");
    }
    res
}
