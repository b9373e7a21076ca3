#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod helpers;
mod modules;
mod theme;

use vidsqueeze_core::config::CaptureConfig;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> eframe::Result {
    helpers::log::init_logging();

    if let Err(e) = vidsqueeze_media::init() {
        tracing::error!("[app] {e:#}");
    }

    let (config, config_error) = match CaptureConfig::from_env() {
        Ok(cfg) => (cfg, None),
        Err(e)  => {
            tracing::warn!("[app] {e}; using defaults");
            (CaptureConfig::default(), Some(e.to_string()))
        }
    };
    tracing::info!("[app] capture config: {config:?}");

    let native_options = eframe::NativeOptions {
        centered: true,
        viewport: egui::ViewportBuilder::default()
            .with_title("VidSqueeze")
            .with_inner_size([520.0, 560.0])
            .with_min_inner_size([420.0, 440.0])
            .with_resizable(true)
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "VidSqueeze",
        native_options,
        Box::new(move |cc| Ok(Box::new(app::VidSqueezeApp::new(cc, config, config_error)))),
    )
}
