#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;

use eframe_canvas_editor::CanvasApp;
use eframe_canvas_editor::config::{CONFIG_PATH_ENV, EditorConfig};

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    let config = match EditorConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            log::error!("❌ {}; falling back to defaults", err);
            let mut config = EditorConfig::default();
            config.apply_overrides(|key| std::env::var(key).ok());
            config
        }
    };
    log::info!("🚀 Starting canvas editor against {}", config.api_base_url);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.canvas_width + 520.0, config.canvas_height + 60.0])
            .with_min_inner_size([600.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Canvas Editor",
        native_options,
        Box::new(|cc| Ok(Box::new(CanvasApp::new(cc, config)?))),
    )
}
