//! Textpad - a minimal desktop text editor
//!
//! Plain UTF-8 files, whole-buffer bold/italic/size and a light or dark
//! theme.

mod app;
mod commands;
mod dialogs;
mod document;
mod editor;
mod session;
mod shell;
mod surface;

use app::TextEditorApp;
use eframe::NativeOptions;
use padcore::EditorConfig;

const APP_NAME: &str = "textpad";

fn main() -> eframe::Result<()> {
    let config_path = EditorConfig::path(APP_NAME);
    let (config, config_error) = match EditorConfig::load_optional(&config_path) {
        Ok(config) => (config.unwrap_or_default(), None),
        Err(e) => (EditorConfig::default(), Some(e)),
    };

    padcore::logging::init(config.log_filter.as_deref());
    if let Some(e) = config_error {
        log::warn!("ignoring {}: {}", config_path.display(), e);
    }

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_title(format!("{} - {}", session::UNTITLED, session::APP_TITLE)),
        ..Default::default()
    };

    log::info!("starting {}", APP_NAME);
    eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |cc| Box::new(TextEditorApp::new(cc, &config))),
    )
}
