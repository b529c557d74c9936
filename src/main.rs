#![cfg_attr(
    all(target_os = "windows", not(debug_assertions)),
    windows_subsystem = "windows"
)]
// On Windows hide console in release builds. Debug keeps console for diagnostics.

use anyhow::Result;
use eframe::NativeOptions;

mod analysis;
mod audio;
mod config;
mod core;
mod gui;
mod transcription;
mod utils;

use gui::AnalyzerApp;

const APP_NAME: &str = "WordsCounter";

fn init_logging() {
    use tracing_subscriber::EnvFilter;
    // Default filter suppresses noisy WGPU/eframe warnings (like surface timeouts)
    // Users can override fully via RUST_LOG if desired.
    let default_directives = "info,egui=error,epaint=error,eframe=error,egui_wgpu=error,wgpu=error,wgpu_core=error,wgpu_hal=error,naga=error";
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    tracing::info!("{} version {}", APP_NAME, env!("CARGO_PKG_VERSION"));

    let app_config = config::load_config();

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_app_id(APP_NAME) // Wayland app_id
            .with_title(APP_NAME)
            .with_inner_size(egui::vec2(720.0, 560.0))
            .with_resizable(true),
        renderer: eframe::Renderer::Wgpu,
        centered: true,
        ..Default::default()
    };
    eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |_cc| Ok(Box::new(AnalyzerApp::new(app_config)))),
    )
    .unwrap();

    Ok(())
}
