mod api;
mod app;
mod config;
mod io;
mod state;
mod style;
mod view;

use crate::api::ApiClient;
use crate::app::Stowage;
use crate::config::Config;
use eframe::egui;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stowage=info")),
        )
        .init();

    if let Err(err) = Config::create_default() {
        tracing::warn!(error = %err, "Could not write default config file");
    }
    let config = Config::load();
    tracing::info!(base_url = %config.server.base_url, "Starting client");

    let client = match ApiClient::new(&config.server.base_url) {
        Ok(client) => client,
        Err(err) => {
            tracing::error!(error = %err, "Failed to initialise HTTP client");
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_title("Stowage"),
        ..Default::default()
    };

    eframe::run_native(
        "Stowage",
        options,
        Box::new(move |cc| Ok(Box::new(Stowage::new(cc, config, client)))),
    )
}
