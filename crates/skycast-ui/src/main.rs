//! Binary crate for the `skycast` terminal weather app.
//!
//! This crate focuses on:
//! - Screens (search, city detail, favorites, settings)
//! - The navigation shell carrying the city id between screens
//! - The event loop bridging key input and async fetch results

use anyhow::Result;

mod app;
mod event_loop;
mod navigation;
mod render;
mod screens;

#[tokio::main]
async fn main() -> Result<()> {
    let (config, _validation) = skycast_core::Config::load_validated()?;

    std::fs::create_dir_all(&config.config_dir)?;
    // The TUI owns stdout; logs go to a file instead.
    skycast_core::init_logging_to(&config.log_path())?;

    tracing::info!("Skycast started");

    let app = app::UiApp::new(config)?;
    event_loop::run(app).await
}
