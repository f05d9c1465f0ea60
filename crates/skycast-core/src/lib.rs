pub mod config;
pub mod error;

pub use config::{ApiConfig, Config, TemperatureUnit, WeatherConfig};
pub use error::{AppError, ConfigError, NetworkError, StorageError, WeatherError};

use anyhow::Result;
use std::path::Path;

/// Initialize tracing with a log file as the writer.
///
/// The TUI owns the terminal (alternate screen, raw mode), so log lines
/// must not reach stdout/stderr while it runs.
pub fn init_logging_to(path: &Path) -> Result<()> {
    let file = std::fs::OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();

    tracing::info!("Skycast core initialized, logging to {}", path.display());
    Ok(())
}
