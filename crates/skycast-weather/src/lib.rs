//! Weather and geocoding client for Skycast
//!
//! Provides city search (geocoding), current conditions and daily
//! forecasts via the Open-Meteo APIs.

pub mod client;
pub mod geocode;
pub mod types;

pub use client::WeatherClient;
pub use geocode::GeocodingClient;
pub use types::*;
