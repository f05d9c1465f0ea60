use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Weather condition categories mapped from WMO codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Clear,
    PartlyCloudy,
    Cloudy,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    Snow,
    Sleet,
    Thunderstorm,
}

impl WeatherCondition {
    /// Convert WMO weather code to WeatherCondition
    /// See: https://open-meteo.com/en/docs#weathervariables
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            1..=2 => Self::PartlyCloudy,
            3 => Self::Cloudy,
            45 | 48 => Self::Fog,
            51 | 53 | 55 => Self::Drizzle,
            56 | 57 => Self::Sleet, // Freezing drizzle
            61 | 63 | 80 => Self::Rain,
            65 | 81 | 82 => Self::HeavyRain,
            66 | 67 => Self::Sleet, // Freezing rain
            71 | 73 | 75 | 77 | 85 | 86 => Self::Snow,
            95 | 96 | 99 => Self::Thunderstorm,
            _ => Self::Clear, // Unknown codes default to clear
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy Rain",
            Self::Snow => "Snow",
            Self::Sleet => "Sleet",
            Self::Thunderstorm => "Thunderstorm",
        }
    }

    /// Single-character glyph used by the terminal UI
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Clear => "☀",
            Self::PartlyCloudy => "⛅",
            Self::Cloudy => "☁",
            Self::Fog => "≡",
            Self::Drizzle => "﹕",
            Self::Rain => "☂",
            Self::HeavyRain => "☔",
            Self::Snow => "❄",
            Self::Sleet => "❆",
            Self::Thunderstorm => "⚡",
        }
    }
}

/// A searchable location, as returned by the geocoding API.
///
/// The `id` string is the contract carried between screens and the key
/// under which favorites persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions snapshot for one city.
///
/// Replaced wholesale on each fetch; there are no merge semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Display name of the city the snapshot belongs to
    pub city: String,
    /// Air temperature, °C
    pub temperature: f64,
    /// Relative humidity, percent
    pub humidity: u8,
    /// Wind speed, km/h
    pub wind_speed: f64,
    /// Surface pressure, hPa
    pub pressure: f64,
    /// Visibility, km
    pub visibility: f64,
    pub condition: WeatherCondition,
    pub updated_at: DateTime<Utc>,
}

/// One day of the forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    /// Daily maximum, °C
    pub high: f64,
    /// Daily minimum, °C
    pub low: f64,
    pub condition: WeatherCondition,
}

/// Weather client errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Location not found: {0}")]
    LocationNotFound(String),
}
