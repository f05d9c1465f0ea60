//! Forecast API client: current conditions and the 7-day daily forecast.

use crate::types::{City, CurrentWeather, ForecastDay, WeatherCondition, WeatherError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Production endpoint; tests point at a local mock server.
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com";

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "Skycast/0.1.0 (terminal weather client)";
const FORECAST_DAYS: u32 = 7;

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,wind_speed_10m,surface_pressure,visibility,weather_code";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,weather_code";

#[derive(Debug, Deserialize)]
struct OmCurrent {
    time: String,
    temperature_2m: f64,
    relative_humidity_2m: f64,
    wind_speed_10m: f64,
    surface_pressure: f64,
    /// Meters; converted to km for display
    visibility: f64,
    weather_code: i32,
}

#[derive(Debug, Deserialize)]
struct OmCurrentResponse {
    current: OmCurrent,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<String>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    weather_code: Vec<i32>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    daily: OmDaily,
}

/// Client for the forecast API.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: Client,
    base_url: String,
}

impl WeatherClient {
    /// Create a client against the given base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Fetch the current conditions snapshot for a city.
    pub async fn fetch_current(&self, city: &City) -> Result<CurrentWeather, WeatherError> {
        let body = self
            .get_forecast_endpoint(city, &[("current", CURRENT_FIELDS)])
            .await?;

        let parsed: OmCurrentResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Parse(format!("current weather response: {e}")))?;

        let current = parsed.current;
        let updated_at = parse_iso_minute(&current.time).unwrap_or_else(Utc::now);

        Ok(CurrentWeather {
            city: city.name.clone(),
            temperature: current.temperature_2m,
            humidity: current.relative_humidity_2m.round().clamp(0.0, 100.0) as u8,
            wind_speed: current.wind_speed_10m,
            pressure: current.surface_pressure,
            visibility: current.visibility / 1000.0,
            condition: WeatherCondition::from_wmo_code(current.weather_code),
            updated_at,
        })
    }

    /// Fetch the 7-day daily forecast for a city.
    pub async fn fetch_forecast(&self, city: &City) -> Result<Vec<ForecastDay>, WeatherError> {
        let body = self
            .get_forecast_endpoint(
                city,
                &[
                    ("daily", DAILY_FIELDS),
                    ("forecast_days", &FORECAST_DAYS.to_string()),
                ],
            )
            .await?;

        let parsed: OmForecastResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Parse(format!("forecast response: {e}")))?;

        let daily = parsed.daily;
        let days = daily.time.len();
        if daily.temperature_2m_max.len() != days
            || daily.temperature_2m_min.len() != days
            || daily.weather_code.len() != days
        {
            return Err(WeatherError::Parse(
                "forecast response has mismatched daily array lengths".to_string(),
            ));
        }

        let mut forecast = Vec::with_capacity(days);
        for i in 0..days {
            let date = NaiveDate::parse_from_str(&daily.time[i], "%Y-%m-%d")
                .map_err(|e| WeatherError::Parse(format!("forecast date '{}': {e}", daily.time[i])))?;

            forecast.push(ForecastDay {
                date,
                high: daily.temperature_2m_max[i],
                low: daily.temperature_2m_min[i],
                condition: WeatherCondition::from_wmo_code(daily.weather_code[i]),
            });
        }

        Ok(forecast)
    }

    /// Shared request path for `/v1/forecast`: coordinates + UTC timestamps,
    /// with the caller supplying the field selection.
    async fn get_forecast_endpoint(
        &self,
        city: &City,
        extra: &[(&str, &str)],
    ) -> Result<String, WeatherError> {
        let url = format!("{}/v1/forecast", self.base_url);

        let lat = city.latitude.to_string();
        let lon = city.longitude.to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("latitude", lat.as_str()),
            ("longitude", lon.as_str()),
            ("timezone", "UTC"),
        ];
        params.extend_from_slice(extra);

        let res = self.http.get(&url).query(&params).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Api {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

/// Open-Meteo returns minute-resolution ISO timestamps ("2026-08-06T10:45").
fn parse_iso_minute(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .ok()
        .map(|ndt| ndt.and_utc())
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_minute() {
        let ts = parse_iso_minute("2026-08-06T10:45").expect("parse");
        assert_eq!(ts.to_rfc3339(), "2026-08-06T10:45:00+00:00");
    }

    #[test]
    fn test_parse_iso_minute_rejects_garbage() {
        assert!(parse_iso_minute("not-a-time").is_none());
    }
}
