//! Forward geocoding: resolve free-text city queries and persisted city
//! ids into coordinates. Uses the Open-Meteo geocoding API - free, no
//! API key required.

use crate::types::{City, WeatherError};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Production endpoint; tests point at a local mock server.
pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com";

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "Skycast/0.1.0 (terminal weather client)";
const MAX_RESULTS: u32 = 10;

#[derive(Debug, Deserialize)]
struct OmSearchResponse {
    /// Absent entirely when the query has no matches
    results: Option<Vec<OmPlace>>,
}

#[derive(Debug, Deserialize)]
struct OmPlace {
    id: i64,
    name: String,
    country: Option<String>,
    country_code: Option<String>,
    latitude: f64,
    longitude: f64,
}

impl OmPlace {
    fn into_city(self) -> City {
        let country = self
            .country
            .or(self.country_code)
            .unwrap_or_default();

        City {
            id: self.id.to_string(),
            name: self.name,
            country,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Client for the geocoding API.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    http: Client,
    base_url: String,
}

impl GeocodingClient {
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

    /// Search cities matching a free-text query.
    ///
    /// An empty result list is not an error; the caller decides how to
    /// present "no matches".
    pub async fn search(&self, query: &str) -> Result<Vec<City>, WeatherError> {
        let url = format!("{}/v1/search", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("name", query),
                ("count", &MAX_RESULTS.to_string()),
                ("language", "en"),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Api {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: OmSearchResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Parse(format!("geocoding search response: {e}")))?;

        let cities: Vec<City> = parsed
            .results
            .unwrap_or_default()
            .into_iter()
            .map(OmPlace::into_city)
            .collect();

        tracing::debug!("Geocoding search '{}' returned {} cities", query, cities.len());
        Ok(cities)
    }

    /// Resolve a city id (e.g. a persisted favorite) back to a `City`.
    pub async fn lookup(&self, id: &str) -> Result<City, WeatherError> {
        let url = format!("{}/v1/get", self.base_url);

        let res = self.http.get(&url).query(&[("id", id)]).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(WeatherError::LocationNotFound(id.to_string()));
        }

        if !status.is_success() {
            return Err(WeatherError::Api {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: OmPlace = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Parse(format!("geocoding lookup response: {e}")))?;

        Ok(parsed.into_city())
    }
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
    fn test_place_without_country_falls_back_to_code() {
        let place = OmPlace {
            id: 42,
            name: "Somewhere".into(),
            country: None,
            country_code: Some("FR".into()),
            latitude: 1.0,
            longitude: 2.0,
        };
        let city = place.into_city();
        assert_eq!(city.country, "FR");
        assert_eq!(city.id, "42");
    }

    #[test]
    fn test_truncate_body_caps_length() {
        let long = "x".repeat(500);
        let out = truncate_body(&long);
        assert!(out.len() <= 203);
        assert!(out.ends_with("..."));
    }
}
