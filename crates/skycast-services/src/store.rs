//! The weather store: the single state object every screen reads.
//!
//! Fetches are fire-and-spawn. Each action spawns a task on the runtime
//! handle; the task performs the HTTP call and sends a [`StoreMessage`]
//! on the store's channel. The UI thread drains the channel and calls
//! [`WeatherStore::apply`], so all state mutation happens on one thread.
//!
//! There is no cancellation and no coordination between overlapping
//! fetches: whichever message is applied last wins.

use std::collections::HashMap;

use skycast_core::error::{AppError, StorageError};
use skycast_weather::{
    City, CurrentWeather, ForecastDay, GeocodingClient, WeatherClient, WeatherError,
};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

use crate::favorites::FavoriteStore;

/// Result of an async store action, delivered back to the UI thread.
///
/// Errors arrive already stringified; the store displays them verbatim.
#[derive(Debug)]
pub enum StoreMessage {
    WeatherReady {
        city_id: String,
        result: Result<CurrentWeather, String>,
    },
    ForecastReady {
        city_id: String,
        result: Result<Vec<ForecastDay>, String>,
    },
    SearchReady {
        query: String,
        result: Result<Vec<City>, String>,
    },
}

/// Client-side state for city search, current weather, forecast and
/// favorite locations.
pub struct WeatherStore {
    weather: WeatherClient,
    geocoding: GeocodingClient,
    favorites: FavoriteStore,
    runtime: Handle,
    tx: UnboundedSender<StoreMessage>,

    /// Every city this session has seen (search results + favorites),
    /// so ids resolve without a second geocoding round-trip.
    cities: HashMap<String, City>,

    current_weather: Option<CurrentWeather>,
    current_city_id: Option<String>,
    forecast: Vec<ForecastDay>,
    search_results: Vec<City>,
    in_flight: usize,
    error: Option<String>,
}

impl WeatherStore {
    /// Create a store; seeds the city index from persisted favorites.
    pub fn new(
        weather: WeatherClient,
        geocoding: GeocodingClient,
        favorites: FavoriteStore,
        runtime: Handle,
        tx: UnboundedSender<StoreMessage>,
    ) -> Result<Self, StorageError> {
        let mut cities = HashMap::new();
        for city in favorites.list()? {
            cities.insert(city.id.clone(), city);
        }

        Ok(Self {
            weather,
            geocoding,
            favorites,
            runtime,
            tx,
            cities,
            current_weather: None,
            current_city_id: None,
            forecast: Vec::new(),
            search_results: Vec::new(),
            in_flight: 0,
            error: None,
        })
    }

    pub fn current_weather(&self) -> Option<&CurrentWeather> {
        self.current_weather.as_ref()
    }

    /// Id of the city the current weather snapshot belongs to.
    pub fn current_city_id(&self) -> Option<&str> {
        self.current_city_id.as_deref()
    }

    pub fn forecast(&self) -> &[ForecastDay] {
        &self.forecast
    }

    pub fn search_results(&self) -> &[City] {
        &self.search_results
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True only while at least one fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Resolve a city id the store has seen this session.
    pub fn city(&self, id: &str) -> Option<&City> {
        self.cities.get(id)
    }

    pub fn favorite_cities(&self) -> Result<Vec<City>, StorageError> {
        self.favorites.list()
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        match self.favorites.contains(id) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("Favorite lookup failed: {}", e);
                false
            }
        }
    }

    /// Fetch current weather for a city id.
    ///
    /// The id resolves against the local index first; unknown ids (e.g.
    /// a favorite persisted by an older session on another machine) fall
    /// back to a geocoding lookup inside the task.
    pub fn fetch_weather(&mut self, id: &str) {
        self.in_flight += 1;

        let id = id.to_string();
        let local = self.cities.get(&id).cloned();
        let weather = self.weather.clone();
        let geocoding = self.geocoding.clone();
        let tx = self.tx.clone();

        self.runtime.spawn(async move {
            let result = fetch_current_by_id(&id, local, &geocoding, &weather)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(StoreMessage::WeatherReady { city_id: id, result });
        });
    }

    /// Fetch the 7-day forecast for a city id. Same contract as
    /// [`fetch_weather`](Self::fetch_weather), applied to the forecast.
    pub fn fetch_forecast(&mut self, id: &str) {
        self.in_flight += 1;

        let id = id.to_string();
        let local = self.cities.get(&id).cloned();
        let weather = self.weather.clone();
        let geocoding = self.geocoding.clone();
        let tx = self.tx.clone();

        self.runtime.spawn(async move {
            let result = fetch_forecast_by_id(&id, local, &geocoding, &weather)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(StoreMessage::ForecastReady { city_id: id, result });
        });
    }

    /// Search for cities matching a free-text query.
    ///
    /// A blank query clears the results without a network call and
    /// without touching the loading flag.
    pub fn search_location(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            self.search_results.clear();
            return;
        }

        self.in_flight += 1;

        let query = query.to_string();
        let geocoding = self.geocoding.clone();
        let tx = self.tx.clone();

        self.runtime.spawn(async move {
            let result = geocoding.search(&query).await.map_err(|e| e.to_string());
            let _ = tx.send(StoreMessage::SearchReady { query, result });
        });
    }

    /// Add a city id to the favorites set; persisted immediately.
    ///
    /// Adding an id that is already a favorite leaves the set unchanged.
    /// An id the store cannot resolve is an error (nothing to persist).
    pub fn add_favorite(&mut self, id: &str) -> Result<(), AppError> {
        let city = self.cities.get(id).cloned().ok_or_else(|| {
            AppError::Weather(skycast_core::WeatherError::LocationNotFound(id.to_string()))
        })?;

        let inserted = self.favorites.add(&city)?;
        if inserted {
            tracing::info!("Added favorite: {} ({})", city.name, city.id);
        }
        Ok(())
    }

    /// Remove a city id from the favorites set; persisted immediately.
    /// Removing a non-favorite id is a no-op.
    pub fn remove_favorite(&mut self, id: &str) -> Result<(), AppError> {
        let removed = self.favorites.remove(id)?;
        if removed {
            tracing::info!("Removed favorite: {}", id);
        }
        Ok(())
    }

    /// Apply a completed action to the store state.
    ///
    /// Messages are applied in arrival order; a later message overwrites
    /// whatever an earlier one wrote. Successful fetches clear the error,
    /// failed ones set it and leave prior data untouched.
    pub fn apply(&mut self, msg: StoreMessage) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match msg {
            StoreMessage::WeatherReady { city_id, result } => match result {
                Ok(weather) => {
                    self.current_weather = Some(weather);
                    self.current_city_id = Some(city_id);
                    self.error = None;
                }
                Err(e) => {
                    tracing::warn!("Weather fetch for {} failed: {}", city_id, e);
                    self.error = Some(e);
                }
            },
            StoreMessage::ForecastReady { city_id, result } => match result {
                Ok(forecast) => {
                    self.forecast = forecast;
                    self.error = None;
                }
                Err(e) => {
                    tracing::warn!("Forecast fetch for {} failed: {}", city_id, e);
                    self.error = Some(e);
                }
            },
            StoreMessage::SearchReady { query, result } => match result {
                Ok(cities) => {
                    for city in &cities {
                        self.cities.insert(city.id.clone(), city.clone());
                    }
                    self.search_results = cities;
                    self.error = None;
                }
                Err(e) => {
                    tracing::warn!("Search for '{}' failed: {}", query, e);
                    self.error = Some(e);
                }
            },
        }
    }
}

async fn fetch_current_by_id(
    id: &str,
    local: Option<City>,
    geocoding: &GeocodingClient,
    weather: &WeatherClient,
) -> Result<CurrentWeather, WeatherError> {
    let city = match local {
        Some(city) => city,
        None => geocoding.lookup(id).await?,
    };
    weather.fetch_current(&city).await
}

async fn fetch_forecast_by_id(
    id: &str,
    local: Option<City>,
    geocoding: &GeocodingClient,
    weather: &WeatherClient,
) -> Result<Vec<ForecastDay>, WeatherError> {
    let city = match local {
        Some(city) => city,
        None => geocoding.lookup(id).await?,
    };
    weather.fetch_forecast(&city).await
}
