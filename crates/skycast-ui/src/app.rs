//! Mutable UI state owned by the event loop.

use anyhow::Result;
use std::time::{Duration, Instant};

use skycast_core::Config;
use skycast_services::{FavoriteStore, StoreMessage, WeatherStore};
use skycast_weather::{City, GeocodingClient, WeatherClient};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::navigation::{Route, RouteStack};

/// Search screen state: the input line and the result selection.
#[derive(Debug, Default)]
pub struct SearchState {
    pub input: String,
    /// At least one search has been submitted (changes the empty state)
    pub has_searched: bool,
    /// `None` while typing; `Some` while moving through the result list
    pub selected: Option<usize>,
}

/// Application state: the store, the route stack and per-screen UI bits.
pub struct UiApp {
    pub config: Config,
    pub store: WeatherStore,
    pub rx: UnboundedReceiver<StoreMessage>,
    pub routes: RouteStack,
    pub search: SearchState,
    pub favorites: Vec<City>,
    pub favorites_selected: usize,
    pub last_refresh: Option<Instant>,
    /// Spinner frame counter, advanced while a fetch is in flight
    pub tick: usize,
    pub should_quit: bool,
}

impl UiApp {
    pub fn new(config: Config) -> Result<Self> {
        let favorites = FavoriteStore::new(config.favorites_db_path())?;
        let weather = WeatherClient::new(config.api.forecast_url.trim_end_matches('/'))?;
        let geocoding = GeocodingClient::new(config.api.geocoding_url.trim_end_matches('/'))?;
        let (tx, rx) = mpsc::unbounded_channel();
        let store = WeatherStore::new(weather, geocoding, favorites, Handle::current(), tx)?;

        let mut app = Self {
            config,
            store,
            rx,
            routes: RouteStack::new(),
            search: SearchState::default(),
            favorites: Vec::new(),
            favorites_selected: 0,
            last_refresh: None,
            tick: 0,
            should_quit: false,
        };
        app.reload_favorites();
        Ok(app)
    }

    /// Apply every completed fetch that has arrived since the last frame.
    pub fn drain_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            self.store.apply(msg);
        }
    }

    /// Open the detail screen for a city id, kicking off both fetches.
    pub fn open_city(&mut self, city_id: String) {
        self.store.fetch_weather(&city_id);
        self.store.fetch_forecast(&city_id);
        self.last_refresh = Some(Instant::now());
        self.routes.push(Route::CityDetail { city_id });
    }

    /// Refetch the city shown on the open detail screen.
    pub fn refresh_detail(&mut self) {
        if let Route::CityDetail { city_id } = self.routes.current() {
            let id = city_id.clone();
            self.store.fetch_weather(&id);
            self.store.fetch_forecast(&id);
            self.last_refresh = Some(Instant::now());
        }
    }

    /// Refetch when the configured refresh interval has elapsed with the
    /// detail screen open.
    pub fn maybe_auto_refresh(&mut self) {
        let minutes = self.config.weather.refresh_minutes;
        if minutes == 0 {
            return;
        }
        if !matches!(self.routes.current(), Route::CityDetail { .. }) {
            return;
        }
        let due = self
            .last_refresh
            .map(|at| at.elapsed() >= Duration::from_secs(u64::from(minutes) * 60))
            .unwrap_or(true);
        if due {
            tracing::debug!("Auto-refreshing detail screen");
            self.refresh_detail();
        }
    }

    /// Toggle favorite membership for the city on the detail screen.
    pub fn toggle_favorite(&mut self) {
        let Route::CityDetail { city_id } = self.routes.current() else {
            return;
        };
        let id = city_id.clone();

        let result = if self.store.is_favorite(&id) {
            self.store.remove_favorite(&id)
        } else {
            self.store.add_favorite(&id)
        };
        if let Err(e) = result {
            tracing::warn!("Favorite toggle failed: {}", e);
        }
        self.reload_favorites();
    }

    /// Remove the favorite selected on the favorites screen.
    pub fn remove_selected_favorite(&mut self) {
        let Some(city) = self.favorites.get(self.favorites_selected) else {
            return;
        };
        let id = city.id.clone();
        if let Err(e) = self.store.remove_favorite(&id) {
            tracing::warn!("Favorite removal failed: {}", e);
        }
        self.reload_favorites();
        if self.favorites_selected >= self.favorites.len() && self.favorites_selected > 0 {
            self.favorites_selected -= 1;
        }
    }

    /// Refresh the cached favorites list from storage.
    pub fn reload_favorites(&mut self) {
        match self.store.favorite_cities() {
            Ok(cities) => self.favorites = cities,
            Err(e) => tracing::warn!("Failed to load favorites: {}", e),
        }
    }

    pub fn switch_tab(&mut self) {
        let next = self.routes.current().next_tab();
        if next == Route::Favorites {
            self.reload_favorites();
            self.favorites_selected = 0;
        }
        self.routes.switch_root(next);
    }
}
