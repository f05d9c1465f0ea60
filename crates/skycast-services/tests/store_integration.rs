//! Integration tests for WeatherStore using wiremock.
//!
//! These cover the store contract: blank searches stay offline,
//! successful fetches clear errors, failures leave prior data in place,
//! favorites are an idempotent persisted set, and overlapping fetches
//! resolve last-write-wins in apply order.

use chrono::Utc;
use skycast_services::{FavoriteStore, StoreMessage, WeatherStore};
use skycast_weather::{CurrentWeather, GeocodingClient, WeatherClient, WeatherCondition};
use tempfile::TempDir;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn paris_search_body() -> serde_json::Value {
    serde_json::json!({
        "results": [{
            "id": 2988507,
            "name": "Paris",
            "country": "France",
            "country_code": "FR",
            "latitude": 48.85341,
            "longitude": 2.3488
        }]
    })
}

fn current_body(temp: f64, humidity: u8) -> serde_json::Value {
    serde_json::json!({
        "current": {
            "time": "2026-08-06T10:45",
            "temperature_2m": temp,
            "relative_humidity_2m": humidity,
            "wind_speed_10m": 12.4,
            "surface_pressure": 1013.2,
            "visibility": 24000.0,
            "weather_code": 1
        }
    })
}

fn forecast_body() -> serde_json::Value {
    serde_json::json!({
        "daily": {
            "time": ["2026-08-06", "2026-08-07", "2026-08-08"],
            "temperature_2m_max": [24.1, 22.0, 19.5],
            "temperature_2m_min": [14.3, 13.1, 11.0],
            "weather_code": [0, 61, 95]
        }
    })
}

/// Store wired against a mock server, with a temp dir keeping the
/// favorites database alive for the duration of the test.
fn make_store(server: &MockServer) -> (WeatherStore, UnboundedReceiver<StoreMessage>, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    let favorites = FavoriteStore::new(dir.path().join("favorites.db")).expect("favorites store");
    let weather = WeatherClient::new(server.uri()).expect("weather client");
    let geocoding = GeocodingClient::new(server.uri()).expect("geocoding client");
    let (tx, rx) = mpsc::unbounded_channel();

    let store = WeatherStore::new(weather, geocoding, favorites, Handle::current(), tx)
        .expect("weather store");
    (store, rx, dir)
}

/// Drive a search for "Paris" to completion so the store has a resolved
/// city in its index.
async fn search_paris(store: &mut WeatherStore, rx: &mut UnboundedReceiver<StoreMessage>) -> String {
    store.search_location("Paris");
    let msg = rx.recv().await.expect("search message");
    store.apply(msg);
    store.search_results()[0].id.clone()
}

#[tokio::test]
async fn test_blank_search_issues_no_request() {
    let mock_server = MockServer::start().await;

    // Verified on drop: the geocoding endpoint must never be hit.
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_search_body()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (mut store, mut rx, _dir) = make_store(&mock_server);

    store.search_location("");
    store.search_location("   ");

    assert!(store.search_results().is_empty());
    assert!(!store.is_loading());
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_search_replaces_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_search_body()))
        .mount(&mock_server)
        .await;

    let (mut store, mut rx, _dir) = make_store(&mock_server);

    store.search_location("Paris");
    assert!(store.is_loading());

    let msg = rx.recv().await.expect("search message");
    store.apply(msg);

    assert!(!store.is_loading());
    assert_eq!(store.search_results().len(), 1);
    assert_eq!(store.search_results()[0].name, "Paris");
    assert!(store.error().is_none());
}

#[tokio::test]
async fn test_successful_fetch_clears_prior_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_search_body()))
        .mount(&mock_server)
        .await;

    // First forecast call fails, every one after succeeds.
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body(21.7, 58)))
        .mount(&mock_server)
        .await;

    let (mut store, mut rx, _dir) = make_store(&mock_server);
    let id = search_paris(&mut store, &mut rx).await;

    store.fetch_weather(&id);
    let msg = rx.recv().await.expect("weather message");
    store.apply(msg);

    assert!(store.error().is_some());
    assert!(store.current_weather().is_none());

    store.fetch_weather(&id);
    let msg = rx.recv().await.expect("weather message");
    store.apply(msg);

    assert!(store.error().is_none(), "successful fetch must clear the error");
    let weather = store.current_weather().expect("weather after success");
    assert_eq!(weather.temperature, 21.7);
    assert_eq!(weather.humidity, 58);
    assert_eq!(store.current_city_id(), Some(id.as_str()));
}

#[tokio::test]
async fn test_failed_fetch_preserves_prior_weather() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_search_body()))
        .mount(&mock_server)
        .await;

    // First forecast call succeeds, the next one fails.
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body(21.7, 58)))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&mock_server)
        .await;

    let (mut store, mut rx, _dir) = make_store(&mock_server);
    let id = search_paris(&mut store, &mut rx).await;

    store.fetch_weather(&id);
    let msg = rx.recv().await.expect("weather message");
    store.apply(msg);
    assert!(store.error().is_none());

    store.fetch_weather(&id);
    let msg = rx.recv().await.expect("weather message");
    store.apply(msg);

    let weather = store.current_weather().expect("prior weather untouched");
    assert_eq!(weather.temperature, 21.7);
    let error = store.error().expect("error set");
    assert!(error.contains("503"));
}

#[tokio::test]
async fn test_favorites_are_an_idempotent_persisted_set() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_search_body()))
        .mount(&mock_server)
        .await;

    let (mut store, mut rx, _dir) = make_store(&mock_server);
    let id = search_paris(&mut store, &mut rx).await;

    store.add_favorite(&id).unwrap();
    store.add_favorite(&id).unwrap();
    assert_eq!(store.favorite_cities().unwrap().len(), 1);
    assert!(store.is_favorite(&id));

    // Removing an id that is not a favorite is a no-op.
    store.remove_favorite("999").unwrap();
    assert_eq!(store.favorite_cities().unwrap().len(), 1);

    store.remove_favorite(&id).unwrap();
    assert!(store.favorite_cities().unwrap().is_empty());
    assert!(!store.is_favorite(&id));
}

#[tokio::test]
async fn test_add_favorite_for_unknown_id_is_an_error() {
    let mock_server = MockServer::start().await;
    let (mut store, _rx, _dir) = make_store(&mock_server);

    let err = store.add_favorite("does-not-exist").unwrap_err();
    assert!(err.to_string().contains("does-not-exist"));
    assert!(store.favorite_cities().unwrap().is_empty());
}

#[tokio::test]
async fn test_favorites_survive_a_restart() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_search_body()))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("temp dir");
    let db_path = dir.path().join("favorites.db");

    let id = {
        let favorites = FavoriteStore::new(&db_path).unwrap();
        let weather = WeatherClient::new(mock_server.uri()).unwrap();
        let geocoding = GeocodingClient::new(mock_server.uri()).unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut store =
            WeatherStore::new(weather, geocoding, favorites, Handle::current(), tx).unwrap();

        let id = search_paris(&mut store, &mut rx).await;
        store.add_favorite(&id).unwrap();
        id
    };

    // A fresh store over the same database sees the favorite and can
    // resolve its id without searching again.
    let favorites = FavoriteStore::new(&db_path).unwrap();
    let weather = WeatherClient::new(mock_server.uri()).unwrap();
    let geocoding = GeocodingClient::new(mock_server.uri()).unwrap();
    let (tx, _rx) = mpsc::unbounded_channel();
    let store = WeatherStore::new(weather, geocoding, favorites, Handle::current(), tx).unwrap();

    let favorites = store.favorite_cities().unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].id, id);
    assert!(store.city(&id).is_some());
}

fn snapshot(city: &str, temp: f64) -> CurrentWeather {
    CurrentWeather {
        city: city.to_string(),
        temperature: temp,
        humidity: 50,
        wind_speed: 10.0,
        pressure: 1010.0,
        visibility: 20.0,
        condition: WeatherCondition::Clear,
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_overlapping_fetches_are_last_write_wins() {
    let mock_server = MockServer::start().await;
    let (mut store, _rx, _dir) = make_store(&mock_server);

    // Two overlapping fetches resolved out of request order: the store
    // applies messages in arrival order, no matter which fetch started
    // first.
    store.apply(StoreMessage::WeatherReady {
        city_id: "2".to_string(),
        result: Ok(snapshot("Lyon", 18.0)),
    });
    store.apply(StoreMessage::WeatherReady {
        city_id: "1".to_string(),
        result: Ok(snapshot("Paris", 21.7)),
    });

    let weather = store.current_weather().expect("weather");
    assert_eq!(weather.city, "Paris");
    assert_eq!(store.current_city_id(), Some("1"));
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_loading_drops_only_when_all_fetches_resolved() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_search_body()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body(21.7, 58)))
        .mount(&mock_server)
        .await;

    let (mut store, mut rx, _dir) = make_store(&mock_server);
    let id = search_paris(&mut store, &mut rx).await;

    store.fetch_weather(&id);
    store.fetch_weather(&id);
    assert!(store.is_loading());

    let msg = rx.recv().await.expect("first message");
    store.apply(msg);
    assert!(store.is_loading(), "one fetch still in flight");

    let msg = rx.recv().await.expect("second message");
    store.apply(msg);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_search_select_fetch_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_search_body()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("current",
            "temperature_2m,relative_humidity_2m,wind_speed_10m,surface_pressure,visibility,weather_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body(21.7, 58)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("daily", "temperature_2m_max,temperature_2m_min,weather_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&mock_server)
        .await;

    let (mut store, mut rx, _dir) = make_store(&mock_server);
    let id = search_paris(&mut store, &mut rx).await;

    // Selecting a result triggers both fetches, as the detail screen does.
    store.fetch_weather(&id);
    store.fetch_forecast(&id);

    let msg = rx.recv().await.expect("first message");
    store.apply(msg);
    let msg = rx.recv().await.expect("second message");
    store.apply(msg);

    let weather = store.current_weather().expect("current weather");
    assert_eq!(weather.city, "Paris");
    assert_eq!(weather.temperature, 21.7);
    assert_eq!(weather.humidity, 58);
    assert_eq!(store.forecast().len(), 3);
    assert_eq!(store.forecast()[0].high, 24.1);
    assert!(!store.is_loading());
    assert!(store.error().is_none());
}
