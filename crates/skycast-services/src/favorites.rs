//! SQLite-backed favorites persistence.
//!
//! Favorites are a set of cities keyed by the geocoding place id. Rows
//! keep the full city so favorites resolve without a network round-trip
//! after a restart. Membership is the only contract; `list()` happens to
//! return insertion order.

use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use skycast_core::error::{RusqliteErrorExt, StorageError};
use skycast_weather::City;
use std::path::Path;

/// SQLite-backed favorite city set.
pub struct FavoriteStore {
    conn: Mutex<Connection>,
}

impl FavoriteStore {
    /// Open (or create) the favorites database at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path)
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory favorites store (for testing).
    #[cfg(test)]
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StorageError> {
        self.conn
            .lock()
            .execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS favorites (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    country TEXT NOT NULL,
                    latitude REAL NOT NULL,
                    longitude REAL NOT NULL,
                    added_at TEXT NOT NULL
                );
                "#,
            )
            .map_err(|e| e.into_storage_error())
    }

    fn row_to_city(row: &rusqlite::Row) -> rusqlite::Result<City> {
        Ok(City {
            id: row.get(0)?,
            name: row.get(1)?,
            country: row.get(2)?,
            latitude: row.get(3)?,
            longitude: row.get(4)?,
        })
    }

    /// Add a city to the favorites set.
    ///
    /// Idempotent: adding an existing favorite leaves the set unchanged.
    /// Returns true when a row was actually inserted.
    pub fn add(&self, city: &City) -> Result<bool, StorageError> {
        let inserted = self
            .conn
            .lock()
            .execute(
                "INSERT OR IGNORE INTO favorites (id, name, country, latitude, longitude, added_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    city.id,
                    city.name,
                    city.country,
                    city.latitude,
                    city.longitude,
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(|e| e.into_storage_error())?;
        Ok(inserted > 0)
    }

    /// Remove a city id from the favorites set.
    ///
    /// Removing an id that is not a favorite is a no-op.
    /// Returns true when a row was actually deleted.
    pub fn remove(&self, id: &str) -> Result<bool, StorageError> {
        let deleted = self
            .conn
            .lock()
            .execute("DELETE FROM favorites WHERE id = ?1", params![id])
            .map_err(|e| e.into_storage_error())?;
        Ok(deleted > 0)
    }

    /// All favorite cities, in insertion order.
    pub fn list(&self) -> Result<Vec<City>, StorageError> {
        let conn = self.conn.lock();
        let mut stmt = conn
            .prepare(
                "SELECT id, name, country, latitude, longitude
                 FROM favorites
                 ORDER BY added_at, rowid",
            )
            .map_err(|e| e.into_storage_error())?;

        let rows = stmt
            .query_map([], Self::row_to_city)
            .map_err(|e| e.into_storage_error())?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| e.into_storage_error())
    }

    /// Whether the given city id is a favorite.
    pub fn contains(&self, id: &str) -> Result<bool, StorageError> {
        let count: i64 = self
            .conn
            .lock()
            .query_row(
                "SELECT COUNT(*) FROM favorites WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .map_err(|e| e.into_storage_error())?;
        Ok(count > 0)
    }

    /// Number of favorites.
    pub fn count(&self) -> Result<usize, StorageError> {
        let count: i64 = self
            .conn
            .lock()
            .query_row("SELECT COUNT(*) FROM favorites", [], |row| row.get(0))
            .map_err(|e| e.into_storage_error())?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(id: &str, name: &str) -> City {
        City {
            id: id.to_string(),
            name: name.to_string(),
            country: "France".to_string(),
            latitude: 48.85,
            longitude: 2.35,
        }
    }

    #[test]
    fn test_add_and_list() {
        let store = FavoriteStore::in_memory().unwrap();
        assert!(store.add(&city("1", "Paris")).unwrap());
        assert!(store.add(&city("2", "Lyon")).unwrap());

        let cities = store.list().unwrap();
        assert_eq!(cities.len(), 2);
        assert_eq!(cities[0].name, "Paris");
        assert_eq!(cities[1].name, "Lyon");
    }

    #[test]
    fn test_add_is_idempotent() {
        let store = FavoriteStore::in_memory().unwrap();
        assert!(store.add(&city("1", "Paris")).unwrap());
        assert!(!store.add(&city("1", "Paris")).unwrap());
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let store = FavoriteStore::in_memory().unwrap();
        store.add(&city("1", "Paris")).unwrap();

        assert!(!store.remove("999").unwrap());
        assert_eq!(store.count().unwrap(), 1);

        assert!(store.remove("1").unwrap());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_contains() {
        let store = FavoriteStore::in_memory().unwrap();
        store.add(&city("1", "Paris")).unwrap();
        assert!(store.contains("1").unwrap());
        assert!(!store.contains("2").unwrap());
    }
}
