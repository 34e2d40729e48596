//! Durable key-value storage and the typed repositories layered on it
//!
//! Two keys are in use: the serialized permanent track list and the custom
//! routing profile list. Both hold JSON encoded arrays; an absent key means
//! an empty collection, not an error.
use crate::db::{create_database, open_db_connection};
use crate::track::TrackData;
use crate::Error;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

/// Storage key holding the serialized permanent track records
pub const PERMANENT_TRACKS_KEY: &str = "ibex-permanent-tracks";

/// Storage key holding the custom routing profiles
pub const ROUTING_PROFILES_KEY: &str = "routing_profiles";

/// String key-value storage with durable or in-memory backing
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error>;

    fn remove(&mut self, key: &str) -> Result<(), Error>;
}

/// Volatile store used by tests and headless runs without persistence
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Error> {
        self.values.remove(key);
        Ok(())
    }
}

/// Key-value store backed by the local SQLite database
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the store at the default application data location
    pub fn open_default() -> Result<Self, Error> {
        Ok(SqliteStore {
            conn: open_db_connection()?,
        })
    }

    /// Open a store at an explicit path, creating the schema if needed
    pub fn open(path: &Path) -> Result<Self, Error> {
        let mut conn = Connection::open(path)?;
        create_database(&mut conn)?;
        Ok(SqliteStore { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let value = self
            .conn
            .query_row(
                "select value from storage where key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.conn.execute(
            "insert into storage (key, value) values (?1, ?2)
             on conflict(key) do update set value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Error> {
        self.conn
            .execute("delete from storage where key = ?1", params![key])?;
        Ok(())
    }
}

/// Transactional save/load of the permanent track set. The collection
/// manager calls this after every mutation affecting a permanent track, so
/// callers never re-sync storage by hand.
pub struct TrackRepository {
    store: Box<dyn KeyValueStore>,
    key: String,
}

impl TrackRepository {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        TrackRepository {
            store,
            key: PERMANENT_TRACKS_KEY.to_string(),
        }
    }

    /// Load every saved track record, an absent key yields an empty list
    pub fn load(&self) -> Result<Vec<TrackData>, Error> {
        match self.store.get(&self.key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Replace the stored set with the given records
    pub fn save(&mut self, tracks: &[TrackData]) -> Result<(), Error> {
        let raw = serde_json::to_string(tracks)?;
        self.store.set(&self.key, &raw)
    }

    /// Drop the stored set entirely
    pub fn clear(&mut self) -> Result<(), Error> {
        self.store.remove(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_key_reads_as_empty() {
        let repository = TrackRepository::new(Box::new(MemoryStore::new()));
        assert!(repository.load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_json_surfaces_an_error() {
        let mut store = MemoryStore::new();
        store.set(PERMANENT_TRACKS_KEY, "{not json").unwrap();
        let repository = TrackRepository::new(Box::new(store));
        assert!(matches!(repository.load(), Err(Error::SerdeJson(_))));
    }

    #[test]
    fn sqlite_store_round_trips_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.db");

        let mut store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));

        // values survive a reopen
        drop(store);
        let mut store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
