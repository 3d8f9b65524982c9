//! Database module - SQLite-backed local storage for JSON blobs

use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::Result;

/// Storage keys, one JSON blob each
pub mod storage_keys {
    pub const USER: &str = "gymGrowthUser";
    pub const WORKOUT_HISTORY: &str = "gymGrowthWorkoutHistory";
    pub const ACTIVE_WORKOUT: &str = "gymGrowthActiveWorkout";
    pub const BODY_PART_DATA: &str = "gymGrowthBodyPartData";
    pub const COMPLETED_QUESTS: &str = "gymGrowthCompletedQuests";
    pub const TOKEN: &str = "gymGrowthToken";
}

/// Database wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Fresh database that lives only as long as the handle
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS local_storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO local_storage (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// All stored keys, sorted
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM local_storage ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    /// Load and parse a JSON blob.
    ///
    /// A blob that no longer parses is dropped from storage so the next
    /// start begins clean.
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.get_item(key)? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Failed to parse stored {}: {}", key, e);
                self.remove_item(key)?;
                Ok(None)
            }
        }
    }

    pub fn save_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        debug!("Saving {} ({} bytes)", key, raw.len());
        self.set_item(key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Blob {
        name: String,
        count: u32,
    }

    #[test]
    fn test_set_get_remove() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_item("a").unwrap(), None);

        db.set_item("a", "1").unwrap();
        db.set_item("a", "2").unwrap();
        assert_eq!(db.get_item("a").unwrap().as_deref(), Some("2"));

        db.remove_item("a").unwrap();
        assert_eq!(db.get_item("a").unwrap(), None);
    }

    #[test]
    fn test_json_blob() {
        let db = Database::open_in_memory().unwrap();
        let blob = Blob { name: "squat".into(), count: 3 };
        db.save_json("blob", &blob).unwrap();

        let loaded: Option<Blob> = db.load_json("blob").unwrap();
        assert_eq!(loaded, Some(blob));
    }

    #[test]
    fn test_corrupt_blob_is_cleared() {
        let db = Database::open_in_memory().unwrap();
        db.set_item(storage_keys::USER, "{not json").unwrap();

        let loaded: Option<Blob> = db.load_json(storage_keys::USER).unwrap();
        assert!(loaded.is_none());
        assert_eq!(db.get_item(storage_keys::USER).unwrap(), None);
    }

    #[test]
    fn test_keys_sorted() {
        let db = Database::open_in_memory().unwrap();
        db.set_item("b", "1").unwrap();
        db.set_item("a", "1").unwrap();
        assert_eq!(db.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }
}
