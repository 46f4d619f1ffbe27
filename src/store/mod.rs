//! Namespaced local store for the mini-apps
//!
//! Pure key-value, last-write-wins. Entries live under the composite key
//! `"{app_key}:{key}"` so two apps with distinct keys never collide. All
//! persistence failures are swallowed: a failed `save` or `remove` is a
//! logged no-op and a failed `load` hands back the caller's fallback. The
//! mini-apps must keep working when the device store is full or corrupted.

use std::path::Path;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{Error, Result};

/// Store connection pool
pub type StorePool = Pool<SqliteConnectionManager>;

/// Pooled store connection
pub type StoreConn = PooledConnection<SqliteConnectionManager>;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS app_entries (
    skey  TEXT PRIMARY KEY,
    value TEXT NOT NULL
)";

/// Device-local persistence shared by the mini-apps
#[derive(Clone)]
pub struct LocalStore {
    pool: StorePool,
}

impl LocalStore {
    /// Open (or create) the store at the given path
    ///
    /// # Errors
    ///
    /// Returns error if the database cannot be opened or initialized
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder()
            .max_size(4)
            .build(manager)
            .map_err(|e| Error::Store(e.to_string()))?;
        Self::init(pool)
    }

    /// Open the store at the platform-default location
    ///
    /// Honors `READALOUD_DATA_DIR`, otherwise resolves the per-user data
    /// directory for the site apps.
    ///
    /// # Errors
    ///
    /// Returns error if no data directory can be determined or the database
    /// cannot be opened
    pub fn open_default() -> Result<Self> {
        let dir = match std::env::var("READALOUD_DATA_DIR") {
            Ok(dir) => std::path::PathBuf::from(dir),
            Err(_) => directories::ProjectDirs::from("org", "schoolsite", "readaloud")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .ok_or_else(|| Error::Store("could not determine data directory".to_string()))?,
        };
        std::fs::create_dir_all(&dir)?;
        Self::open(dir.join("apps.db"))
    }

    /// Open an in-memory store
    ///
    /// A single pooled connection, otherwise each checkout would see its own
    /// empty database.
    ///
    /// # Errors
    ///
    /// Returns error if the database cannot be initialized
    pub fn open_in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| Error::Store(e.to_string()))?;
        Self::init(pool)
    }

    fn init(pool: StorePool) -> Result<Self> {
        let conn = pool.get().map_err(|e| Error::Store(e.to_string()))?;
        conn.execute(SCHEMA, [])?;
        Ok(Self { pool })
    }

    /// Save a JSON-serializable value under `(app_key, key)`
    ///
    /// Serialization and storage failures are swallowed; the entry simply
    /// keeps its previous value (or stays absent).
    pub fn save<T: Serialize>(&self, app_key: &str, key: &str, value: &T) {
        if let Err(e) = self.try_save(app_key, key, value) {
            tracing::warn!(app_key, key, error = %e, "local store save failed");
        }
    }

    /// Load the value for `(app_key, key)`, or `fallback` when the entry is
    /// absent or unreadable
    pub fn load<T: DeserializeOwned>(&self, app_key: &str, key: &str, fallback: T) -> T {
        match self.try_load(app_key, key) {
            Ok(Some(value)) => value,
            Ok(None) => fallback,
            Err(e) => {
                tracing::warn!(app_key, key, error = %e, "local store load failed");
                fallback
            }
        }
    }

    /// Remove the entry for `(app_key, key)`, swallowing failures
    pub fn remove(&self, app_key: &str, key: &str) {
        if let Err(e) = self.try_remove(app_key, key) {
            tracing::warn!(app_key, key, error = %e, "local store remove failed");
        }
    }

    fn conn(&self) -> Result<StoreConn> {
        self.pool.get().map_err(|e| Error::Store(e.to_string()))
    }

    fn try_save<T: Serialize>(&self, app_key: &str, key: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string(value)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO app_entries (skey, value) VALUES (?1, ?2)
             ON CONFLICT(skey) DO UPDATE SET value = excluded.value",
            rusqlite::params![composite(app_key, key), text],
        )?;
        Ok(())
    }

    fn try_load<T: DeserializeOwned>(&self, app_key: &str, key: &str) -> Result<Option<T>> {
        let conn = self.conn()?;
        let result = conn.query_row(
            "SELECT value FROM app_entries WHERE skey = ?1",
            rusqlite::params![composite(app_key, key)],
            |row| row.get::<_, String>(0),
        );
        match result {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn try_remove(&self, app_key: &str, key: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM app_entries WHERE skey = ?1",
            rusqlite::params![composite(app_key, key)],
        )?;
        Ok(())
    }
}

/// Physical key for an `(app_key, key)` pair
fn composite(app_key: &str, key: &str) -> String {
    format!("{app_key}:{key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> LocalStore {
        LocalStore::open_in_memory().unwrap()
    }

    #[test]
    fn save_and_load_roundtrip() {
        let store = test_store();
        store.save("phonics", "progress", &42_u32);
        assert_eq!(store.load("phonics", "progress", 0_u32), 42);
    }

    #[test]
    fn roundtrip_structured_value() {
        #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug, Clone)]
        struct Progress {
            level: u8,
            stars: Vec<String>,
        }

        let store = test_store();
        let value = Progress {
            level: 3,
            stars: vec!["gold".to_string(), "silver".to_string()],
        };
        store.save("reader", "state", &value);

        let fallback = Progress {
            level: 0,
            stars: vec![],
        };
        assert_eq!(store.load("reader", "state", fallback), value);
    }

    #[test]
    fn absent_key_returns_fallback() {
        let store = test_store();
        assert_eq!(
            store.load("phonics", "missing", "default".to_string()),
            "default"
        );
    }

    #[test]
    fn apps_are_isolated() {
        let store = test_store();
        store.save("app1", "x", &1_i32);
        assert_eq!(store.load::<Option<i32>>("app2", "x", None), None);
    }

    #[test]
    fn last_write_wins() {
        let store = test_store();
        store.save("app", "k", &"first");
        store.save("app", "k", &"second");
        assert_eq!(store.load("app", "k", String::new()), "second");
    }

    #[test]
    fn corrupt_value_returns_fallback() {
        let store = test_store();
        {
            let conn = store.conn().unwrap();
            conn.execute(
                "INSERT INTO app_entries (skey, value) VALUES ('app:bad', 'not json{{')",
                [],
            )
            .unwrap();
        }
        assert_eq!(store.load("app", "bad", 7_u32), 7);
    }

    #[test]
    fn remove_deletes_entry() {
        let store = test_store();
        store.save("app", "gone", &true);
        store.remove("app", "gone");
        assert_eq!(store.load::<Option<bool>>("app", "gone", None), None);
    }

    #[test]
    fn remove_absent_key_is_noop() {
        let store = test_store();
        store.remove("app", "never-saved");
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");

        {
            let store = LocalStore::open(&path).unwrap();
            store.save("app", "k", &"kept");
        }

        let store = LocalStore::open(&path).unwrap();
        assert_eq!(store.load("app", "k", String::new()), "kept");
    }
}
