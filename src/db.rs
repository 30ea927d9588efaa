//! Persistence adapter: a SQLite-backed key/value store.
//!
//! The task list is stored as one serialized JSON blob under the `tasks` key
//! and the last-selected view mode as a plain scalar under `currentView`.
//! This layer owns serialization and nothing else; all business logic lives
//! in the store.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::types::{Task, ViewMode};

const TASKS_KEY: &str = "tasks";
const VIEW_KEY: &str = "currentView";

/// Database handle wrapping a SQLite connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create data directory {}", parent.display())
                })?;
            }
        }
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA busy_timeout=5000;",
        )?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.init_schema()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.init_schema()?;

        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    pub(crate) fn put(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Load the raw stored records. An absent blob is an empty sequence; a
    /// blob that is not valid JSON is an error (the caller treats it as
    /// startup-fatal rather than silently discarding data).
    pub fn load_raw_tasks(&self) -> Result<Vec<serde_json::Value>> {
        match self.get(TASKS_KEY)? {
            None => Ok(Vec::new()),
            Some(blob) => serde_json::from_str(&blob)
                .context("stored task list is not a valid JSON record sequence"),
        }
    }

    /// Persist the full collection.
    pub fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        let blob = serde_json::to_string(tasks).context("failed to serialize task list")?;
        self.put(TASKS_KEY, &blob)
    }

    /// Load the last-selected presentation mode, if one was ever saved.
    /// An unrecognized stored value is treated as absent.
    pub fn load_view_mode(&self) -> Result<Option<ViewMode>> {
        Ok(self.get(VIEW_KEY)?.and_then(|s| ViewMode::from_str(&s)))
    }

    pub fn save_view_mode(&self, mode: ViewMode) -> Result<()> {
        self.put(VIEW_KEY, mode.as_str())
    }
}
