//! SQLite-backed key/value store for the persistence mirror.
//!
//! ```rust,no_run
//! use billable::db::status::SqliteStore;
//! use billable::libs::mirror::StorageBackend;
//!
//! let mut store = SqliteStore::new()?;
//! store.set("billable_timer_status", &serde_json::json!({"isTracking": false}));
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::db::db::Db;
use crate::libs::mirror::StorageBackend;
use crate::libs::stores::StoreError;
use crate::msg_debug;
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;

const SCHEMA_KV_STORE: &str = "CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT NOT NULL PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)";

const UPSERT_VALUE: &str = "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
    ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

const SELECT_VALUE: &str = "SELECT value FROM kv_store WHERE key = ?1";

const DELETE_VALUE: &str = "DELETE FROM kv_store WHERE key = ?1";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new() -> Result<SqliteStore> {
        Self::from_db(Db::new()?)
    }

    pub fn open(path: &Path) -> Result<SqliteStore> {
        Self::from_db(Db::open(path)?)
    }

    fn from_db(db: Db) -> Result<SqliteStore> {
        db.conn.execute(SCHEMA_KV_STORE, [])?;
        Ok(SqliteStore { conn: db.conn })
    }

    fn try_set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        self.conn.execute(UPSERT_VALUE, params![key, serde_json::to_string(value)?])?;
        Ok(())
    }

    fn try_get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let raw: Option<String> = self.conn.query_row(SELECT_VALUE, params![key], |row| row.get(0)).optional()?;
        Ok(match raw {
            Some(raw) => Some(serde_json::from_str(&raw)?),
            None => None,
        })
    }
}

impl StorageBackend for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn set(&mut self, key: &str, value: &Value) -> bool {
        match self.try_set(key, value) {
            Ok(()) => true,
            Err(e) => {
                msg_debug!(format!("SQLite store write failed: {}", e));
                false
            }
        }
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.try_get(key).ok().flatten()
    }

    fn remove(&mut self, key: &str) -> bool {
        self.conn.execute(DELETE_VALUE, params![key]).is_ok()
    }
}
