//! Storage backends for the persistence mirror.
//!
//! - [`FileStore`]: a JSON object in the application data directory
//! - [`MemoryStore`]: process-local map, always available
//!
//! The SQLite backend lives in [`crate::db::status`]. [`ranked_backends`]
//! opens all three in preference order.

use crate::db::status::SqliteStore;
use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::libs::mirror::StorageBackend;
use crate::{msg_debug, msg_warning};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// File name of the JSON key/value store.
pub const STORE_FILE_NAME: &str = "status.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("database operation failed: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("store contents are not a JSON object")]
    NotAnObject,
}

/// Opens the mirror backends in preference order: SQLite, then the JSON
/// file, then memory. Backends that fail to open are reported and left out;
/// the memory store is always present.
pub fn ranked_backends() -> Vec<Box<dyn StorageBackend>> {
    let mut backends: Vec<Box<dyn StorageBackend>> = Vec::with_capacity(3);
    match SqliteStore::new() {
        Ok(store) => backends.push(Box::new(store)),
        Err(e) => msg_warning!(Message::StoreUnavailable {
            store: "sqlite".to_string(),
            error: e.to_string(),
        }),
    }
    match FileStore::open_default() {
        Ok(store) => backends.push(Box::new(store)),
        Err(e) => msg_warning!(Message::StoreUnavailable {
            store: "file".to_string(),
            error: e.to_string(),
        }),
    }
    backends.push(Box::new(MemoryStore::new()));
    backends
}

/// In-memory key/value store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn set(&mut self, key: &str, value: &Value) -> bool {
        self.values.lock().insert(key.to_string(), value.clone());
        true
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.values.lock().get(key).cloned()
    }

    fn remove(&mut self, key: &str) -> bool {
        self.values.lock().remove(key);
        true
    }
}

/// JSON-file key/value store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store under the application data directory.
    pub fn open_default() -> Result<Self, StoreError> {
        Ok(Self::new(DataStorage::new().get_path(STORE_FILE_NAME)?))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>, StoreError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&raw)? {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::NotAnObject),
        }
    }

    fn write(&self, map: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(map)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn try_set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let mut map = self.load()?;
        map.insert(key.to_string(), value.clone());
        self.write(&map)
    }

    fn try_remove(&self, key: &str) -> Result<(), StoreError> {
        let mut map = self.load()?;
        if map.remove(key).is_some() {
            self.write(&map)?;
        }
        Ok(())
    }
}

impl StorageBackend for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    fn set(&mut self, key: &str, value: &Value) -> bool {
        match self.try_set(key, value) {
            Ok(()) => true,
            Err(e) => {
                msg_debug!(format!("File store write failed: {}", e));
                false
            }
        }
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.load().ok().and_then(|mut map| map.remove(key))
    }

    fn remove(&mut self, key: &str) -> bool {
        self.try_remove(key).is_ok()
    }
}
