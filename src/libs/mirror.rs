//! Best-effort status mirroring to ranked storage backends.
//!
//! The mirror publishes the current timer status so other surfaces (the
//! `status` command, a popup) can show it. It is never read back by the timer
//! and a failed write never affects elapsed time.
//!
//! ## Write Policy
//!
//! - Backends are tried in the order they were registered; the first one that
//!   accepts the value ends the write.
//! - Writes are throttled to one per `min_interval`, except forced writes
//!   (session start and stop).
//! - A write that every backend rejects leaves the throttle untouched so the
//!   next tick retries.

use crate::libs::clock::Clock;
use crate::msg_debug;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Storage key the status is published under.
pub const STATUS_KEY: &str = "billable_timer_status";

/// Default minimum spacing between unforced writes, in milliseconds.
pub const DEFAULT_MIRROR_INTERVAL_MS: u64 = 5_000;

/// A host-provided key/value store.
pub trait StorageBackend: Send {
    fn name(&self) -> &str;

    /// Stores `value` under `key`. Returns `false` on any failure.
    fn set(&mut self, key: &str, value: &Value) -> bool;

    fn get(&self, key: &str) -> Option<Value>;

    /// Removes `key`. Returns `false` on any failure.
    fn remove(&mut self, key: &str) -> bool;
}

/// Status record shared with other UI surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorStatus {
    pub is_tracking: bool,
    pub current_elapsed_ms: i64,
    pub is_paused: bool,
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MirrorStatus {
    pub fn idle() -> Self {
        Self {
            is_tracking: false,
            current_elapsed_ms: 0,
            is_paused: false,
            session_id: None,
            updated_at: None,
        }
    }
}

pub struct PersistenceMirror {
    backends: Vec<Box<dyn StorageBackend>>,
    min_interval: Duration,
    last_write: Option<DateTime<Utc>>,
}

impl PersistenceMirror {
    pub fn new(backends: Vec<Box<dyn StorageBackend>>, min_interval_ms: u64) -> Self {
        Self {
            backends,
            min_interval: Duration::milliseconds(min_interval_ms as i64),
            last_write: None,
        }
    }

    pub fn backend_names(&self) -> Vec<String> {
        self.backends.iter().map(|b| b.name().to_string()).collect()
    }

    /// Publishes `status`. Returns the name of the backend that took it, or
    /// `None` when throttled or when every backend failed.
    pub fn publish(&mut self, status: &MirrorStatus, clock: &impl Clock, force: bool) -> Option<String> {
        let now = clock.now();
        if !force {
            if let Some(last) = self.last_write {
                if now - last < self.min_interval {
                    return None;
                }
            }
        }

        let mut stamped = status.clone();
        stamped.updated_at = Some(now);
        let value = match serde_json::to_value(&stamped) {
            Ok(value) => value,
            Err(e) => {
                msg_debug!(format!("Mirror status not serializable: {}", e));
                return None;
            }
        };

        for backend in self.backends.iter_mut() {
            if backend.set(STATUS_KEY, &value) {
                self.last_write = Some(now);
                return Some(backend.name().to_string());
            }
            msg_debug!(format!("Mirror backend '{}' rejected the status write", backend.name()));
        }
        None
    }

    /// Reads the status from the first backend that has it.
    pub fn read(&self) -> Option<MirrorStatus> {
        self.backends
            .iter()
            .filter_map(|backend| backend.get(STATUS_KEY))
            .find_map(|value| serde_json::from_value(value).ok())
    }

    /// Removes the status from every backend. Returns how many succeeded.
    pub fn clear(&mut self) -> usize {
        self.last_write = None;
        self.backends.iter_mut().map(|backend| backend.remove(STATUS_KEY)).filter(|removed| *removed).count()
    }
}
