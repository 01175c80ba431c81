//! Typing activity detection with debounce.
//!
//! Raw input events from a compose surface are collapsed into two logical
//! signals: [`ActivitySignal::Typing`], emitted on every input, and
//! [`ActivitySignal::IdleTimeout`], emitted once when no input has arrived for
//! the idle threshold. Each input cancels the pending deadline and schedules a
//! new one.
//!
//! The detector holds no timer of its own. The owner asks for
//! [`ActivityDetector::deadline`] and calls [`ActivityDetector::check_idle`]
//! when that instant is reached, which keeps the detector usable from both
//! the async monitor loop and synchronous tests.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Canonical inactivity window before a session is paused, in milliseconds.
pub const DEFAULT_IDLE_THRESHOLD_MS: u64 = 3_000;

/// Kind of raw input observed on a compose surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    #[default]
    Input,
    Keydown,
    Paste,
    Focus,
}

/// Logical activity signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivitySignal {
    Typing,
    /// No input since `idle_since` for a full idle threshold.
    IdleTimeout { idle_since: DateTime<Utc> },
}

#[derive(Debug, Clone)]
pub struct ActivityDetector {
    threshold: Duration,
    last_input: Option<DateTime<Utc>>,
    deadline: Option<DateTime<Utc>>,
}

impl ActivityDetector {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            last_input: None,
            deadline: None,
        }
    }

    pub fn from_millis(threshold_ms: u64) -> Self {
        Self::new(Duration::milliseconds(threshold_ms as i64))
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Registers a raw input: cancels the pending deadline, schedules a new
    /// one and returns the `Typing` signal.
    pub fn record_input(&mut self, kind: InputKind, now: DateTime<Utc>) -> ActivitySignal {
        tracing::trace!(?kind, "input observed");
        self.last_input = Some(now);
        self.deadline = Some(now + self.threshold);
        ActivitySignal::Typing
    }

    /// Arms the idle deadline without reporting a typing signal. Used when a
    /// session starts so an untouched compose window still pauses.
    pub fn arm(&mut self, now: DateTime<Utc>) {
        self.last_input = Some(now);
        self.deadline = Some(now + self.threshold);
    }

    /// Fires `IdleTimeout` if the deadline has passed. The deadline is
    /// consumed, so a quiet surface produces exactly one timeout.
    pub fn check_idle(&mut self, now: DateTime<Utc>) -> Option<ActivitySignal> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                let idle_since = self.last_input.unwrap_or(deadline - self.threshold);
                Some(ActivitySignal::IdleTimeout { idle_since })
            }
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    pub fn last_input(&self) -> Option<DateTime<Utc>> {
        self.last_input
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

impl Default for ActivityDetector {
    fn default() -> Self {
        Self::from_millis(DEFAULT_IDLE_THRESHOLD_MS)
    }
}
