//! Composition timer state machine.
//!
//! The timer accumulates the wall-clock time a compose session spends in the
//! active phase. It moves through four phases:
//!
//! ```text
//! Idle ──start──▶ Active ──pause──▶ Paused ──resume──▶ Active ... ──stop──▶ Stopped
//! ```
//!
//! ## Elapsed Time
//!
//! [`TimerState::elapsed_at`] is the only place elapsed time is computed:
//!
//! ```text
//! elapsed = accumulated_time + (is_active ? now - start_time : 0)
//! ```
//!
//! Mirror status, finalize and every display path go through it.
//!
//! ## Failure Model
//!
//! No method returns an error. Transitions that do not apply to the current
//! phase are ignored and reported back as `false`, and a stopped timer is
//! frozen for good.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Lifecycle phase of a composition timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    Idle,
    Active,
    Paused,
    Stopped,
}

/// Mutable timer record owned by one session controller.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerState {
    pub phase: TimerPhase,
    /// Whether time is currently accumulating.
    pub is_active: bool,
    /// Mirrors `!is_active` while a session is running.
    pub is_paused: bool,
    /// Start of the current active interval.
    pub start_time: Option<DateTime<Utc>>,
    /// Sum of all completed active intervals.
    pub accumulated_time: Duration,
    /// Diagnostic only.
    pub last_pause_time: Option<DateTime<Utc>>,
    /// Set once on stop.
    pub final_elapsed: Option<Duration>,
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            phase: TimerPhase::Idle,
            is_active: false,
            is_paused: false,
            start_time: None,
            accumulated_time: Duration::zero(),
            last_pause_time: None,
            final_elapsed: None,
        }
    }
}

impl TimerState {
    /// Total active time as of `now`.
    ///
    /// A stopped timer always reports its frozen value.
    pub fn elapsed_at(&self, now: DateTime<Utc>) -> Duration {
        if let Some(frozen) = self.final_elapsed {
            return frozen;
        }
        let running = match (self.is_active, self.start_time) {
            (true, Some(start)) if now > start => now - start,
            _ => Duration::zero(),
        };
        self.accumulated_time + running
    }
}

/// The state machine driving a [`TimerState`].
#[derive(Debug, Clone, Default)]
pub struct ActivityTimer {
    state: TimerState,
}

impl ActivityTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn phase(&self) -> TimerPhase {
        self.state.phase
    }

    /// True while a session is running, paused or not.
    pub fn is_tracking(&self) -> bool {
        matches!(self.state.phase, TimerPhase::Active | TimerPhase::Paused)
    }

    pub fn elapsed_at(&self, now: DateTime<Utc>) -> Duration {
        self.state.elapsed_at(now)
    }

    /// `Idle → Active`. Returns `false` when a session is already running or
    /// the timer has been stopped.
    pub fn start(&mut self, now: DateTime<Utc>) -> bool {
        if self.state.phase != TimerPhase::Idle {
            return false;
        }
        self.state = TimerState {
            phase: TimerPhase::Active,
            is_active: true,
            is_paused: false,
            start_time: Some(now),
            ..TimerState::default()
        };
        true
    }

    /// `Active → Paused`, closing the current interval at `pause_at`.
    ///
    /// `pause_at` is clamped into `[start_time, now]` so an interval is never
    /// negative and never extends past the present.
    pub fn pause(&mut self, pause_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        if self.state.phase != TimerPhase::Active {
            return false;
        }
        let start = self.state.start_time.unwrap_or(now);
        let end = pause_at.clamp(start, now.max(start));
        self.state.accumulated_time += end - start;
        self.state.phase = TimerPhase::Paused;
        self.state.is_active = false;
        self.state.is_paused = true;
        self.state.start_time = None;
        self.state.last_pause_time = Some(end);
        true
    }

    /// `Paused → Active`. Accumulated time is left untouched.
    pub fn resume(&mut self, now: DateTime<Utc>) -> bool {
        if self.state.phase != TimerPhase::Paused {
            return false;
        }
        self.state.phase = TimerPhase::Active;
        self.state.is_active = true;
        self.state.is_paused = false;
        self.state.start_time = Some(now);
        true
    }

    /// `Active | Paused → Stopped`. Returns the final elapsed time the first
    /// time it is called and `None` afterwards.
    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<Duration> {
        if !self.is_tracking() {
            return None;
        }
        let elapsed = self.state.elapsed_at(now);
        self.state.phase = TimerPhase::Stopped;
        self.state.is_active = false;
        self.state.is_paused = false;
        self.state.start_time = None;
        self.state.accumulated_time = elapsed;
        self.state.final_elapsed = Some(elapsed);
        Some(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(secs)
    }

    #[test]
    fn start_sets_active_interval() {
        let mut timer = ActivityTimer::new();
        assert!(timer.start(at(0)));
        assert_eq!(timer.phase(), TimerPhase::Active);
        assert_eq!(timer.state().start_time, Some(at(0)));
        assert_eq!(timer.elapsed_at(at(7)), Duration::seconds(7));
    }

    #[test]
    fn duplicate_start_is_ignored() {
        let mut timer = ActivityTimer::new();
        timer.start(at(0));
        timer.pause(at(4), at(4));
        assert!(!timer.start(at(5)));
        assert_eq!(timer.state().accumulated_time, Duration::seconds(4));
        assert_eq!(timer.phase(), TimerPhase::Paused);
    }

    #[test]
    fn paused_time_is_excluded() {
        let mut timer = ActivityTimer::new();
        timer.start(at(0));
        timer.pause(at(2), at(5));
        assert_eq!(timer.elapsed_at(at(6)), Duration::seconds(2));
        timer.resume(at(6));
        assert_eq!(timer.elapsed_at(at(8)), Duration::seconds(4));
    }

    #[test]
    fn pause_point_is_clamped() {
        let mut timer = ActivityTimer::new();
        timer.start(at(10));
        timer.pause(at(3), at(12));
        assert_eq!(timer.state().accumulated_time, Duration::zero());

        let mut timer = ActivityTimer::new();
        timer.start(at(0));
        timer.pause(at(50), at(12));
        assert_eq!(timer.state().accumulated_time, Duration::seconds(12));
    }

    #[test]
    fn stop_while_paused_adds_nothing() {
        let mut timer = ActivityTimer::new();
        timer.start(at(0));
        timer.pause(at(3), at(6));
        assert_eq!(timer.stop(at(100)), Some(Duration::seconds(3)));
    }

    #[test]
    fn stop_is_idempotent_and_freezes() {
        let mut timer = ActivityTimer::new();
        timer.start(at(0));
        assert_eq!(timer.stop(at(9)), Some(Duration::seconds(9)));
        assert_eq!(timer.stop(at(20)), None);
        assert!(!timer.resume(at(21)));
        assert!(!timer.start(at(22)));
        assert_eq!(timer.elapsed_at(at(30)), Duration::seconds(9));
    }

    #[test]
    fn transitions_from_wrong_phase_are_noops() {
        let mut timer = ActivityTimer::new();
        assert!(!timer.pause(at(1), at(1)));
        assert!(!timer.resume(at(1)));
        assert_eq!(timer.stop(at(1)), None);
        assert_eq!(timer.phase(), TimerPhase::Idle);
    }
}
