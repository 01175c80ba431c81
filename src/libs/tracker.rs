//! Compose session lifecycle.
//!
//! A [`SessionController`] owns the timer, the activity detector and the
//! session of exactly one compose surface. [`SessionTracker`] keeps one
//! controller per [`SurfaceId`] so several compose windows are timed
//! independently.
//!
//! ## Signal Handling
//!
//! | Signal | Effect |
//! |---|---|
//! | compose opened | create session, `Idle → Active`; ignored if already tracking |
//! | input | refresh email snapshot; `Paused → Active` |
//! | idle timeout | `Active → Paused`, closing the interval at the last input |
//! | send / close / stop | `→ Stopped`, emit [`FinalizedSession`], drop the session |
//!
//! Transitions never await and never fail. Everything downstream of a
//! finalized session (summary, billing) happens elsewhere.

use crate::libs::activity::{ActivityDetector, ActivitySignal, InputKind};
use crate::libs::clock::Clock;
use crate::libs::config::{ClosurePolicy, TrackerConfig};
use crate::libs::mirror::MirrorStatus;
use crate::libs::session::{EmailData, Session};
use crate::libs::surface::{ComposeSurface, SurfaceId};
use crate::libs::timer::{ActivityTimer, TimerPhase};
use crate::msg_debug;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalizeReason {
    Sent,
    Closed,
    Stopped,
}

impl FinalizeReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinalizeReason::Sent => "sent",
            FinalizeReason::Closed => "closed",
            FinalizeReason::Stopped => "stopped",
        }
    }
}

/// Result of a finished session, handed to summary generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalizedSession {
    pub session_id: String,
    pub draft_id: SurfaceId,
    pub email_data: EmailData,
    #[serde(serialize_with = "serialize_duration_ms", rename = "elapsed_time_ms")]
    pub elapsed: Duration,
    pub reason: FinalizeReason,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl FinalizedSession {
    /// Whether the billing pipeline should summarize and log this session.
    pub fn wants_summary(&self, policy: ClosurePolicy) -> bool {
        match self.reason {
            FinalizeReason::Sent => true,
            FinalizeReason::Closed | FinalizeReason::Stopped => policy == ClosurePolicy::Summarize,
        }
    }

    pub fn elapsed_ms(&self) -> i64 {
        self.elapsed.num_milliseconds()
    }
}

fn serialize_duration_ms<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(duration.num_milliseconds())
}

/// Outcome of a compose-detected signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeOutcome {
    Started { session_id: String },
    AlreadyTracking { session_id: String },
    /// The surface could not be read; no session was started.
    MissingSurface,
}

/// Timer, detector and session for one compose surface.
#[derive(Debug, Clone)]
pub struct SessionController {
    surface_id: SurfaceId,
    user_id: String,
    timer: ActivityTimer,
    detector: ActivityDetector,
    session: Option<Session>,
}

impl SessionController {
    pub fn new(surface_id: SurfaceId, user_id: &str, idle_threshold_ms: u64) -> Self {
        Self {
            surface_id,
            user_id: user_id.to_string(),
            timer: ActivityTimer::new(),
            detector: ActivityDetector::from_millis(idle_threshold_ms),
            session: None,
        }
    }

    pub fn surface_id(&self) -> &SurfaceId {
        &self.surface_id
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn timer(&self) -> &ActivityTimer {
        &self.timer
    }

    pub fn phase(&self) -> TimerPhase {
        self.timer.phase()
    }

    pub fn is_tracking(&self) -> bool {
        self.session.is_some() && self.timer.is_tracking()
    }

    pub fn elapsed_at(&self, now: DateTime<Utc>) -> Duration {
        self.timer.elapsed_at(now)
    }

    pub fn idle_deadline(&self) -> Option<DateTime<Utc>> {
        if self.timer.phase() == TimerPhase::Active {
            self.detector.deadline()
        } else {
            None
        }
    }

    pub fn on_compose_detected(&mut self, surface: &impl ComposeSurface, now: DateTime<Utc>) -> ComposeOutcome {
        if let Some(session) = &self.session {
            msg_debug!(format!("Tracking already in progress for surface {}", self.surface_id));
            return ComposeOutcome::AlreadyTracking {
                session_id: session.session_id.clone(),
            };
        }
        if surface.is_empty() {
            msg_debug!(format!("Compose surface {} has no readable fields, not tracking", self.surface_id));
            return ComposeOutcome::MissingSurface;
        }

        // A fresh timer per session; a stopped timer stays frozen.
        self.timer = ActivityTimer::new();
        self.timer.start(now);
        self.detector.arm(now);
        let session = Session::new(&self.user_id, self.surface_id.clone(), EmailData::from_surface(surface), now);
        tracing::debug!(surface = %self.surface_id, session_id = %session.session_id, "session started");
        let session_id = session.session_id.clone();
        self.session = Some(session);
        ComposeOutcome::Started { session_id }
    }

    /// Feeds a raw input event through the detector and applies the
    /// resulting typing signal.
    pub fn on_input(&mut self, kind: InputKind, surface: &impl ComposeSurface, now: DateTime<Utc>) {
        if self.session.is_none() {
            msg_debug!(format!("Input on untracked surface {} ignored", self.surface_id));
            return;
        }
        if let ActivitySignal::Typing = self.detector.record_input(kind, now) {
            self.on_typing_signal(surface, now);
        }
    }

    pub fn on_typing_signal(&mut self, surface: &impl ComposeSurface, now: DateTime<Utc>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if self.timer.resume(now) {
            tracing::debug!(surface = %self.surface_id, session_id = %session.session_id, "timer resumed");
        }
        session.refresh(surface);
    }

    /// Pauses an active timer, closing the interval at `idle_since`.
    pub fn on_idle_timeout(&mut self, idle_since: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        if self.session.is_none() || !self.timer.pause(idle_since, now) {
            return false;
        }
        tracing::debug!(
            surface = %self.surface_id,
            elapsed_ms = self.timer.elapsed_at(now).num_milliseconds(),
            "timer paused after inactivity"
        );
        true
    }

    /// Fires the idle timeout if its deadline has passed.
    pub fn poll_idle(&mut self, now: DateTime<Utc>) -> bool {
        match self.detector.check_idle(now) {
            Some(ActivitySignal::IdleTimeout { idle_since }) => self.on_idle_timeout(idle_since, now),
            _ => false,
        }
    }

    pub fn on_send_detected(&mut self, now: DateTime<Utc>) -> Option<FinalizedSession> {
        self.finalize(FinalizeReason::Sent, now)
    }

    pub fn on_compose_closed(&mut self, now: DateTime<Utc>) -> Option<FinalizedSession> {
        self.finalize(FinalizeReason::Closed, now)
    }

    pub fn stop_tracking(&mut self, now: DateTime<Utc>) -> Option<FinalizedSession> {
        self.finalize(FinalizeReason::Stopped, now)
    }

    /// Stops the timer and hands out the finished session. Later calls return
    /// `None` until a new session is started.
    pub fn finalize(&mut self, reason: FinalizeReason, now: DateTime<Utc>) -> Option<FinalizedSession> {
        let elapsed = self.timer.stop(now)?;
        self.detector.cancel();
        let session = self.session.take()?;
        tracing::debug!(
            surface = %self.surface_id,
            session_id = %session.session_id,
            elapsed_ms = elapsed.num_milliseconds(),
            reason = reason.as_str(),
            "session finalized"
        );
        Some(FinalizedSession {
            session_id: session.session_id,
            draft_id: session.draft_id,
            email_data: session.email_data,
            elapsed,
            reason,
            started_at: session.started_at,
            finished_at: now,
        })
    }

    pub fn status(&self, now: DateTime<Utc>) -> MirrorStatus {
        MirrorStatus {
            is_tracking: self.is_tracking(),
            current_elapsed_ms: self.timer.elapsed_at(now).num_milliseconds(),
            is_paused: self.timer.phase() == TimerPhase::Paused,
            session_id: self.session.as_ref().map(|s| s.session_id.clone()),
            updated_at: None,
        }
    }
}

/// Registry of session controllers keyed by surface.
pub struct SessionTracker<C: Clock> {
    clock: C,
    config: TrackerConfig,
    controllers: BTreeMap<SurfaceId, SessionController>,
}

impl<C: Clock> SessionTracker<C> {
    pub fn new(clock: C, config: TrackerConfig) -> Self {
        Self {
            clock,
            config,
            controllers: BTreeMap::new(),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn controller(&self, surface_id: &SurfaceId) -> Option<&SessionController> {
        self.controllers.get(surface_id)
    }

    pub fn active_surfaces(&self) -> Vec<SurfaceId> {
        self.controllers.iter().filter(|(_, c)| c.is_tracking()).map(|(id, _)| id.clone()).collect()
    }

    pub fn compose_opened(&mut self, surface_id: &SurfaceId, surface: &impl ComposeSurface) -> ComposeOutcome {
        let now = self.clock.now();
        let config = &self.config;
        let controller = self
            .controllers
            .entry(surface_id.clone())
            .or_insert_with(|| SessionController::new(surface_id.clone(), &config.user_id, config.idle_threshold_ms));
        let outcome = controller.on_compose_detected(surface, now);
        if outcome == ComposeOutcome::MissingSurface {
            self.controllers.remove(surface_id);
        }
        outcome
    }

    pub fn input(&mut self, surface_id: &SurfaceId, kind: InputKind, surface: &impl ComposeSurface) {
        let now = self.clock.now();
        match self.controllers.get_mut(surface_id) {
            Some(controller) => controller.on_input(kind, surface, now),
            None => msg_debug!(format!("Input on unknown surface {} ignored", surface_id)),
        }
    }

    /// Fires every idle timeout that is due. Returns the surfaces that paused.
    pub fn poll_idle(&mut self) -> Vec<SurfaceId> {
        let now = self.clock.now();
        self.controllers
            .iter_mut()
            .filter_map(|(id, controller)| controller.poll_idle(now).then(|| id.clone()))
            .collect()
    }

    /// Earliest pending idle deadline across all surfaces.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.controllers.values().filter_map(|c| c.idle_deadline()).min()
    }

    pub fn send_detected(&mut self, surface_id: &SurfaceId) -> Option<FinalizedSession> {
        self.finish(surface_id, FinalizeReason::Sent)
    }

    pub fn compose_closed(&mut self, surface_id: &SurfaceId) -> Option<FinalizedSession> {
        self.finish(surface_id, FinalizeReason::Closed)
    }

    pub fn stop(&mut self, surface_id: &SurfaceId) -> Option<FinalizedSession> {
        self.finish(surface_id, FinalizeReason::Stopped)
    }

    /// Stops every running session.
    pub fn stop_all(&mut self) -> Vec<FinalizedSession> {
        let ids: Vec<SurfaceId> = self.controllers.keys().cloned().collect();
        ids.iter().filter_map(|id| self.stop(id)).collect()
    }

    fn finish(&mut self, surface_id: &SurfaceId, reason: FinalizeReason) -> Option<FinalizedSession> {
        let now = self.clock.now();
        let finalized = self.controllers.get_mut(surface_id)?.finalize(reason, now);
        self.controllers.remove(surface_id);
        finalized
    }

    /// Status for the mirror: the most recently started running session, or
    /// an idle record when nothing is tracked.
    pub fn status(&self) -> MirrorStatus {
        let now = self.clock.now();
        self.controllers
            .values()
            .filter(|c| c.is_tracking())
            .max_by_key(|c| c.session().map(|s| s.started_at))
            .map(|c| c.status(now))
            .unwrap_or_else(MirrorStatus::idle)
    }

    /// Elapsed time of the session on `surface_id`, if any.
    pub fn elapsed(&self, surface_id: &SurfaceId) -> Option<Duration> {
        let now = self.clock.now();
        self.controllers.get(surface_id).map(|c| c.elapsed_at(now))
    }
}
