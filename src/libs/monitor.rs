//! Event loop that drives the session tracker.
//!
//! The monitor owns the [`SessionTracker`] and the [`PersistenceMirror`] and
//! is the only code that mutates them. It waits on three things at once:
//!
//! - the next compose-surface event,
//! - the earliest idle deadline across all tracked surfaces,
//! - the mirror heartbeat.
//!
//! Every transition runs to completion before the next `select!` turn.
//! Finalized sessions leave through an `mpsc` channel so summary generation
//! and billing never run inside the loop.
//!
//! ## Event Stream
//!
//! Events are newline-delimited JSON, tagged by `event`:
//!
//! ```text
//! {"event":"compose_opened","surface":"d1","to":"a@example.com","subject":"Lease","content":""}
//! {"event":"input","surface":"d1","kind":"keydown","content":"Dear client,"}
//! {"event":"wait","ms":1500}
//! {"event":"send_clicked","surface":"d1"}
//! ```
//!
//! `wait` is consumed by the reader to replay recorded streams in real time.
//! Surface fields left out of an `input` line keep their previous values.

use crate::libs::activity::InputKind;
use crate::libs::clock::Clock;
use crate::libs::messages::Message;
use crate::libs::mirror::{MirrorStatus, PersistenceMirror};
use crate::libs::surface::{SurfaceId, SurfaceSnapshot};
use crate::libs::tracker::{ComposeOutcome, FinalizedSession, SessionTracker};
use crate::{msg_debug, msg_info, msg_warning};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::time::{self, Duration, MissedTickBehavior};

/// Capacity of the event and finalize channels.
pub const CHANNEL_CAPACITY: usize = 256;

/// Sleep used when no idle deadline is pending; that select branch is disabled.
const IDLE_WAIT_CEILING: Duration = Duration::from_secs(86_400);

/// A lifecycle or input event from a compose surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TrackerEvent {
    ComposeOpened {
        surface: SurfaceId,
        #[serde(flatten)]
        snapshot: SurfaceSnapshot,
    },
    Input {
        surface: SurfaceId,
        #[serde(default)]
        kind: InputKind,
        #[serde(flatten)]
        snapshot: SurfaceSnapshot,
    },
    SendClicked {
        surface: SurfaceId,
    },
    ComposeClosed {
        surface: SurfaceId,
    },
    Stop {
        surface: SurfaceId,
    },
    Wait {
        ms: u64,
    },
}

/// Counters reported when the monitor exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorReport {
    pub events: usize,
    pub started: usize,
    pub finalized: usize,
    pub pauses: usize,
}

pub struct ComposeMonitor<C: Clock> {
    tracker: SessionTracker<C>,
    mirror: PersistenceMirror,
    finalized_tx: mpsc::Sender<FinalizedSession>,
    heartbeat: Duration,
    report: MonitorReport,
}

impl<C: Clock> ComposeMonitor<C> {
    pub fn new(tracker: SessionTracker<C>, mirror: PersistenceMirror, finalized_tx: mpsc::Sender<FinalizedSession>) -> Self {
        let heartbeat = Duration::from_millis(tracker.config().mirror_interval_ms.max(1));
        Self {
            tracker,
            mirror,
            finalized_tx,
            heartbeat,
            report: MonitorReport::default(),
        }
    }

    pub fn tracker(&self) -> &SessionTracker<C> {
        &self.tracker
    }

    /// Runs until the event stream ends or `shutdown` resolves, then stops
    /// every open session.
    pub async fn run(mut self, mut events: mpsc::Receiver<TrackerEvent>, shutdown: impl Future<Output = ()>) -> Result<MonitorReport> {
        tokio::pin!(shutdown);
        let mut heartbeat = time::interval(self.heartbeat);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let deadline = self.tracker.next_deadline();
            let idle_in = deadline
                .map(|d| (d - self.tracker.clock().now()).to_std().unwrap_or(Duration::ZERO))
                .unwrap_or(IDLE_WAIT_CEILING);

            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle(event).await,
                    None => break,
                },
                _ = time::sleep(idle_in), if deadline.is_some() => {
                    let paused = self.tracker.poll_idle();
                    if !paused.is_empty() {
                        self.report.pauses += paused.len();
                        for surface in &paused {
                            msg_debug!(Message::TrackingPaused(surface.to_string()));
                        }
                        self.publish(true);
                    }
                },
                _ = heartbeat.tick() => self.publish(false),
                _ = &mut shutdown => {
                    msg_info!(Message::MonitorShuttingDown);
                    break;
                }
            }
        }

        for finalized in self.tracker.stop_all() {
            self.emit(finalized).await;
        }
        self.publish(true);
        Ok(self.report)
    }

    /// Applies one event. The tracker transition completes before anything
    /// is awaited.
    pub async fn handle(&mut self, event: TrackerEvent) {
        self.report.events += 1;
        let finalized = match event {
            TrackerEvent::ComposeOpened { surface, snapshot } => {
                match self.tracker.compose_opened(&surface, &snapshot) {
                    ComposeOutcome::Started { session_id } => {
                        self.report.started += 1;
                        msg_info!(Message::TrackingStarted {
                            surface: surface.to_string(),
                            session_id,
                        });
                        self.publish(true);
                    }
                    ComposeOutcome::AlreadyTracking { .. } => {}
                    ComposeOutcome::MissingSurface => msg_debug!(Message::SurfaceUnreadable(surface.to_string())),
                }
                None
            }
            TrackerEvent::Input { surface, kind, snapshot } => {
                self.tracker.input(&surface, kind, &snapshot);
                self.publish(false);
                None
            }
            TrackerEvent::SendClicked { surface } => self.tracker.send_detected(&surface),
            TrackerEvent::ComposeClosed { surface } => self.tracker.compose_closed(&surface),
            TrackerEvent::Stop { surface } => self.tracker.stop(&surface),
            TrackerEvent::Wait { ms } => {
                msg_debug!(format!("Ignoring wait of {} ms inside the monitor", ms));
                None
            }
        };

        if let Some(finalized) = finalized {
            self.publish(true);
            self.emit(finalized).await;
        }
    }

    fn publish(&mut self, force: bool) {
        let status = self.tracker.status();
        if let Some(backend) = self.mirror.publish(&status, self.tracker.clock(), force) {
            msg_debug!(format!("Status mirrored to {}", backend));
        }
    }

    async fn emit(&mut self, finalized: FinalizedSession) {
        self.report.finalized += 1;
        if self.finalized_tx.send(finalized).await.is_err() {
            msg_warning!(Message::FinalizeDropped);
        }
    }

    /// Current status as it would be mirrored.
    pub fn status(&self) -> MirrorStatus {
        self.tracker.status()
    }
}

/// Parses newline-delimited events from `reader` and forwards them to `tx`.
///
/// Blank lines and lines starting with `#` are skipped, malformed lines are
/// reported and skipped, and `wait` events pause the reader. Returns the
/// number of events forwarded.
pub async fn read_events<R>(reader: R, tx: mpsc::Sender<TrackerEvent>) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut forwarded = 0;
    let mut line_no = 0;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match serde_json::from_str::<TrackerEvent>(trimmed) {
            Ok(TrackerEvent::Wait { ms }) => time::sleep(Duration::from_millis(ms)).await,
            Ok(event) => {
                if tx.send(event).await.is_err() {
                    break;
                }
                forwarded += 1;
            }
            Err(e) => msg_warning!(Message::InvalidEventLine(line_no, e.to_string())),
        }
    }
    Ok(forwarded)
}
