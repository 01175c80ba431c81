#[cfg(test)]
mod tests {
    use billable::libs::activity::InputKind;
    use billable::libs::clock::{ManualClock, SystemClock};
    use billable::libs::config::{ClosurePolicy, TrackerConfig};
    use billable::libs::mirror::{MirrorStatus, PersistenceMirror, StorageBackend, STATUS_KEY};
    use billable::libs::monitor::{read_events, ComposeMonitor, TrackerEvent, CHANNEL_CAPACITY};
    use billable::libs::stores::MemoryStore;
    use billable::libs::surface::{SurfaceId, SurfaceSnapshot};
    use billable::libs::tracker::{FinalizeReason, FinalizedSession, SessionTracker};
    use chrono::Duration;
    use tokio::sync::{mpsc, oneshot};

    fn config(idle_threshold_ms: u64) -> TrackerConfig {
        TrackerConfig {
            user_id: "tester".to_string(),
            idle_threshold_ms,
            mirror_interval_ms: 50,
            closure_policy: ClosurePolicy::Summarize,
        }
    }

    fn opened(surface: &str) -> TrackerEvent {
        TrackerEvent::ComposeOpened {
            surface: SurfaceId::from(surface),
            snapshot: SurfaceSnapshot::new("client@example.com", "Settlement", ""),
        }
    }

    fn typed(surface: &str, content: &str) -> TrackerEvent {
        TrackerEvent::Input {
            surface: SurfaceId::from(surface),
            kind: InputKind::Keydown,
            snapshot: SurfaceSnapshot::new("client@example.com", "Settlement", content),
        }
    }

    fn mirrored(store: &MemoryStore) -> Option<MirrorStatus> {
        store.get(STATUS_KEY).and_then(|value| serde_json::from_value(value).ok())
    }

    #[tokio::test]
    async fn handle_drives_tracker_and_mirror() {
        let clock = ManualClock::default();
        let store = MemoryStore::new();
        let mirror = PersistenceMirror::new(vec![Box::new(store.clone())], 5_000);
        let (finalized_tx, mut finalized_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let mut monitor = ComposeMonitor::new(SessionTracker::new(clock.clone(), config(3_000)), mirror, finalized_tx);

        monitor.handle(opened("d1")).await;
        let status = mirrored(&store).unwrap();
        assert!(status.is_tracking);
        assert_eq!(status.current_elapsed_ms, 0);

        clock.advance_ms(1_500);
        monitor.handle(typed("d1", "Counsel,")).await;
        clock.advance_ms(1_000);
        monitor.handle(TrackerEvent::SendClicked { surface: SurfaceId::from("d1") }).await;

        let finalized = finalized_rx.try_recv().unwrap();
        assert_eq!(finalized.elapsed, Duration::milliseconds(2_500));
        assert_eq!(finalized.reason, FinalizeReason::Sent);
        assert_eq!(finalized.email_data.content, "Counsel,");
        assert!(!mirrored(&store).unwrap().is_tracking);
    }

    #[tokio::test]
    async fn content_only_input_line_keeps_recipient_and_subject() {
        let clock = ManualClock::default();
        let mirror = PersistenceMirror::new(vec![Box::new(MemoryStore::new())], 5_000);
        let (finalized_tx, mut finalized_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let mut monitor = ComposeMonitor::new(SessionTracker::new(clock.clone(), config(3_000)), mirror, finalized_tx);

        let lines = [
            r#"{"event":"compose_opened","surface":"d1","to":"a@example.com","subject":"Lease"}"#,
            r#"{"event":"input","surface":"d1","kind":"keydown","content":"Dear client,"}"#,
            r#"{"event":"send_clicked","surface":"d1"}"#,
        ];
        for line in lines {
            clock.advance_ms(500);
            monitor.handle(serde_json::from_str(line).unwrap()).await;
        }

        let finalized = finalized_rx.try_recv().unwrap();
        assert_eq!(finalized.email_data.to, "a@example.com");
        assert_eq!(finalized.email_data.subject, "Lease");
        assert_eq!(finalized.email_data.content, "Dear client,");
    }

    #[tokio::test]
    async fn events_for_unknown_surfaces_are_ignored() {
        let clock = ManualClock::default();
        let mirror = PersistenceMirror::new(vec![Box::new(MemoryStore::new())], 5_000);
        let (finalized_tx, mut finalized_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let mut monitor = ComposeMonitor::new(SessionTracker::new(clock, config(3_000)), mirror, finalized_tx);

        monitor.handle(typed("ghost", "hello")).await;
        monitor.handle(TrackerEvent::ComposeClosed { surface: SurfaceId::from("ghost") }).await;
        monitor.handle(TrackerEvent::Stop { surface: SurfaceId::from("ghost") }).await;

        assert!(finalized_rx.try_recv().is_err());
        assert!(!monitor.status().is_tracking);
    }

    #[tokio::test]
    async fn run_pauses_idle_drafts_in_real_time() {
        let store = MemoryStore::new();
        let mirror = PersistenceMirror::new(vec![Box::new(store.clone())], 50);
        let (event_tx, event_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (finalized_tx, mut finalized_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let monitor = ComposeMonitor::new(SessionTracker::new(SystemClock, config(200)), mirror, finalized_tx);

        let stream = [
            r#"{"event":"compose_opened","surface":"d1","to":"client@example.com","subject":"Settlement"}"#,
            r#"{"event":"input","surface":"d1","kind":"keydown","content":"Dear"}"#,
            r#"{"event":"wait","ms":100}"#,
            r#"{"event":"input","surface":"d1","content":"Dear counsel"}"#,
            r#"{"event":"wait","ms":100}"#,
            r#"{"event":"input","surface":"d1","content":"Dear counsel,"}"#,
            r#"{"event":"wait","ms":700}"#,
            r#"{"event":"send_clicked","surface":"d1"}"#,
        ]
        .join("\n");

        let (read, report) = tokio::join!(
            read_events(stream.as_bytes(), event_tx),
            monitor.run(event_rx, std::future::pending::<()>())
        );
        assert_eq!(read.unwrap(), 5);
        let report = report.unwrap();
        assert_eq!(report.started, 1);
        assert_eq!(report.finalized, 1);
        assert_eq!(report.pauses, 1);

        let finalized: FinalizedSession = finalized_rx.recv().await.unwrap();
        let elapsed = finalized.elapsed_ms();
        assert!((150..450).contains(&elapsed), "elapsed {} ms", elapsed);
        assert_eq!(finalized.reason, FinalizeReason::Sent);
        assert!(!mirrored(&store).unwrap().is_tracking);
    }

    #[tokio::test]
    async fn shutdown_stops_open_sessions() {
        let mirror = PersistenceMirror::new(vec![Box::new(MemoryStore::new())], 50);
        let (event_tx, event_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (finalized_tx, mut finalized_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let monitor = ComposeMonitor::new(SessionTracker::new(SystemClock, config(3_000)), mirror, finalized_tx);

        let driver = async move {
            event_tx.send(opened("d1")).await.unwrap();
            event_tx.send(opened("d2")).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            shutdown_tx.send(()).unwrap();
            // Keep the stream open so only the shutdown signal ends the loop.
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            drop(event_tx);
        };
        let (_, report) = tokio::join!(driver, monitor.run(event_rx, async {
            let _ = shutdown_rx.await;
        }));

        let report = report.unwrap();
        assert_eq!(report.started, 2);
        assert_eq!(report.finalized, 2);

        let mut reasons = Vec::new();
        while let Ok(session) = finalized_rx.try_recv() {
            reasons.push(session.reason);
        }
        assert_eq!(reasons, vec![FinalizeReason::Stopped, FinalizeReason::Stopped]);
    }

    #[tokio::test]
    async fn reader_skips_comments_and_bad_lines() {
        let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);
        let stream = "# recorded session\n\n{\"event\":\"compose_opened\",\"surface\":\"d1\",\"subject\":\"Hi\"}\nnot json\n{\"event\":\"teleport\"}\n{\"event\":\"compose_closed\",\"surface\":\"d1\"}\n";

        let forwarded = read_events(stream.as_bytes(), tx).await.unwrap();
        assert_eq!(forwarded, 2);

        match rx.recv().await.unwrap() {
            TrackerEvent::ComposeOpened { surface, snapshot } => {
                assert_eq!(surface, SurfaceId::from("d1"));
                assert_eq!(snapshot.subject.as_deref(), Some("Hi"));
                assert_eq!(snapshot.to, None);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(rx.recv().await.unwrap(), TrackerEvent::ComposeClosed { surface: SurfaceId::from("d1") });
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn input_kind_defaults_to_input() {
        let event: TrackerEvent = serde_json::from_str(r#"{"event":"input","surface":"d1","content":"x"}"#).unwrap();
        match event {
            TrackerEvent::Input { kind, snapshot, .. } => {
                assert_eq!(kind, InputKind::Input);
                assert_eq!(snapshot.content.as_deref(), Some("x"));
                assert_eq!(snapshot.subject, None);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
}
