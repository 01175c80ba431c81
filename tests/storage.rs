#[cfg(test)]
mod tests {
    use billable::db::entries::Entries;
    use billable::db::status::SqliteStore;
    use billable::libs::clock::{Clock, ManualClock};
    use billable::libs::config::TrackerConfig;
    use billable::libs::entry::{BillingEntry, EntryGroup};
    use billable::libs::mirror::{MirrorStatus, PersistenceMirror, StorageBackend, STATUS_KEY};
    use billable::libs::stores::{ranked_backends, FileStore, MemoryStore, STORE_FILE_NAME};
    use billable::libs::surface::{SurfaceId, SurfaceSnapshot};
    use billable::libs::tracker::SessionTracker;
    use chrono::{Duration, Local, TimeZone, Utc};
    use serde_json::json;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct StorageTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for StorageTestContext {
        fn setup() -> Self {
            StorageTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    impl StorageTestContext {
        fn entries(&self) -> Entries {
            Entries::open(&self.temp_dir.path().join("billable.db")).unwrap()
        }
    }

    fn tracking_status() -> MirrorStatus {
        MirrorStatus {
            is_tracking: true,
            current_elapsed_ms: 4_200,
            is_paused: false,
            session_id: Some("alice_1".to_string()),
            updated_at: None,
        }
    }

    fn entry(session_id: &str, elapsed_ms: i64) -> BillingEntry {
        let finished_at = Local.with_ymd_and_hms(2024, 5, 6, 15, 30, 0).unwrap().with_timezone(&Utc);
        BillingEntry {
            id: None,
            session_id: session_id.to_string(),
            draft_id: "draft-1".to_string(),
            recipient: "client@example.com".to_string(),
            subject: "Deposition schedule".to_string(),
            reason: "sent".to_string(),
            elapsed_ms,
            summary: Some("Drafted scheduling email.".to_string()),
            clio_id: None,
            started_at: finished_at - Duration::milliseconds(elapsed_ms),
            finished_at,
        }
    }

    #[test_context(StorageTestContext)]
    #[test]
    fn sqlite_store_upserts_values(ctx: &mut StorageTestContext) {
        let mut store = SqliteStore::open(&ctx.temp_dir.path().join("status.db")).unwrap();
        assert_eq!(store.get(STATUS_KEY), None);

        assert!(store.set(STATUS_KEY, &json!({"isTracking": true})));
        assert!(store.set(STATUS_KEY, &json!({"isTracking": false})));
        assert_eq!(store.get(STATUS_KEY), Some(json!({"isTracking": false})));

        assert!(store.remove(STATUS_KEY));
        assert_eq!(store.get(STATUS_KEY), None);
    }

    #[test_context(StorageTestContext)]
    #[test]
    fn mirror_prefers_first_working_backend(ctx: &mut StorageTestContext) {
        let sqlite = SqliteStore::open(&ctx.temp_dir.path().join("status.db")).unwrap();
        let file = FileStore::new(ctx.temp_dir.path().join(STORE_FILE_NAME));
        let memory = MemoryStore::new();
        let mut mirror = PersistenceMirror::new(vec![Box::new(sqlite), Box::new(file.clone()), Box::new(memory.clone())], 5_000);
        assert_eq!(mirror.backend_names(), vec!["sqlite", "file", "memory"]);

        let clock = ManualClock::default();
        assert_eq!(mirror.publish(&tracking_status(), &clock, false).as_deref(), Some("sqlite"));
        assert_eq!(file.get(STATUS_KEY), None);
        assert_eq!(memory.get(STATUS_KEY), None);

        let read = mirror.read().unwrap();
        assert_eq!(read.current_elapsed_ms, 4_200);
        assert_eq!(read.updated_at, Some(clock.now()));
    }

    #[test_context(StorageTestContext)]
    #[test]
    fn mirror_falls_back_when_file_is_unusable(ctx: &mut StorageTestContext) {
        // A directory where the JSON file should be makes every file write fail.
        let file = FileStore::new(ctx.temp_dir.path().to_path_buf());
        let memory = MemoryStore::new();
        let mut mirror = PersistenceMirror::new(vec![Box::new(file), Box::new(memory.clone())], 5_000);

        let clock = ManualClock::default();
        assert_eq!(mirror.publish(&tracking_status(), &clock, true).as_deref(), Some("memory"));
        assert!(memory.get(STATUS_KEY).is_some());
        assert!(mirror.read().unwrap().is_tracking);

        assert_eq!(mirror.clear(), 1);
        assert!(mirror.read().is_none());
    }

    #[test_context(StorageTestContext)]
    #[test]
    fn mirror_throttles_unforced_writes(ctx: &mut StorageTestContext) {
        let file = FileStore::new(ctx.temp_dir.path().join(STORE_FILE_NAME));
        let mut mirror = PersistenceMirror::new(vec![Box::new(file)], 5_000);
        let clock = ManualClock::default();

        assert!(mirror.publish(&tracking_status(), &clock, false).is_some());
        clock.advance_ms(4_999);
        assert!(mirror.publish(&MirrorStatus::idle(), &clock, false).is_none());
        assert!(mirror.read().unwrap().is_tracking);

        clock.advance_ms(1);
        assert!(mirror.publish(&MirrorStatus::idle(), &clock, false).is_some());
        assert!(!mirror.read().unwrap().is_tracking);
    }

    #[test_context(StorageTestContext)]
    #[test]
    fn ranked_backends_open_in_data_directory(ctx: &mut StorageTestContext) {
        std::env::set_var("HOME", ctx.temp_dir.path());
        std::env::set_var("LOCALAPPDATA", ctx.temp_dir.path());

        let backends = ranked_backends();
        let names: Vec<&str> = backends.iter().map(|b| b.name()).collect();
        assert_eq!(names, vec!["sqlite", "file", "memory"]);
    }

    #[test_context(StorageTestContext)]
    #[test]
    fn entries_insert_and_fetch(ctx: &mut StorageTestContext) {
        let entries = ctx.entries();
        let id = entries.insert(&entry("alice_1", 90_000)).unwrap();
        entries.insert(&entry("alice_2", 30_000)).unwrap();

        let stored = entries.fetch_by_session("alice_1").unwrap().unwrap();
        assert_eq!(stored.id, Some(id));
        assert_eq!(stored.elapsed(), Duration::seconds(90));
        assert_eq!(stored.summary.as_deref(), Some("Drafted scheduling email."));

        let day = Local.with_ymd_and_hms(2024, 5, 6, 0, 0, 0).unwrap().date_naive();
        let listed = entries.fetch(day).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed.total_elapsed(), Duration::minutes(2));
        assert!(entries.fetch(day.succ_opt().unwrap()).unwrap().is_empty());
    }

    #[test_context(StorageTestContext)]
    #[test]
    fn entries_reinsert_updates_existing_row(ctx: &mut StorageTestContext) {
        let entries = ctx.entries();
        let first = entries.insert(&entry("alice_1", 1_000)).unwrap();
        let mut updated = entry("alice_1", 2_000);
        updated.summary = Some("Revised summary.".to_string());
        let second = entries.insert(&updated).unwrap();

        assert_eq!(first, second);
        let all = entries.fetch_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].elapsed_ms, 2_000);
        assert_eq!(all[0].summary.as_deref(), Some("Revised summary."));
    }

    #[test_context(StorageTestContext)]
    #[test]
    fn entries_record_clio_id_and_delete(ctx: &mut StorageTestContext) {
        let entries = ctx.entries();
        let id = entries.insert(&entry("alice_1", 1_000)).unwrap();

        assert!(entries.set_clio_id("alice_1", "9001").unwrap());
        assert!(!entries.set_clio_id("missing", "1").unwrap());
        assert_eq!(entries.fetch_by_session("alice_1").unwrap().unwrap().clio_id.as_deref(), Some("9001"));

        let formatted = entries.fetch_all().unwrap().format();
        assert_eq!(formatted[0].clio, "9001");
        assert_eq!(formatted[0].billable, "0.1 h");

        assert_eq!(entries.delete(id).unwrap(), 1);
        assert!(entries.fetch_all().unwrap().is_empty());
    }

    #[test_context(StorageTestContext)]
    #[test]
    fn drafts_opened_in_the_same_millisecond_keep_separate_history(ctx: &mut StorageTestContext) {
        let clock = ManualClock::default();
        let mut tracker = SessionTracker::new(clock.clone(), TrackerConfig::default());
        let snapshot = SurfaceSnapshot::new("client@example.com", "Lease", "Hi");
        let (first, second) = (SurfaceId::from("d1"), SurfaceId::from("d2"));
        tracker.compose_opened(&first, &snapshot);
        tracker.compose_opened(&second, &snapshot);
        clock.advance_ms(2_000);

        let entries = ctx.entries();
        for draft in [&first, &second] {
            let finalized = tracker.send_detected(draft).unwrap();
            entries.insert(&BillingEntry::from_session(&finalized, None)).unwrap();
        }
        assert_eq!(entries.fetch_all().unwrap().len(), 2);
    }
}
