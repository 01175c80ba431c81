#[cfg(test)]
mod tests {
    use billable::api::clio::ClioConfig;
    use billable::api::summary::SummaryConfig;
    use billable::libs::activity::DEFAULT_IDLE_THRESHOLD_MS;
    use billable::libs::config::{ClosurePolicy, Config, TrackerConfig, CONFIG_FILE_NAME};
    use billable::libs::data_storage::DataStorage;
    use billable::libs::mirror::DEFAULT_MIRROR_INTERVAL_MS;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    /// Points the data directory at a temporary home.
    struct ConfigTestContext {
        _temp_dir: TempDir,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            std::env::set_var("HOME", temp_dir.path());
            std::env::set_var("LOCALAPPDATA", temp_dir.path());
            ConfigTestContext { _temp_dir: temp_dir }
        }
    }

    #[test]
    fn tracker_defaults_are_canonical() {
        let tracker = TrackerConfig::default();
        assert_eq!(tracker.idle_threshold_ms, DEFAULT_IDLE_THRESHOLD_MS);
        assert_eq!(tracker.idle_threshold_ms, 3_000);
        assert_eq!(tracker.mirror_interval_ms, DEFAULT_MIRROR_INTERVAL_MS);
        assert_eq!(tracker.closure_policy, ClosurePolicy::Summarize);
        assert!(!tracker.user_id.is_empty());
    }

    #[test]
    fn partial_tracker_section_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"tracker":{"idle_threshold_ms":5000,"closure_policy":"discard"}}"#).unwrap();
        let tracker = config.tracker_or_default();
        assert_eq!(tracker.idle_threshold_ms, 5_000);
        assert_eq!(tracker.closure_policy, ClosurePolicy::Discard);
        assert_eq!(tracker.mirror_interval_ms, DEFAULT_MIRROR_INTERVAL_MS);
        assert!(config.summary.is_none());
        assert!(config.clio.is_none());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn read_defaults_then_save_and_read_back(_ctx: &mut ConfigTestContext) {
        let missing = Config::read().unwrap();
        assert_eq!(missing, Config::default());

        let config = Config {
            tracker: Some(TrackerConfig {
                user_id: "associate".to_string(),
                idle_threshold_ms: 4_000,
                mirror_interval_ms: 2_000,
                closure_policy: ClosurePolicy::Discard,
            }),
            summary: Some(SummaryConfig {
                api_url: "https://summary.example.com".to_string(),
                auth_token: "token123".to_string(),
            }),
            clio: Some(ClioConfig {
                api_url: "https://app.clio.com".to_string(),
                matter_id: Some(42),
            }),
        };
        config.save().unwrap();
        assert!(DataStorage::new().get_path(CONFIG_FILE_NAME).unwrap().exists());

        let read = Config::read().unwrap();
        assert_eq!(read, config);
        assert_eq!(read.tracker_or_default().user_id, "associate");
    }
}
