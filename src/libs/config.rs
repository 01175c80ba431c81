//! Configuration management for billable.
//!
//! Settings are stored as pretty-printed JSON in the platform data directory
//! (see [`DataStorage`]). Each module is optional so a fresh install runs
//! with nothing but defaults:
//!
//! - **Tracker**: idle threshold, mirror throttle, closure policy, user id
//! - **Summary**: endpoint of the summary generation service
//! - **Clio**: practice-management endpoint and matter for time entries
//!
//! Secrets (the Clio access token) are never written here; they go through
//! [`crate::libs::secret::Secret`].
//!
//! ```rust,no_run
//! use billable::libs::config::Config;
//!
//! let config = Config::read()?;
//! let tracker = config.tracker.unwrap_or_default();
//! println!("pausing after {} ms", tracker.idle_threshold_ms);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::api::clio::ClioConfig;
use crate::api::summary::SummaryConfig;
use crate::libs::activity::DEFAULT_IDLE_THRESHOLD_MS;
use crate::libs::messages::Message;
use crate::libs::mirror::DEFAULT_MIRROR_INTERVAL_MS;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// A configurable module shown in the setup wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

/// What happens to a session that ends without a send.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClosurePolicy {
    /// Closed and stopped sessions are summarized and billed like sent ones.
    #[default]
    Summarize,
    /// Closed and stopped sessions are reported but skip summary and billing.
    Discard,
}

/// Composition timer settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Identifier mixed into session ids.
    pub user_id: String,

    /// Milliseconds without input before the timer pauses.
    ///
    /// One value is used for every entry point. The default is
    /// [`DEFAULT_IDLE_THRESHOLD_MS`].
    pub idle_threshold_ms: u64,

    /// Minimum milliseconds between unforced status mirror writes.
    pub mirror_interval_ms: u64,

    pub closure_policy: ClosurePolicy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            user_id: std::env::var("USER").or_else(|_| std::env::var("USERNAME")).unwrap_or_else(|_| "anonymous".to_string()),
            idle_threshold_ms: DEFAULT_IDLE_THRESHOLD_MS,
            mirror_interval_ms: DEFAULT_MIRROR_INTERVAL_MS,
            closure_policy: ClosurePolicy::Summarize,
        }
    }
}

/// Root configuration container.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker: Option<TrackerConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub clio: Option<ClioConfig>,
}

impl Config {
    /// Loads the configuration, or defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Tracker settings with defaults filled in.
    pub fn tracker_or_default(&self) -> TrackerConfig {
        self.tracker.clone().unwrap_or_default()
    }

    /// Interactive setup wizard, pre-filled with the current values.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = vec![
            ConfigModule {
                key: "tracker".to_string(),
                name: "Tracker".to_string(),
            },
            SummaryConfig::module(),
            ClioConfig::module(),
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "tracker" => config.tracker = Some(TrackerConfig::init(&config.tracker)?),
                "summary" => config.summary = Some(SummaryConfig::init(&config.summary)?),
                "clio" => config.clio = Some(ClioConfig::init(&config.clio)?),
                _ => {}
            }
        }

        Ok(config)
    }
}

impl TrackerConfig {
    pub fn init(current: &Option<Self>) -> Result<Self> {
        let default = current.clone().unwrap_or_default();
        msg_print!(Message::ConfigModuleTracker);

        let policies = [ClosurePolicy::Summarize, ClosurePolicy::Discard];
        let policy_index = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptClosurePolicy.to_string())
            .items(&[Message::ClosurePolicySummarize.to_string(), Message::ClosurePolicyDiscard.to_string()])
            .default(policies.iter().position(|p| *p == default.closure_policy).unwrap_or(0))
            .interact()?;

        Ok(TrackerConfig {
            user_id: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptUserId.to_string())
                .default(default.user_id)
                .interact_text()?,
            idle_threshold_ms: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptIdleThreshold.to_string())
                .default(default.idle_threshold_ms)
                .interact_text()?,
            mirror_interval_ms: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptMirrorInterval.to_string())
                .default(default.mirror_interval_ms)
                .interact_text()?,
            closure_policy: policies[policy_index],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_config_fills_missing_fields() {
        let parsed: TrackerConfig = serde_json::from_str(r#"{"user_id":"jane","closure_policy":"discard"}"#).unwrap();
        assert_eq!(parsed.user_id, "jane");
        assert_eq!(parsed.idle_threshold_ms, 3_000);
        assert_eq!(parsed.mirror_interval_ms, 5_000);
        assert_eq!(parsed.closure_policy, ClosurePolicy::Discard);
    }
}
