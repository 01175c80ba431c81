//! Clio time-entry logging.
//!
//! A finished session becomes a `TimeEntry` activity in Clio. The access
//! token is obtained outside this tool (OAuth is not handled here) and kept
//! encrypted in the data directory via [`Secret`].

use super::{check_status, ApiError, TimeEntryLogger, REQUEST_TIMEOUT_SECS};
use crate::libs::config::ConfigModule;
use crate::libs::messages::Message;
use crate::libs::secret::Secret;
use crate::libs::tracker::FinalizedSession;
use crate::{msg_print, msg_success};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use dialoguer::{theme::ColorfulTheme, Input};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

const ACTIVITIES_URL: &str = "api/v4/activities.json";
const TOKEN_FILE: &str = ".clio_token";
const DEFAULT_API_URL: &str = "https://app.clio.com";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ClioConfig {
    pub api_url: String,
    /// Matter the time entries are filed under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matter_id: Option<u64>,
}

impl ClioConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "clio".to_string(),
            name: "Clio".to_string(),
        }
    }

    pub fn init(current: &Option<Self>) -> Result<Self> {
        let default = current.clone().unwrap_or(ClioConfig {
            api_url: DEFAULT_API_URL.to_string(),
            matter_id: None,
        });
        msg_print!(Message::ConfigModuleClio);

        let api_url: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptClioApiUrl.to_string())
            .default(default.api_url)
            .interact_text()?;
        let matter: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptClioMatterId.to_string())
            .default(default.matter_id.map(|id| id.to_string()).unwrap_or_default())
            .allow_empty(true)
            .interact_text()?;

        // Storing the token now saves a prompt in the middle of `track`.
        Self::token_secret().prompt()?;
        msg_success!(Message::ClioTokenSaved);

        Ok(ClioConfig {
            api_url,
            matter_id: matter.trim().parse().ok(),
        })
    }

    pub fn token_secret() -> Secret {
        Secret::new(TOKEN_FILE, &Message::PromptClioToken.to_string())
    }
}

/// A time entry ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeEntry {
    pub date: NaiveDate,
    /// Exact duration in seconds.
    pub quantity_secs: i64,
    pub note: String,
    pub matter_id: Option<u64>,
}

impl TimeEntry {
    pub fn from_session(session: &FinalizedSession, summary: &str, matter_id: Option<u64>) -> Self {
        Self {
            date: session.finished_at.with_timezone(&Local).date_naive(),
            quantity_secs: session.elapsed.num_seconds().max(0),
            note: summary.to_string(),
            matter_id,
        }
    }

    pub fn to_payload(&self) -> Value {
        let mut data = json!({
            "type": "TimeEntry",
            "date": self.date.format("%Y-%m-%d").to_string(),
            "quantity": self.quantity_secs,
            "note": self.note,
        });
        if let Some(matter_id) = self.matter_id {
            data["matter"] = json!({ "id": matter_id });
        }
        json!({ "data": data })
    }
}

pub struct ClioClient {
    client: Client,
    config: ClioConfig,
    token: String,
}

impl ClioClient {
    pub fn new(config: &ClioConfig, token: &str) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS)).build()?;
        Ok(Self {
            client,
            config: config.clone(),
            token: token.to_string(),
        })
    }

    /// Builds a client with the stored token. Fails without prompting when
    /// no token has been saved.
    pub fn from_stored_token(config: &ClioConfig) -> Result<Self> {
        let token = Self::stored_token()?;
        Ok(Self::new(config, &token)?)
    }

    fn stored_token() -> Result<String> {
        ClioConfig::token_secret().get().map_err(|_| ApiError::NotConfigured("Clio access token").into())
    }

    fn url(&self) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), ACTIVITIES_URL)
    }
}

impl TimeEntryLogger for ClioClient {
    async fn log(&self, entry: &TimeEntry) -> Result<String, ApiError> {
        let response = self.client.post(self.url()).bearer_auth(&self.token).json(&entry.to_payload()).send().await?;
        let body: Value = check_status(response).await?.json().await?;
        body["data"]["id"]
            .as_u64()
            .map(|id| id.to_string())
            .or_else(|| body["data"]["id"].as_str().map(str::to_string))
            .ok_or(ApiError::MissingField("data.id"))
    }
}
