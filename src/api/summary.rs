//! Billing summary generation.
//!
//! [`HttpSummaryService`] posts the session to a summary endpoint (an AI
//! backend) and reads back narrative text. [`TemplateSummary`] builds a plain
//! narrative locally; it is used when no endpoint is configured and as the
//! fallback when the endpoint fails.

use super::{check_status, ApiError, SummaryService, REQUEST_TIMEOUT_SECS};
use crate::libs::config::ConfigModule;
use crate::libs::formatter::{billable_hours, format_duration};
use crate::libs::messages::Message;
use crate::libs::tracker::FinalizedSession;
use crate::msg_print;
use anyhow::Result;
use chrono::Duration;
use dialoguer::{theme::ColorfulTheme, Input};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const SUMMARY_URL: &str = "api/summary";

/// Longest body excerpt quoted in a template summary.
const EXCERPT_CHARS: usize = 160;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SummaryConfig {
    pub api_url: String,
    #[serde(default)]
    pub auth_token: String,
}

impl SummaryConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "summary".to_string(),
            name: "Summary service".to_string(),
        }
    }

    pub fn init(current: &Option<Self>) -> Result<Self> {
        let default = current.clone().unwrap_or(SummaryConfig {
            api_url: "http://localhost:3000".to_string(),
            auth_token: String::new(),
        });
        msg_print!(Message::ConfigModuleSummary);
        Ok(SummaryConfig {
            api_url: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptSummaryApiUrl.to_string())
                .default(default.api_url)
                .interact_text()?,
            auth_token: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptSummaryAuthToken.to_string())
                .default(default.auth_token)
                .allow_empty(true)
                .interact_text()?,
        })
    }
}

/// Input contract of the summary service.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub to: String,
    pub subject: String,
    pub content: String,
    pub elapsed_time_ms: i64,
}

impl From<&FinalizedSession> for SummaryRequest {
    fn from(session: &FinalizedSession) -> Self {
        Self {
            to: session.email_data.to.clone(),
            subject: session.email_data.subject.clone(),
            content: session.email_data.content.clone(),
            elapsed_time_ms: session.elapsed_ms(),
        }
    }
}

#[derive(Deserialize)]
struct SummaryResponse {
    summary: Option<String>,
}

pub struct HttpSummaryService {
    client: Client,
    config: SummaryConfig,
}

impl HttpSummaryService {
    pub fn new(config: &SummaryConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS)).build()?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn url(&self) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), SUMMARY_URL)
    }
}

impl SummaryService for HttpSummaryService {
    async fn generate(&self, request: &SummaryRequest) -> Result<String, ApiError> {
        let mut builder = self.client.post(self.url()).json(request);
        if !self.config.auth_token.is_empty() {
            builder = builder.bearer_auth(&self.config.auth_token);
        }
        let response = check_status(builder.send().await?).await?;
        let body: SummaryResponse = response.json().await?;
        body.summary.filter(|s| !s.trim().is_empty()).ok_or(ApiError::MissingField("summary"))
    }
}

/// Local narrative built from the session itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateSummary;

impl TemplateSummary {
    pub fn render(request: &SummaryRequest) -> String {
        let elapsed = Duration::milliseconds(request.elapsed_time_ms);
        let recipient = if request.to.trim().is_empty() { "(no recipient)" } else { request.to.trim() };
        let subject = if request.subject.trim().is_empty() { "(no subject)" } else { request.subject.trim() };

        let mut summary = format!(
            "Drafted and sent email correspondence to {} regarding \"{}\". Time spent: {} ({:.1} h).",
            recipient,
            subject,
            format_duration(&elapsed),
            billable_hours(&elapsed)
        );

        let excerpt = excerpt(&request.content);
        if !excerpt.is_empty() {
            summary.push_str(&format!(" Summary of content: {}", excerpt));
        }
        summary
    }
}

impl SummaryService for TemplateSummary {
    async fn generate(&self, request: &SummaryRequest) -> Result<String, ApiError> {
        Ok(Self::render(request))
    }
}

/// First sentence of `content`, whitespace-collapsed and cut at
/// [`EXCERPT_CHARS`].
fn excerpt(content: &str) -> String {
    let collapsed = content.split_whitespace().collect::<Vec<_>>().join(" ");
    let sentence = match collapsed.find(['.', '!', '?']) {
        Some(end) => &collapsed[..=end],
        None => collapsed.as_str(),
    };
    if sentence.chars().count() <= EXCERPT_CHARS {
        return sentence.to_string();
    }
    let cut: String = sentence.chars().take(EXCERPT_CHARS).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(content: &str) -> SummaryRequest {
        SummaryRequest {
            to: "client@example.com".to_string(),
            subject: "Lease renewal".to_string(),
            content: content.to_string(),
            elapsed_time_ms: 240_000,
        }
    }

    #[test]
    fn template_mentions_recipient_subject_and_time() {
        let text = TemplateSummary::render(&request("Please review the attached draft.   It is due Friday."));
        assert!(text.contains("client@example.com"));
        assert!(text.contains("\"Lease renewal\""));
        assert!(text.contains("00:04:00"));
        assert!(text.contains("(0.1 h)"));
        assert!(text.ends_with("Summary of content: Please review the attached draft."));
    }

    #[test]
    fn excerpt_is_truncated() {
        let long = "word ".repeat(100);
        let cut = excerpt(&long);
        assert!(cut.ends_with('…'));
        assert!(cut.chars().count() <= EXCERPT_CHARS + 1);
    }

    #[test]
    fn empty_fields_have_placeholders() {
        let text = TemplateSummary::render(&SummaryRequest {
            to: String::new(),
            subject: " ".to_string(),
            content: String::new(),
            elapsed_time_ms: 0,
        });
        assert!(text.contains("(no recipient)"));
        assert!(text.contains("(no subject)"));
        assert!(!text.contains("Summary of content"));
    }
}
