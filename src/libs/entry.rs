//! Billing history entries and their table formatting.

use crate::libs::formatter::{format_billable, format_duration};
use crate::libs::tracker::FinalizedSession;
use chrono::{DateTime, Duration, Local, Utc};

/// A finalized session as recorded in the history.
#[derive(Debug, Clone, PartialEq)]
pub struct BillingEntry {
    pub id: Option<i64>,
    pub session_id: String,
    pub draft_id: String,
    pub recipient: String,
    pub subject: String,
    /// `sent`, `closed` or `stopped`.
    pub reason: String,
    pub elapsed_ms: i64,
    pub summary: Option<String>,
    /// Id of the Clio time entry, when one was created.
    pub clio_id: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BillingEntry {
    pub fn from_session(session: &FinalizedSession, summary: Option<String>) -> Self {
        Self {
            id: None,
            session_id: session.session_id.clone(),
            draft_id: session.draft_id.to_string(),
            recipient: session.email_data.to.clone(),
            subject: session.email_data.subject.clone(),
            reason: session.reason.as_str().to_string(),
            elapsed_ms: session.elapsed_ms(),
            summary,
            clio_id: None,
            started_at: session.started_at,
            finished_at: session.finished_at,
        }
    }

    pub fn elapsed(&self) -> Duration {
        Duration::milliseconds(self.elapsed_ms)
    }
}

/// Display-ready row of the history table.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedEntry {
    pub id: i64,
    pub finished: String,
    pub recipient: String,
    pub subject: String,
    pub reason: String,
    pub elapsed: String,
    pub billable: String,
    pub clio: String,
}

pub trait EntryGroup {
    fn format(&self) -> Vec<FormattedEntry>;
    fn total_elapsed(&self) -> Duration;
}

impl EntryGroup for Vec<BillingEntry> {
    fn format(&self) -> Vec<FormattedEntry> {
        self.iter()
            .enumerate()
            .map(|(index, e)| FormattedEntry {
                id: e.id.unwrap_or((index + 1) as i64),
                finished: e.finished_at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
                recipient: e.recipient.clone(),
                subject: e.subject.clone(),
                reason: e.reason.clone(),
                elapsed: format_duration(&e.elapsed()),
                billable: format_billable(&e.elapsed()),
                clio: e.clio_id.clone().unwrap_or_else(|| "-".to_string()),
            })
            .collect()
    }

    fn total_elapsed(&self) -> Duration {
        self.iter().fold(Duration::zero(), |acc, e| acc + e.elapsed())
    }
}
