//! Compose session data.

use crate::libs::surface::{ComposeSurface, SurfaceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the message being composed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailData {
    pub to: String,
    pub subject: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcc: Option<String>,
}

impl EmailData {
    /// Whatever the surface could read; unread fields are left empty.
    pub fn from_surface(surface: &impl ComposeSurface) -> Self {
        let mut data = Self::default();
        data.overlay(surface);
        data
    }

    /// Copies in the fields the surface could read and keeps the rest.
    pub fn overlay(&mut self, surface: &impl ComposeSurface) {
        let recipients = surface.recipients();
        if let Some(to) = recipients.to {
            self.to = to;
        }
        if let Some(subject) = surface.subject() {
            self.subject = subject;
        }
        if let Some(content) = surface.content() {
            self.content = content;
        }
        if recipients.cc.is_some() {
            self.cc = recipients.cc;
        }
        if recipients.bcc.is_some() {
            self.bcc = recipients.bcc;
        }
    }
}

/// One compose-to-send interval being timed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub session_id: String,
    pub draft_id: SurfaceId,
    pub email_data: EmailData,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: &str, draft_id: SurfaceId, email_data: EmailData, started_at: DateTime<Utc>) -> Self {
        Self {
            session_id: session_id(user_id, &draft_id, started_at),
            draft_id,
            email_data,
            started_at,
        }
    }

    /// Updates the email snapshot with the fields the surface reports.
    pub fn refresh(&mut self, surface: &impl ComposeSurface) {
        self.email_data.overlay(surface);
    }
}

/// Builds a session id from the user id, the start timestamp and the draft.
///
/// The draft suffix keeps ids unique when several drafts open in the same
/// millisecond.
pub fn session_id(user_id: &str, draft_id: &SurfaceId, started_at: DateTime<Utc>) -> String {
    let user = if user_id.trim().is_empty() { "anonymous" } else { user_id.trim() };
    format!("{}_{}_{}", user, started_at.timestamp_millis(), draft_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::surface::SurfaceSnapshot;
    use chrono::Duration;

    #[test]
    fn session_id_combines_user_millis_and_draft() {
        let at = DateTime::<Utc>::UNIX_EPOCH + Duration::milliseconds(1_700_000_000_123);
        let draft = SurfaceId::new("d1");
        assert_eq!(session_id("jane", &draft, at), "jane_1700000000123_d1");
        assert_eq!(session_id("  ", &draft, at), "anonymous_1700000000123_d1");
        assert_ne!(session_id("jane", &draft, at), session_id("jane", &SurfaceId::new("d2"), at));
    }

    #[test]
    fn refresh_replaces_snapshot() {
        let at = DateTime::<Utc>::UNIX_EPOCH;
        let mut session = Session::new("u", SurfaceId::new("d1"), EmailData::default(), at);
        session.refresh(&SurfaceSnapshot::new("a@example.com", "Re: lease", "Hello"));
        assert_eq!(session.email_data.to, "a@example.com");
        assert_eq!(session.email_data.subject, "Re: lease");
        assert_eq!(session.email_data.content, "Hello");
    }

    #[test]
    fn refresh_keeps_fields_the_surface_did_not_report() {
        let at = DateTime::<Utc>::UNIX_EPOCH;
        let opened = EmailData::from_surface(&SurfaceSnapshot::new("a@example.com", "Lease", ""));
        let mut session = Session::new("u", SurfaceId::new("d1"), opened, at);

        session.refresh(&SurfaceSnapshot::content_only("Dear client,"));
        assert_eq!(session.email_data.to, "a@example.com");
        assert_eq!(session.email_data.subject, "Lease");
        assert_eq!(session.email_data.content, "Dear client,");

        // An explicitly cleared subject still overwrites.
        session.refresh(&SurfaceSnapshot {
            subject: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(session.email_data.subject, "");
        assert_eq!(session.email_data.content, "Dear client,");
    }
}
