//! What happens to a session after it is finalized.
//!
//! For every [`FinalizedSession`] the pipeline:
//!
//! 1. decides from the closure policy whether it is billed at all,
//! 2. asks the summary service for narrative text, falling back to
//!    [`TemplateSummary`] when the service fails,
//! 3. records the session in the history,
//! 4. sends a time entry to the billing logger, if one is configured.
//!
//! None of these steps can fail the pipeline. Errors are reported as
//! warnings and the outcome records what did happen.

use crate::api::summary::{HttpSummaryService, SummaryRequest, TemplateSummary};
use crate::api::{ApiError, SummaryService, TimeEntry, TimeEntryLogger};
use crate::db::entries::Entries;
use crate::libs::config::ClosurePolicy;
use crate::libs::entry::BillingEntry;
use crate::libs::messages::Message;
use crate::libs::tracker::FinalizedSession;
use crate::msg_warning;

/// Summary source chosen from configuration.
pub enum SummaryBackend {
    Http(HttpSummaryService),
    Template(TemplateSummary),
}

impl SummaryService for SummaryBackend {
    async fn generate(&self, request: &SummaryRequest) -> Result<String, ApiError> {
        match self {
            SummaryBackend::Http(service) => service.generate(request).await,
            SummaryBackend::Template(service) => service.generate(request).await,
        }
    }
}

/// Logger that rejects every entry. Fills the logger type parameter of a
/// pipeline that never calls `with_logger`.
pub struct NoLogger;

impl TimeEntryLogger for NoLogger {
    async fn log(&self, _entry: &TimeEntry) -> Result<String, ApiError> {
        Err(ApiError::NotConfigured("billing logger"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySource {
    Service,
    Fallback,
    /// Closure policy skipped summary generation.
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BillingOutcome {
    pub session: FinalizedSession,
    pub summary: Option<String>,
    pub source: SummarySource,
    pub clio_id: Option<String>,
    pub recorded: bool,
}

pub struct BillingPipeline<S: SummaryService, L: TimeEntryLogger> {
    summary: S,
    logger: Option<L>,
    entries: Option<Entries>,
    policy: ClosurePolicy,
    matter_id: Option<u64>,
}

impl<S: SummaryService, L: TimeEntryLogger> BillingPipeline<S, L> {
    pub fn new(summary: S, policy: ClosurePolicy) -> Self {
        Self {
            summary,
            logger: None,
            entries: None,
            policy,
            matter_id: None,
        }
    }

    pub fn with_logger(mut self, logger: L, matter_id: Option<u64>) -> Self {
        self.logger = Some(logger);
        self.matter_id = matter_id;
        self
    }

    pub fn with_history(mut self, entries: Entries) -> Self {
        self.entries = Some(entries);
        self
    }

    pub async fn process(&self, session: FinalizedSession) -> BillingOutcome {
        if !session.wants_summary(self.policy) {
            let recorded = self.record(&session, None);
            return BillingOutcome {
                session,
                summary: None,
                source: SummarySource::Skipped,
                clio_id: None,
                recorded,
            };
        }

        let request = SummaryRequest::from(&session);
        let (summary, source) = match self.summary.generate(&request).await {
            Ok(text) => (text, SummarySource::Service),
            Err(e) => {
                msg_warning!(Message::SummaryFallback(e.to_string()));
                (TemplateSummary::render(&request), SummarySource::Fallback)
            }
        };

        let recorded = self.record(&session, Some(summary.clone()));
        let clio_id = self.log_time(&session, &summary).await;

        BillingOutcome {
            session,
            summary: Some(summary),
            source,
            clio_id,
            recorded,
        }
    }

    fn record(&self, session: &FinalizedSession, summary: Option<String>) -> bool {
        let Some(entries) = &self.entries else {
            return false;
        };
        match entries.insert(&BillingEntry::from_session(session, summary)) {
            Ok(_) => true,
            Err(e) => {
                msg_warning!(Message::HistoryWriteFailed(e.to_string()));
                false
            }
        }
    }

    async fn log_time(&self, session: &FinalizedSession, summary: &str) -> Option<String> {
        let logger = self.logger.as_ref()?;
        let entry = TimeEntry::from_session(session, summary, self.matter_id);
        match logger.log(&entry).await {
            Ok(id) => {
                if let Some(entries) = &self.entries {
                    if let Err(e) = entries.set_clio_id(&session.session_id, &id) {
                        msg_warning!(Message::HistoryWriteFailed(e.to_string()));
                    }
                }
                Some(id)
            }
            Err(e) => {
                msg_warning!(Message::ClioLogFailed(e.to_string()));
                None
            }
        }
    }
}
