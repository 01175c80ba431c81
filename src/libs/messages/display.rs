//! Display text for [`Message`].
//!
//! Every user-facing string lives here so the wording stays consistent
//! between console output, prompts and table labels.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let s = match self {
            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration deleted".to_string(),
            Message::ConfigNotFound => "No configuration file found, using defaults".to_string(),
            Message::ConfigModuleTracker => "Tracker settings".to_string(),
            Message::ConfigModuleSummary => "Summary service settings".to_string(),
            Message::ConfigModuleClio => "Clio settings".to_string(),
            Message::ClosurePolicySummarize => "Summarize closed drafts".to_string(),
            Message::ClosurePolicyDiscard => "Discard closed drafts".to_string(),
            Message::ClioTokenSaved => "Clio access token stored".to_string(),

            // === PROMPTS ===
            Message::PromptSelectModules => "Select modules to configure (space to toggle)".to_string(),
            Message::PromptUserId => "User id for session ids".to_string(),
            Message::PromptIdleThreshold => "Idle threshold (ms)".to_string(),
            Message::PromptMirrorInterval => "Status mirror interval (ms)".to_string(),
            Message::PromptClosurePolicy => "What should happen when a draft is closed without sending?".to_string(),
            Message::PromptSummaryApiUrl => "Summary API URL".to_string(),
            Message::PromptSummaryAuthToken => "Summary API token".to_string(),
            Message::PromptClioApiUrl => "Clio API URL".to_string(),
            Message::PromptClioMatterId => "Default Clio matter id (empty for none)".to_string(),
            Message::PromptClioToken => "Clio access token".to_string(),

            // === TRACKING MESSAGES ===
            Message::TrackingStarted { surface, session_id } => {
                format!("Tracking draft {} (session {})", surface, session_id)
            }
            Message::TrackingPaused(surface) => format!("Draft {} went idle, timer paused", surface),
            Message::SurfaceUnreadable(surface) => format!("Compose surface {} is not readable yet", surface),
            Message::SessionFinalized { session_id, reason, elapsed } => {
                format!("Session {} {} after {}", session_id, reason, elapsed)
            }
            Message::FinalizeDropped => "Billing consumer is gone, finalized session dropped".to_string(),
            Message::MonitorShuttingDown => "Shutting down, stopping open sessions".to_string(),
            Message::ReadingEvents(source) => format!("Reading compose events from {}", source),
            Message::InvalidEventLine(line, error) => format!("Skipping invalid event on line {}: {}", line, error),
            Message::EventFileNotFound(path) => format!("Event file not found: {}", path),
            Message::EventReaderFailed(error) => format!("Event stream failed: {}", error),
            Message::TrackSummary {
                events,
                started,
                finalized,
                pauses,
            } => format!(
                "Processed {} events: {} sessions started, {} finalized, {} idle pauses",
                events, started, finalized, pauses
            ),
            Message::DryRun => "Dry run: summaries and billing are skipped".to_string(),

            // === STORAGE MESSAGES ===
            Message::StoreUnavailable { store, error } => format!("Storage backend {} unavailable: {}", store, error),
            Message::NoStorageBackends => "No storage backend could be opened".to_string(),
            Message::MirrorCleared(count) => format!("Timer status cleared from {} backend(s)", count),
            Message::NoStatusRecorded => "No timer status recorded".to_string(),

            // === BILLING MESSAGES ===
            Message::SummaryFallback(error) => format!("Summary service failed ({}), using template summary", error),
            Message::SummaryServiceUnavailable(error) => {
                format!("Summary service unavailable ({}), using template summaries", error)
            }
            Message::HistoryWriteFailed(error) => format!("Failed to record session history: {}", error),
            Message::HistoryUnavailable(error) => format!("Session history unavailable: {}", error),
            Message::ClioLogged(id) => format!("Time entry logged to Clio ({})", id),
            Message::ClioLogFailed(error) => format!("Failed to log time entry to Clio: {}", error),
            Message::ClioUnavailable(error) => format!("Clio logging disabled: {}", error),

            // === HISTORY MESSAGES ===
            Message::HistoryHeader(date) => format!("Billable sessions for {}", date),
            Message::NoEntriesForDate(date) => format!("No sessions recorded for {}", date),
            Message::InvalidDate(date) => format!("Invalid date '{}', expected YYYY-MM-DD or 'today'", date),

            // === TABLE LABELS ===
            Message::StatusStateLabel => "STATE".to_string(),
            Message::StatusSessionLabel => "SESSION".to_string(),
            Message::StatusElapsedLabel => "ELAPSED".to_string(),
            Message::StatusUpdatedLabel => "UPDATED".to_string(),
            Message::StatusIdle => "idle".to_string(),
            Message::StatusActive => "tracking".to_string(),
            Message::StatusPaused => "paused".to_string(),
            Message::ReasonLabel => "REASON".to_string(),
            Message::RecipientLabel => "TO".to_string(),
            Message::SubjectLabel => "SUBJECT".to_string(),
            Message::BillableLabel => "BILLABLE".to_string(),
            Message::SummaryLabel => "SUMMARY".to_string(),
            Message::TotalLabel => "TOTAL".to_string(),
        };
        write!(f, "{}", s)
    }
}
