use super::entry::{EntryGroup, FormattedEntry};
use super::formatter::{format_billable, format_duration, format_millis};
use super::mirror::MirrorStatus;
use crate::libs::entry::BillingEntry;
use crate::libs::messages::Message;
use crate::libs::tracker::FinalizedSession;
use prettytable::{row, Table};

/// Longest subject shown in the history table.
const SUBJECT_WIDTH: usize = 40;

pub struct View {}

impl View {
    pub fn entries(entries: &Vec<BillingEntry>) {
        let mut table = Table::new();
        table.add_row(row!["ID", "FINISHED", "TO", "SUBJECT", "REASON", "ELAPSED", "BILLABLE", "CLIO"]);
        for FormattedEntry {
            id,
            finished,
            recipient,
            subject,
            reason,
            elapsed,
            billable,
            clio,
        } in entries.format()
        {
            table.add_row(row![id, finished, recipient, truncate(&subject, SUBJECT_WIDTH), reason, elapsed, billable, clio]);
        }
        let total = entries.total_elapsed();
        table.add_row(row!["", "", "", "", Message::TotalLabel, format_duration(&total), format_billable(&total), ""]);
        table.printstd();
    }

    pub fn status(status: &MirrorStatus) {
        let mut table = Table::new();
        let state = match (status.is_tracking, status.is_paused) {
            (false, _) => Message::StatusIdle,
            (true, true) => Message::StatusPaused,
            (true, false) => Message::StatusActive,
        };
        table.add_row(row![Message::StatusStateLabel, state]);
        table.add_row(row![Message::StatusSessionLabel, status.session_id.as_deref().unwrap_or("-")]);
        table.add_row(row![Message::StatusElapsedLabel, format_millis(status.current_elapsed_ms)]);
        if let Some(updated_at) = status.updated_at {
            table.add_row(row![
                Message::StatusUpdatedLabel,
                updated_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S")
            ]);
        }
        table.printstd();
    }

    pub fn finalized(session: &FinalizedSession, summary: Option<&str>) {
        let mut table = Table::new();
        table.add_row(row![Message::StatusSessionLabel, session.session_id]);
        table.add_row(row![Message::ReasonLabel, session.reason.as_str()]);
        table.add_row(row![Message::RecipientLabel, session.email_data.to]);
        table.add_row(row![Message::SubjectLabel, session.email_data.subject]);
        table.add_row(row![Message::StatusElapsedLabel, format_duration(&session.elapsed)]);
        table.add_row(row![Message::BillableLabel, format_billable(&session.elapsed)]);
        if let Some(summary) = summary {
            table.add_row(row![Message::SummaryLabel, summary]);
        }
        table.printstd();
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", cut)
}
