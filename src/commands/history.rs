use crate::db::entries::Entries;
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::{msg_error_anyhow, msg_info, msg_print};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Args;

#[derive(Debug, Args)]
pub struct HistoryArgs {
    #[arg(long, short, default_value = "today", help = "Date to list sessions for (YYYY-MM-DD or 'today')")]
    date: String,
}

pub fn cmd(args: HistoryArgs) -> Result<()> {
    let date = parse_date(&args.date)?;
    let entries = Entries::new()?.fetch(date)?;
    let label = date.format("%B %-d, %Y").to_string();

    if entries.is_empty() {
        msg_info!(Message::NoEntriesForDate(label));
        return Ok(());
    }

    msg_print!(Message::HistoryHeader(label), true);
    View::entries(&entries);
    Ok(())
}

pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    if date_str.eq_ignore_ascii_case("today") {
        return Ok(Local::now().date_naive());
    }
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| msg_error_anyhow!(Message::InvalidDate(date_str.to_string())))
}
