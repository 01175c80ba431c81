//! Database operations for the billing history.
//!
//! Each finalized session is stored once, keyed by its session id. The Clio
//! id is filled in afterwards when the time entry is accepted.
//!
//! ```rust,no_run
//! use billable::db::entries::Entries;
//! use chrono::Local;
//!
//! let entries = Entries::new()?;
//! let today = entries.fetch(Local::now().date_naive())?;
//! println!("{} sessions today", today.len());
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::db::db::Db;
use crate::libs::entry::BillingEntry;
use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::Arc;

const SCHEMA_ENTRIES: &str = "CREATE TABLE IF NOT EXISTS entries (
    id INTEGER NOT NULL PRIMARY KEY,
    session_id TEXT NOT NULL UNIQUE,
    draft_id TEXT NOT NULL,
    recipient TEXT NOT NULL,
    subject TEXT NOT NULL,
    reason TEXT NOT NULL,
    elapsed_ms INTEGER NOT NULL,
    summary TEXT,
    clio_id TEXT,
    started_at TIMESTAMP NOT NULL,
    finished_at TIMESTAMP NOT NULL
)";

const INSERT_ENTRY: &str = "INSERT INTO entries
    (session_id, draft_id, recipient, subject, reason, elapsed_ms, summary, clio_id, started_at, finished_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
    ON CONFLICT(session_id) DO UPDATE SET summary = excluded.summary, elapsed_ms = excluded.elapsed_ms";

const UPDATE_CLIO_ID: &str = "UPDATE entries SET clio_id = ?1 WHERE session_id = ?2";

const SELECT_ENTRIES: &str = "SELECT id, session_id, draft_id, recipient, subject, reason, elapsed_ms, summary, clio_id, started_at, finished_at
    FROM entries ORDER BY finished_at";

const SELECT_ENTRY_BY_SESSION: &str = "SELECT id, session_id, draft_id, recipient, subject, reason, elapsed_ms, summary, clio_id, started_at, finished_at
    FROM entries WHERE session_id = ?1";

const DELETE_ENTRY: &str = "DELETE FROM entries WHERE id = ?1";

pub struct Entries {
    pub conn: Arc<Mutex<Connection>>,
}

impl Entries {
    pub fn new() -> Result<Entries> {
        Self::from_db(Db::new()?)
    }

    pub fn open(path: &Path) -> Result<Entries> {
        Self::from_db(Db::open(path)?)
    }

    fn from_db(db: Db) -> Result<Entries> {
        db.conn.execute(SCHEMA_ENTRIES, [])?;
        Ok(Entries {
            conn: Arc::new(Mutex::new(db.conn)),
        })
    }

    /// Inserts an entry. Re-inserting the same session updates its summary
    /// and elapsed time instead of duplicating the row.
    pub fn insert(&self, entry: &BillingEntry) -> Result<i64> {
        let conn = self.conn.lock();
        conn.execute(
            INSERT_ENTRY,
            params![
                entry.session_id,
                entry.draft_id,
                entry.recipient,
                entry.subject,
                entry.reason,
                entry.elapsed_ms,
                entry.summary,
                entry.clio_id,
                entry.started_at,
                entry.finished_at,
            ],
        )?;
        let id = conn.query_row("SELECT id FROM entries WHERE session_id = ?1", params![entry.session_id], |row| row.get(0))?;
        Ok(id)
    }

    pub fn set_clio_id(&self, session_id: &str, clio_id: &str) -> Result<bool> {
        let conn = self.conn.lock();
        Ok(conn.execute(UPDATE_CLIO_ID, params![clio_id, session_id])? > 0)
    }

    pub fn fetch_by_session(&self, session_id: &str) -> Result<Option<BillingEntry>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(SELECT_ENTRY_BY_SESSION)?;
        let mut rows = stmt.query_map(params![session_id], Self::map_row)?;
        Ok(rows.next().transpose()?)
    }

    pub fn fetch_all(&self) -> Result<Vec<BillingEntry>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(SELECT_ENTRIES)?;
        let entries = stmt.query_map([], Self::map_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Entries finished on `date` in local time.
    pub fn fetch(&self, date: NaiveDate) -> Result<Vec<BillingEntry>> {
        Ok(self
            .fetch_all()?
            .into_iter()
            .filter(|e| e.finished_at.with_timezone(&Local).date_naive() == date)
            .collect())
    }

    pub fn delete(&self, id: i64) -> Result<usize> {
        let conn = self.conn.lock();
        Ok(conn.execute(DELETE_ENTRY, params![id])?)
    }

    fn map_row(row: &Row) -> rusqlite::Result<BillingEntry> {
        Ok(BillingEntry {
            id: Some(row.get(0)?),
            session_id: row.get(1)?,
            draft_id: row.get(2)?,
            recipient: row.get(3)?,
            subject: row.get(4)?,
            reason: row.get(5)?,
            elapsed_ms: row.get(6)?,
            summary: row.get(7)?,
            clio_id: row.get(8)?,
            started_at: row.get::<_, DateTime<Utc>>(9)?,
            finished_at: row.get::<_, DateTime<Utc>>(10)?,
        })
    }
}
