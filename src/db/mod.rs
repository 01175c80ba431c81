//! SQLite persistence for billable.
//!
//! Two tables live in `billable.db` in the data directory:
//!
//! - `kv_store`: key/value rows backing the top-ranked status mirror backend
//! - `entries`: one row per finalized session, read by `history`
//!
//! Neither table is ever read back into a running timer.

/// Connection management.
pub mod db;

/// Finalized session history.
pub mod entries;

/// Key/value store used by the persistence mirror.
pub mod status;
