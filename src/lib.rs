//! # Billable - activity timer for email composition
//!
//! Measures how long a user actively works on each email draft and turns
//! every finished draft into a billable time entry.
//!
//! ## Features
//!
//! - **Activity Timer**: Per-draft timer that pauses after a stretch of
//!   inactivity and resumes on the next keystroke
//! - **Session Lifecycle**: Sessions start when a compose surface opens and
//!   end on send, close or explicit stop
//! - **Status Mirror**: Live timer status written to SQLite, a JSON file or
//!   memory, whichever works first
//! - **Billing**: Narrative summaries and Clio time entries for finished
//!   sessions, with a local history
//!
//! ## Usage
//!
//! ```rust,no_run
//! use billable::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod db;
pub mod libs;
