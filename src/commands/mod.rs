//! Command-line interface.
//!
//! Each subcommand lives in its own module with an `Args` struct and a
//! `cmd` entry point. [`Cli::menu`] parses the arguments and dispatches.

pub mod clear;
pub mod history;
pub mod init;
pub mod status;
pub mod track;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Track compose sessions from an event stream")]
    Track(track::TrackArgs),
    #[command(about = "Show the last mirrored timer status")]
    Status,
    #[command(about = "Display billed sessions for a given date")]
    History(history::HistoryArgs),
    #[command(about = "Remove the mirrored timer status from every store")]
    Clear,
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Track(args) => track::cmd(args).await,
            Commands::Status => status::cmd(),
            Commands::History(args) => history::cmd(args),
            Commands::Clear => clear::cmd(),
        }
    }
}
