//! Runs the compose monitor over an event stream.
//!
//! Three futures run side by side on the current task:
//!
//! - the reader, which parses JSON lines from stdin or `--file`,
//! - the [`ComposeMonitor`], which owns every timer,
//! - the billing consumer, which summarizes and logs finalized sessions.
//!
//! The stream ending or Ctrl-C stops all open sessions. Those sessions are
//! still billed before the command returns.

use crate::api::clio::ClioClient;
use crate::api::summary::{HttpSummaryService, TemplateSummary};
use crate::db::entries::Entries;
use crate::libs::billing::{BillingPipeline, SummaryBackend};
use crate::libs::clock::SystemClock;
use crate::libs::config::Config;
use crate::libs::formatter::format_duration;
use crate::libs::messages::Message;
use crate::libs::mirror::PersistenceMirror;
use crate::libs::monitor::{read_events, ComposeMonitor, CHANNEL_CAPACITY};
use crate::libs::stores::ranked_backends;
use crate::libs::tracker::{FinalizedSession, SessionTracker};
use crate::libs::view::View;
use crate::{msg_bail_anyhow, msg_error, msg_info, msg_success, msg_warning};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, BufReader};
use tokio::sync::{mpsc, watch};

#[derive(Debug, Args)]
pub struct TrackArgs {
    /// Read events from a file instead of stdin
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// Track sessions without generating summaries or logging time
    #[arg(long)]
    dry_run: bool,
}

pub async fn cmd(args: TrackArgs) -> Result<()> {
    let config = Config::read()?;
    let tracker_config = config.tracker_or_default();

    let reader = open_events(&args.file).await?;
    let pipeline = if args.dry_run {
        msg_info!(Message::DryRun);
        None
    } else {
        Some(build_pipeline(&config))
    };

    let tracker = SessionTracker::new(SystemClock, tracker_config.clone());
    let mirror = PersistenceMirror::new(ranked_backends(), tracker_config.mirror_interval_ms);
    let (event_tx, event_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (finalized_tx, finalized_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let monitor = ComposeMonitor::new(tracker, mirror, finalized_tx);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    let reader_shutdown = shutdown_rx.clone();
    let reading = async move {
        tokio::select! {
            result = read_events(reader, event_tx) => result,
            _ = wait_for_shutdown(reader_shutdown) => Ok(0),
        }
    };
    let monitoring = monitor.run(event_rx, wait_for_shutdown(shutdown_rx));
    let billing = consume(finalized_rx, pipeline);

    let (read_result, monitor_result, _) = tokio::join!(reading, monitoring, billing);
    if let Err(e) = read_result {
        msg_error!(Message::EventReaderFailed(e.to_string()));
    }
    let report = monitor_result?;
    msg_info!(Message::TrackSummary {
        events: report.events,
        started: report.started,
        finalized: report.finalized,
        pauses: report.pauses,
    });
    Ok(())
}

async fn open_events(file: &Option<PathBuf>) -> Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    match file {
        Some(path) => {
            if !path.exists() {
                msg_bail_anyhow!(Message::EventFileNotFound(path.display().to_string()));
            }
            msg_info!(Message::ReadingEvents(path.display().to_string()));
            Ok(Box::new(BufReader::new(File::open(path).await?)))
        }
        None => {
            msg_info!(Message::ReadingEvents("stdin".to_string()));
            Ok(Box::new(BufReader::new(tokio::io::stdin())))
        }
    }
}

/// Resolves once Ctrl-C was seen. Never resolves if the signal handler
/// could not be installed.
async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}

fn build_pipeline(config: &Config) -> BillingPipeline<SummaryBackend, ClioClient> {
    let tracker = config.tracker_or_default();

    let summary = match &config.summary {
        Some(summary_config) => match HttpSummaryService::new(summary_config) {
            Ok(service) => SummaryBackend::Http(service),
            Err(e) => {
                msg_warning!(Message::SummaryServiceUnavailable(e.to_string()));
                SummaryBackend::Template(TemplateSummary)
            }
        },
        None => SummaryBackend::Template(TemplateSummary),
    };

    let mut pipeline = BillingPipeline::new(summary, tracker.closure_policy);
    match Entries::new() {
        Ok(entries) => pipeline = pipeline.with_history(entries),
        Err(e) => msg_warning!(Message::HistoryUnavailable(e.to_string())),
    }
    if let Some(clio) = &config.clio {
        match ClioClient::from_stored_token(clio) {
            Ok(client) => pipeline = pipeline.with_logger(client, clio.matter_id),
            Err(e) => msg_warning!(Message::ClioUnavailable(e.to_string())),
        }
    }
    pipeline
}

/// Drains finalized sessions until the monitor drops its sender.
async fn consume(mut finalized: mpsc::Receiver<FinalizedSession>, pipeline: Option<BillingPipeline<SummaryBackend, ClioClient>>) {
    while let Some(session) = finalized.recv().await {
        msg_success!(Message::SessionFinalized {
            session_id: session.session_id.clone(),
            reason: session.reason.as_str().to_string(),
            elapsed: format_duration(&session.elapsed),
        });
        match &pipeline {
            Some(pipeline) => {
                let outcome = pipeline.process(session).await;
                View::finalized(&outcome.session, outcome.summary.as_deref());
                if let Some(id) = &outcome.clio_id {
                    msg_info!(Message::ClioLogged(id.clone()));
                }
            }
            None => View::finalized(&session, None),
        }
    }
}
