//! Clients for the external services a finalized session is handed to.
//!
//! - **Summary**: turns `{to, subject, content, elapsed}` into billing
//!   narrative text
//! - **Clio**: creates a time entry in the practice-management system
//!
//! Both sit behind small traits so the billing pipeline can be exercised with
//! in-process fakes.

use reqwest::StatusCode;
use thiserror::Error;

pub mod clio;
pub mod summary;

pub use clio::{ClioClient, ClioConfig, TimeEntry};
pub use summary::{HttpSummaryService, SummaryConfig, SummaryRequest, TemplateSummary};

/// Request timeout for every outbound call.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("service response is missing '{0}'")]
    MissingField(&'static str),
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

/// Produces billing narrative text for a finished session.
#[allow(async_fn_in_trait)]
pub trait SummaryService {
    async fn generate(&self, request: &SummaryRequest) -> Result<String, ApiError>;
}

/// Records a time entry in an external billing system.
#[allow(async_fn_in_trait)]
pub trait TimeEntryLogger {
    /// Returns the id the remote system assigned to the entry.
    async fn log(&self, entry: &TimeEntry) -> Result<String, ApiError>;
}

/// Turns a non-success response into [`ApiError::Status`].
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status { status, body })
}
