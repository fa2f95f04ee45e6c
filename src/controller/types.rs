//! Outcome and error types produced by the document controller.

use crate::backend::{RequestError, SummaryStyle};
use std::fmt;
use thiserror::Error;

/// Dispatch purposes guarded by the single-slot in-flight check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchKind {
    /// Batch upload.
    Upload,
    /// Single or combined summary.
    Summary,
    /// Single or multi-document chat.
    Chat,
}

impl fmt::Display for DispatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Upload => "upload",
            Self::Summary => "summary",
            Self::Chat => "chat",
        })
    }
}

/// Errors surfaced by controller operations.
///
/// Every variant renders as the user-visible banner text that the operation also stores in the
/// controller state.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Caller-side precondition violated before any network activity.
    #[error("{0}")]
    Validation(String),
    /// Operation requires at least one selected document.
    #[error("{0}")]
    NoSelection(String),
    /// Another request of the same purpose is still in flight.
    #[error("A {0} request is already in progress.")]
    Busy(DispatchKind),
    /// The service answered with an error or could not be reached.
    #[error("{}", .0.user_message())]
    Request(#[from] RequestError),
    /// Every file of an upload batch failed.
    #[error("{0}")]
    TotalBatchFailure(String),
}

/// Result of one file of an upload batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The service accepted the file.
    Success {
        /// Identifier assigned by the service.
        id: String,
        /// Filename recorded by the service.
        filename: String,
        /// Confirmation returned by the service.
        message: String,
    },
    /// The file was rejected or the request failed.
    Failure {
        /// Local filename of the rejected file.
        filename: String,
        /// Extracted failure reason.
        reason: String,
    },
}

impl UploadOutcome {
    /// Whether the file was accepted.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Overall status of an upload batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// At least one file was accepted.
    Success,
    /// No file was accepted.
    Error,
}

/// Non-fatal or fatal failure summary attached to an upload batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchFailure {
    /// Some files failed while others succeeded; carries the warning text.
    Partial(String),
    /// Every file failed; carries the joined reasons.
    Total(String),
}

/// Aggregated result of an upload batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    /// Overall batch status.
    pub status: BatchStatus,
    /// Per-file outcomes in submission order.
    pub outcomes: Vec<UploadOutcome>,
    /// Failure summary, if any file failed.
    pub failure: Option<BatchFailure>,
}

impl UploadReport {
    /// Aggregate per-file outcomes into a batch report.
    pub fn from_outcomes(outcomes: Vec<UploadOutcome>) -> Self {
        let failures: Vec<String> = outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                UploadOutcome::Failure { filename, reason } => Some(format!("{filename}: {reason}")),
                UploadOutcome::Success { .. } => None,
            })
            .collect();
        let joined = failures.join(", ");

        if outcomes.iter().any(UploadOutcome::is_success) {
            Self {
                status: BatchStatus::Success,
                failure: (!failures.is_empty())
                    .then(|| BatchFailure::Partial(format!("Some files failed: {joined}"))),
                outcomes,
            }
        } else {
            let message = if joined.is_empty() {
                "All uploads failed".to_string()
            } else {
                joined
            };
            Self {
                status: BatchStatus::Error,
                failure: Some(BatchFailure::Total(message)),
                outcomes,
            }
        }
    }

    /// Number of accepted files.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_success()).count()
    }

    /// Number of rejected files.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Banner text for the batch: the partial warning or the total failure message.
    pub fn message(&self) -> Option<&str> {
        match &self.failure {
            Some(BatchFailure::Partial(message) | BatchFailure::Total(message)) => {
                Some(message.as_str())
            }
            None => None,
        }
    }

    /// Convert a fully failed batch into an error, passing every other report through.
    pub fn into_result(self) -> Result<Self, ControllerError> {
        match self.failure {
            Some(BatchFailure::Total(message)) => Err(ControllerError::TotalBatchFailure(message)),
            _ => Ok(self),
        }
    }
}

/// Upload form lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadStatus {
    /// No upload attempted yet.
    #[default]
    Idle,
    /// A batch is in flight.
    Uploading,
    /// The last batch had at least one success.
    Success,
    /// The last batch failed entirely.
    Error,
}

/// Summary currently shown for the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResult {
    /// Style that was requested.
    pub style: SummaryStyle,
    /// Summary text returned by the service.
    pub text: String,
}

/// Most recent chat answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatAnswer {
    /// Answer text returned by the service.
    pub text: String,
}

/// Result of a dispatch whose response may arrive after the selection moved on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch<T> {
    /// The response matched the current selection and was stored.
    Applied(T),
    /// The selection changed while the request was in flight; the response was dropped.
    Discarded,
}

impl<T> Dispatch<T> {
    /// The applied value, if any.
    pub fn applied(self) -> Option<T> {
        match self {
            Self::Applied(value) => Some(value),
            Self::Discarded => None,
        }
    }
}

/// In-flight flags, one per purpose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusyFlags {
    /// An upload batch is running.
    pub upload: bool,
    /// A summary request is running.
    pub summary: bool,
    /// A chat request is running.
    pub chat: bool,
    /// The document list is being fetched.
    pub documents: bool,
}
