//! Batch upload orchestration.
//!
//! Files are sent one at a time; a failing file is recorded and the batch moves on to the next.

use crate::backend::{DocumentBackend, UploadFile};
use crate::controller::state::ControllerState;
use crate::controller::types::{
    BatchStatus, ControllerError, DispatchKind, UploadOutcome, UploadReport, UploadStatus,
};

const NO_FILES_MESSAGE: &str = "Please choose at least one document file (PDF, DOCX, or TXT).";
const DEFAULT_FAILURE_REASON: &str = "Upload failed";

/// Files and tag captured when an upload batch starts.
#[derive(Debug, Clone)]
pub struct UploadTicket {
    files: Vec<UploadFile>,
    case_tag: Option<String>,
}

impl UploadTicket {
    /// Files in submission order.
    pub fn files(&self) -> &[UploadFile] {
        &self.files
    }

    /// Trimmed case tag, if any.
    pub fn case_tag(&self) -> Option<&str> {
        self.case_tag.as_deref()
    }
}

impl ControllerState {
    /// Replace the files waiting to be uploaded.
    pub fn stage_files(&mut self, files: Vec<UploadFile>) {
        self.staged_files = files;
    }

    /// Replace the pending case tag.
    pub fn set_case_tag(&mut self, tag: impl Into<String>) {
        self.case_tag = tag.into();
    }

    /// Set the case tag applied to staged uploads when the pending tag is blank.
    pub fn set_default_case_tag(&mut self, tag: Option<&str>) {
        self.default_case_tag = tag
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
    }

    /// Start an upload batch of the staged files under the pending case tag, or the default tag
    /// when none is pending.
    pub fn begin_staged_upload(&mut self) -> Result<UploadTicket, ControllerError> {
        let files = self.staged_files.clone();
        let tag = Some(self.case_tag.trim())
            .filter(|value| !value.is_empty())
            .or(self.default_case_tag.as_deref())
            .map(str::to_string);
        self.begin_upload(files, tag.as_deref())
    }

    /// Start an upload batch.
    ///
    /// Rejects an empty file list and a batch already in flight without touching the network.
    pub fn begin_upload(
        &mut self,
        files: Vec<UploadFile>,
        case_tag: Option<&str>,
    ) -> Result<UploadTicket, ControllerError> {
        if files.is_empty() {
            return Err(self.fail(ControllerError::Validation(NO_FILES_MESSAGE.into())));
        }
        if self.busy.upload {
            return Err(self.fail(ControllerError::Busy(DispatchKind::Upload)));
        }

        self.busy.upload = true;
        self.upload_status = UploadStatus::Uploading;
        self.upload_outcomes.clear();
        self.error = None;

        Ok(UploadTicket {
            files,
            case_tag: case_tag
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string),
        })
    }

    /// Record a finished batch. Returns `true` when the document list needs a refresh.
    pub fn apply_upload_report(&mut self, report: &UploadReport) -> bool {
        self.busy.upload = false;
        self.upload_outcomes = report.outcomes.clone();
        self.error = report.message().map(str::to_string);

        match report.status {
            BatchStatus::Success => {
                self.upload_status = UploadStatus::Success;
                self.staged_files.clear();
                self.case_tag.clear();
                true
            }
            BatchStatus::Error => {
                self.upload_status = UploadStatus::Error;
                false
            }
        }
    }
}

/// Upload every file of `ticket` sequentially, isolating per-file failures.
///
/// At most one upload request is in flight at any time.
pub async fn upload_sequentially<B>(backend: &B, ticket: &UploadTicket) -> UploadReport
where
    B: DocumentBackend + ?Sized,
{
    let mut outcomes = Vec::with_capacity(ticket.files.len());
    for file in &ticket.files {
        let outcome = match backend.upload_document(file, ticket.case_tag()).await {
            Ok(receipt) => {
                tracing::info!(id = %receipt.id, filename = %receipt.filename, "Document uploaded");
                UploadOutcome::Success {
                    id: receipt.id,
                    filename: receipt.filename,
                    message: receipt.message,
                }
            }
            Err(error) => {
                let reason = Some(error.user_message())
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| DEFAULT_FAILURE_REASON.to_string());
                tracing::warn!(filename = %file.filename, reason = %reason, "Document upload failed");
                UploadOutcome::Failure {
                    filename: file.filename.clone(),
                    reason,
                }
            }
        };
        outcomes.push(outcome);
    }
    UploadReport::from_outcomes(outcomes)
}
