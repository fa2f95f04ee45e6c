//! Explicit controller state and the transitions shared by every dispatcher.
//!
//! All fields are private; the only way to change them is through the transition methods defined
//! here and in the dispatcher modules (`upload`, `summary`, `chat`, `deletion`). None of the
//! transitions perform I/O, so the whole state machine is testable without a network.

use crate::backend::{DocumentList, DocumentRecord, RequestError, SummaryStyle, UploadFile};
use crate::controller::selection::SelectionSet;
use crate::controller::types::{
    BusyFlags, ChatAnswer, ControllerError, SummaryResult, UploadOutcome, UploadStatus,
};

/// Everything the document page displays, owned by one controller instance.
#[derive(Debug, Clone, Default)]
pub struct ControllerState {
    pub(super) documents: Vec<DocumentRecord>,
    pub(super) case_filter: Option<String>,
    pub(super) selection: SelectionSet,
    pub(super) summary: Option<SummaryResult>,
    pub(super) summary_style: SummaryStyle,
    pub(super) chat_answer: Option<ChatAnswer>,
    pub(super) chat_draft: String,
    pub(super) staged_files: Vec<UploadFile>,
    pub(super) case_tag: String,
    pub(super) default_case_tag: Option<String>,
    pub(super) upload_status: UploadStatus,
    pub(super) upload_outcomes: Vec<UploadOutcome>,
    pub(super) error: Option<String>,
    pub(super) busy: BusyFlags,
}

impl ControllerState {
    /// Fresh state: nothing listed, nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents from the most recent successful list fetch.
    pub fn documents(&self) -> &[DocumentRecord] {
        &self.documents
    }

    /// Case filter applied to list fetches.
    pub fn case_filter(&self) -> Option<&str> {
        self.case_filter.as_deref()
    }

    /// Current selection.
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Summary for the current selection, if one has been generated.
    pub fn summary(&self) -> Option<&SummaryResult> {
        self.summary.as_ref()
    }

    /// Style of the most recent summary request.
    pub fn summary_style(&self) -> SummaryStyle {
        self.summary_style
    }

    /// Most recent chat answer.
    pub fn chat_answer(&self) -> Option<&ChatAnswer> {
        self.chat_answer.as_ref()
    }

    /// Pending chat input.
    pub fn chat_draft(&self) -> &str {
        &self.chat_draft
    }

    /// Files waiting to be uploaded.
    pub fn staged_files(&self) -> &[UploadFile] {
        &self.staged_files
    }

    /// Case tag used by staged uploads when no pending tag is set.
    pub fn default_case_tag(&self) -> Option<&str> {
        self.default_case_tag.as_deref()
    }

    /// Pending case tag for the next upload.
    pub fn case_tag(&self) -> &str {
        &self.case_tag
    }

    /// Upload form lifecycle.
    pub fn upload_status(&self) -> UploadStatus {
        self.upload_status
    }

    /// Per-file outcomes of the last upload batch.
    pub fn upload_outcomes(&self) -> &[UploadOutcome] {
        &self.upload_outcomes
    }

    /// User-visible error banner.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// In-flight flags.
    pub fn busy(&self) -> BusyFlags {
        self.busy
    }

    /// Toggle `id` in the selection. Returns whether it is selected afterwards.
    ///
    /// Displayed results are left alone; dispatches already in flight for the previous selection
    /// will be discarded when they complete.
    pub fn toggle(&mut self, id: &str) -> bool {
        self.selection.toggle(id)
    }

    /// Empty the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Replace the pending chat input.
    pub fn set_chat_draft(&mut self, draft: impl Into<String>) {
        self.chat_draft = draft.into();
    }

    /// Dismiss the error banner.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Store `error` as the banner and hand it back for propagation.
    pub fn fail(&mut self, error: ControllerError) -> ControllerError {
        self.error = Some(error.to_string());
        error
    }

    /// Remember the case filter applied to list fetches. Blank filters mean "all documents".
    pub fn set_case_filter(&mut self, case_filter: Option<&str>) {
        self.case_filter = case_filter
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
    }

    /// Mark a list fetch as started and return the filter it should use.
    pub fn begin_document_refresh(&mut self) -> Option<String> {
        self.busy.documents = true;
        self.case_filter.clone()
    }

    /// Apply the outcome of a list fetch and return the number of listed documents.
    ///
    /// A failure is logged and handed back; the previous list stays in place and no banner is set.
    pub fn apply_document_list(
        &mut self,
        result: Result<DocumentList, RequestError>,
    ) -> Result<usize, RequestError> {
        self.busy.documents = false;
        match result {
            Ok(list) => {
                tracing::debug!(
                    count = list.documents.len(),
                    total = list.total,
                    "Document list refreshed"
                );
                self.documents = list.documents;
                Ok(self.documents.len())
            }
            Err(error) => {
                tracing::warn!(error = %error, "Failed to load documents");
                Err(error)
            }
        }
    }
}
