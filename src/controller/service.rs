//! Controller coordinating selection, uploads, summaries, chat, and deletion.

use crate::{
    backend::{DocumentBackend, SummaryStyle, UploadFile},
    controller::{
        chat::{ChatTicket, request_chat},
        deletion::{Confirm, DELETE_PROMPT, DeletionOutcome},
        state::ControllerState,
        summary::request_summary,
        types::{ChatAnswer, ControllerError, Dispatch, SummaryResult, UploadReport},
        upload::{UploadTicket, upload_sequentially},
    },
    metrics::{MetricsSnapshot, SessionMetrics},
};
use std::sync::{Mutex, PoisonError};

/// Drives the document service on behalf of one page or session.
///
/// State lives behind a mutex that is only held for synchronous transitions, never across a
/// request, so methods take `&self` and can overlap. Overlapping dispatches of the same purpose
/// are rejected with [`ControllerError::Busy`], and a summary or chat response that lands after
/// the selection changed is discarded instead of applied.
pub struct DocumentController<B> {
    backend: B,
    state: Mutex<ControllerState>,
    metrics: SessionMetrics,
}

impl<B> DocumentController<B>
where
    B: DocumentBackend,
{
    /// Build a controller with empty state.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: Mutex::new(ControllerState::new()),
            metrics: SessionMetrics::new(),
        }
    }

    /// Backend the controller talks to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Copy of the current state.
    pub fn state(&self) -> ControllerState {
        self.with_state(|state| state.clone())
    }

    /// Session counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn with_state<R>(&self, apply: impl FnOnce(&mut ControllerState) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        apply(&mut guard)
    }

    /// Toggle a document in the selection without contacting the service.
    pub fn toggle(&self, doc_id: &str) -> bool {
        self.with_state(|state| state.toggle(doc_id))
    }

    /// Empty the selection.
    pub fn clear_selection(&self) {
        self.with_state(ControllerState::clear_selection);
    }

    /// Replace the files staged for the next upload.
    pub fn stage_files(&self, files: Vec<UploadFile>) {
        self.with_state(|state| state.stage_files(files));
    }

    /// Replace the case tag for the next upload.
    pub fn set_case_tag(&self, tag: &str) {
        self.with_state(|state| state.set_case_tag(tag));
    }

    /// Set the case tag staged uploads fall back to when none is pending.
    pub fn set_default_case_tag(&self, tag: Option<&str>) {
        self.with_state(|state| state.set_default_case_tag(tag));
    }

    /// Replace the pending chat input.
    pub fn set_chat_draft(&self, draft: &str) {
        self.with_state(|state| state.set_chat_draft(draft));
    }

    /// Fetch the document list, optionally switching the case filter first.
    ///
    /// Passing `None` keeps the current filter. A failure is logged and leaves the list as it was.
    pub async fn refresh_documents(&self, case_filter: Option<&str>) -> Result<usize, ControllerError> {
        let filter = self.with_state(|state| {
            if case_filter.is_some() {
                state.set_case_filter(case_filter);
            }
            state.begin_document_refresh()
        });

        let result = self.backend.list_documents(filter.as_deref()).await;
        self.with_state(|state| state.apply_document_list(result))
            .map_err(ControllerError::Request)
    }

    /// Fetch a document and, if it exists, toggle it in the selection.
    ///
    /// Returns whether the document is selected afterwards. A failed fetch leaves the selection
    /// unchanged and sets the banner.
    pub async fn select_document(&self, doc_id: &str) -> Result<bool, ControllerError> {
        match self.backend.get_document(doc_id).await {
            Ok(document) => Ok(self.with_state(|state| state.toggle(&document.id))),
            Err(error) => Err(self.with_state(|state| state.fail(ControllerError::Request(error)))),
        }
    }

    /// Upload `files` one at a time under an optional case tag.
    ///
    /// Per-file failures do not stop the batch. On any success the document list is re-fetched
    /// and the staged input is cleared. A fully failed batch is reported through
    /// [`UploadReport::status`]; see [`UploadReport::into_result`].
    pub async fn upload(
        &self,
        files: Vec<UploadFile>,
        case_tag: Option<&str>,
    ) -> Result<UploadReport, ControllerError> {
        let ticket = self.with_state(|state| state.begin_upload(files, case_tag))?;
        self.run_upload(ticket).await
    }

    /// Upload the staged files under the staged case tag.
    pub async fn upload_staged(&self) -> Result<UploadReport, ControllerError> {
        let ticket = self.with_state(ControllerState::begin_staged_upload)?;
        self.run_upload(ticket).await
    }

    async fn run_upload(&self, ticket: UploadTicket) -> Result<UploadReport, ControllerError> {
        let report = upload_sequentially(&self.backend, &ticket).await;
        self.metrics
            .record_upload_batch(report.succeeded() as u64, report.failed() as u64);

        let needs_refresh = self.with_state(|state| state.apply_upload_report(&report));
        tracing::info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            status = ?report.status,
            "Upload batch finished"
        );
        if needs_refresh {
            self.reload_documents().await;
        }
        Ok(report)
    }

    /// Summarize the selection in the given style.
    ///
    /// One selected document uses the single-document operation; more use the combined one.
    pub async fn summarize(
        &self,
        style: SummaryStyle,
    ) -> Result<Dispatch<SummaryResult>, ControllerError> {
        let ticket = self.with_state(|state| state.begin_summary(style))?;
        let result = request_summary(&self.backend, &ticket).await;
        let dispatch_id = ticket.id();
        let dispatch = self.with_state(|state| state.apply_summary_result(ticket, result))?;

        match &dispatch {
            Dispatch::Applied(summary) => {
                self.metrics.record_summary();
                tracing::info!(%dispatch_id, style = %summary.style, "Summary applied");
            }
            Dispatch::Discarded => self.metrics.record_discarded(),
        }
        Ok(dispatch)
    }

    /// Ask `message` about the selected documents.
    pub async fn chat(&self, message: &str) -> Result<Dispatch<ChatAnswer>, ControllerError> {
        let ticket = self.with_state(|state| state.begin_chat(message))?;
        self.run_chat(ticket).await
    }

    /// Send the pending chat draft.
    pub async fn send_chat_draft(&self) -> Result<Dispatch<ChatAnswer>, ControllerError> {
        let ticket = self.with_state(ControllerState::begin_draft_chat)?;
        self.run_chat(ticket).await
    }

    async fn run_chat(
        &self,
        ticket: ChatTicket,
    ) -> Result<Dispatch<ChatAnswer>, ControllerError> {
        let result = request_chat(&self.backend, &ticket).await;
        let dispatch_id = ticket.id();
        let dispatch = self.with_state(|state| state.apply_chat_answer(ticket, result))?;

        match &dispatch {
            Dispatch::Applied(_) => {
                self.metrics.record_chat();
                tracing::info!(%dispatch_id, "Chat answer applied");
            }
            Dispatch::Discarded => self.metrics.record_discarded(),
        }
        Ok(dispatch)
    }

    /// Delete a document after confirmation, then reconcile selection and derived results.
    ///
    /// A failed delete mutates nothing but the error banner.
    pub async fn delete_document(
        &self,
        doc_id: &str,
        confirm: &dyn Confirm,
    ) -> Result<DeletionOutcome, ControllerError> {
        if !confirm.confirm(DELETE_PROMPT) {
            tracing::debug!(doc_id, "Deletion cancelled");
            return Ok(DeletionOutcome::Cancelled);
        }

        if let Err(error) = self.backend.delete_document(doc_id).await {
            return Err(self.with_state(|state| state.fail(ControllerError::Request(error))));
        }

        self.metrics.record_deletion();
        let reconciliation = self.with_state(|state| state.reconcile_deletion(doc_id));
        tracing::info!(
            doc_id,
            was_selected = reconciliation.was_selected,
            cleared_results = reconciliation.cleared_results,
            "Document deleted"
        );
        self.reload_documents().await;
        Ok(DeletionOutcome::Deleted(reconciliation))
    }

    async fn reload_documents(&self) {
        let filter = self.with_state(ControllerState::begin_document_refresh);
        let result = self.backend.list_documents(filter.as_deref()).await;
        let _ = self.with_state(|state| state.apply_document_list(result));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::deletion::Confirmed;
    use crate::controller::testing::{Call, FakeBackend};
    use crate::controller::types::{BatchStatus, DispatchKind, UploadOutcome};

    fn file(name: &str) -> UploadFile {
        UploadFile::from_bytes(name, b"body".to_vec())
    }

    #[tokio::test]
    async fn partial_upload_refreshes_list_and_keeps_selection() {
        let backend = FakeBackend::new()
            .with_documents(&["docA"])
            .reject_upload("b.pdf", "unsupported format");
        let controller = DocumentController::new(backend);
        controller.toggle("docA");

        let report = controller
            .upload(vec![file("a.pdf"), file("b.pdf")], None)
            .await
            .expect("report");

        assert_eq!(report.status, BatchStatus::Success);
        assert_eq!(
            report.outcomes,
            vec![
                UploadOutcome::Success {
                    id: "doc2".into(),
                    filename: "a.pdf".into(),
                    message: "Document uploaded".into(),
                },
                UploadOutcome::Failure {
                    filename: "b.pdf".into(),
                    reason: "unsupported format".into(),
                },
            ]
        );

        let state = controller.state();
        assert_eq!(state.documents().len(), 2);
        assert_eq!(state.selection().ids(), ["docA"]);
        assert_eq!(state.error(), Some("Some files failed: b.pdf: unsupported format"));
        assert_eq!(controller.backend().calls().last(), Some(&Call::List(None)));
        assert_eq!(controller.metrics().files_failed, 1);
    }

    #[tokio::test]
    async fn failed_batch_skips_refresh() {
        let backend = FakeBackend::new().reject_upload("a.pdf", "nope");
        let controller = DocumentController::new(backend);
        controller.stage_files(vec![file("a.pdf")]);

        let report = controller.upload_staged().await.expect("report");

        assert_eq!(report.status, BatchStatus::Error);
        assert!(
            !controller
                .backend()
                .calls()
                .iter()
                .any(|call| matches!(call, Call::List(_)))
        );
        assert_eq!(controller.state().staged_files().len(), 1);
    }

    #[tokio::test]
    async fn refresh_remembers_case_filter_for_later_reloads() {
        let controller = DocumentController::new(FakeBackend::new().with_documents(&["doc1"]));
        controller.refresh_documents(Some("CASE-1")).await.expect("list");
        controller.set_case_tag("CASE-1");
        controller.stage_files(vec![file("a.pdf")]);
        controller.upload_staged().await.expect("upload");

        let lists: Vec<_> = controller
            .backend()
            .calls()
            .into_iter()
            .filter(|call| matches!(call, Call::List(_)))
            .collect();
        assert_eq!(
            lists,
            vec![Call::List(Some("CASE-1".into())), Call::List(Some("CASE-1".into()))]
        );
    }

    #[tokio::test]
    async fn chat_without_selection_makes_no_call() {
        let controller = DocumentController::new(FakeBackend::new());

        let error = controller.chat("hello").await.expect_err("no selection");

        assert!(matches!(error, ControllerError::NoSelection(_)));
        assert!(controller.backend().calls().is_empty());
        assert!(controller.state().error().is_some());
    }

    #[tokio::test]
    async fn overlapping_summary_is_rejected_while_first_completes() {
        let (backend, gate) = FakeBackend::new().gated();
        let controller = DocumentController::new(backend);
        controller.toggle("doc1");

        let (first, second) = tokio::join!(controller.summarize(SummaryStyle::Brief), async {
            let second = controller.summarize(SummaryStyle::Detailed).await;
            gate.notify_one();
            second
        });

        let applied = first.expect("first").applied().expect("applied");
        assert_eq!(applied.text, "brief summary of doc1");
        assert!(matches!(
            second,
            Err(ControllerError::Busy(DispatchKind::Summary))
        ));
        assert_eq!(controller.backend().calls().len(), 1);
        assert!(!controller.state().busy().summary);
    }

    #[tokio::test]
    async fn summary_landing_after_selection_change_is_discarded() {
        let (backend, gate) = FakeBackend::new().gated();
        let controller = DocumentController::new(backend);
        controller.toggle("doc1");

        let (dispatch, ()) = tokio::join!(controller.summarize(SummaryStyle::Brief), async {
            controller.toggle("doc2");
            gate.notify_one();
        });

        assert_eq!(dispatch.expect("dispatch"), Dispatch::Discarded);
        assert!(controller.state().summary().is_none());
        assert_eq!(controller.metrics().stale_results_discarded, 1);
    }

    #[tokio::test]
    async fn chat_answer_landing_after_selection_change_is_discarded() {
        let (backend, gate) = FakeBackend::new().gated();
        let controller = DocumentController::new(backend);
        controller.toggle("doc1");

        let (dispatch, ()) = tokio::join!(controller.chat("hello"), async {
            controller.clear_selection();
            gate.notify_one();
        });

        assert_eq!(dispatch.expect("dispatch"), Dispatch::Discarded);
        assert!(controller.state().chat_answer().is_none());
    }

    #[tokio::test]
    async fn failed_summary_reports_message() {
        let controller = DocumentController::new(FakeBackend::new().fail_summary("LLM offline"));
        controller.toggle("doc1");
        controller.toggle("doc2");

        let error = controller
            .summarize(SummaryStyle::KeyPoints)
            .await
            .expect_err("failure");

        assert_eq!(error.to_string(), "LLM offline");
        let state = controller.state();
        assert!(state.summary().is_none());
        assert_eq!(state.error(), Some("LLM offline"));
        assert!(!state.busy().summary);
    }

    #[tokio::test]
    async fn failed_draft_chat_keeps_draft_for_retry() {
        let controller = DocumentController::new(FakeBackend::new().fail_chat("timeout upstream"));
        controller.toggle("doc1");
        controller.set_chat_draft("second");

        let error = controller.send_chat_draft().await.expect_err("failure");

        assert_eq!(error.to_string(), "timeout upstream");
        let state = controller.state();
        assert_eq!(state.chat_draft(), "second");
        assert!(state.chat_answer().is_none());
        assert!(!state.busy().chat);
        assert_eq!(controller.metrics().chats_applied, 0);
    }

    #[tokio::test]
    async fn select_document_toggles_only_existing_documents() {
        let controller = DocumentController::new(FakeBackend::new());
        assert!(controller.select_document("doc1").await.expect("selected"));
        assert!(!controller.select_document("doc1").await.expect("deselected"));

        let missing = DocumentController::new(FakeBackend::new().fail_get("Document not found"));
        let error = missing.select_document("doc9").await.expect_err("missing");
        assert_eq!(error.to_string(), "Document not found");
        assert!(missing.state().selection().is_empty());
    }

    #[tokio::test]
    async fn declined_deletion_sends_nothing() {
        let controller = DocumentController::new(FakeBackend::new().with_documents(&["doc1"]));
        let outcome = controller
            .delete_document("doc1", &|_: &str| false)
            .await
            .expect("cancelled");

        assert_eq!(outcome, DeletionOutcome::Cancelled);
        assert!(controller.backend().calls().is_empty());
    }

    #[tokio::test]
    async fn deleting_only_selected_document_clears_results() {
        let controller = DocumentController::new(FakeBackend::new().with_documents(&["doc1", "doc2"]));
        controller.refresh_documents(None).await.expect("list");
        controller.toggle("doc1");
        controller.summarize(SummaryStyle::Brief).await.expect("summary");
        controller.chat("q").await.expect("chat");

        let outcome = controller
            .delete_document("doc1", &Confirmed)
            .await
            .expect("deleted");

        let DeletionOutcome::Deleted(reconciliation) = outcome else {
            panic!("expected deletion");
        };
        assert!(reconciliation.cleared_results);
        let state = controller.state();
        assert!(state.summary().is_none());
        assert!(state.chat_answer().is_none());
        assert_eq!(state.documents().len(), 1);
        assert_eq!(controller.metrics().documents_deleted, 1);
    }

    #[tokio::test]
    async fn failed_deletion_mutates_nothing_but_banner() {
        let backend = FakeBackend::new()
            .with_documents(&["doc1"])
            .fail_delete("Document not found");
        let controller = DocumentController::new(backend);
        controller.refresh_documents(None).await.expect("list");
        controller.toggle("doc1");
        controller.summarize(SummaryStyle::Brief).await.expect("summary");

        let error = controller
            .delete_document("doc1", &Confirmed)
            .await
            .expect_err("failure");

        assert_eq!(error.to_string(), "Document not found");
        let state = controller.state();
        assert_eq!(state.documents().len(), 1);
        assert_eq!(state.selection().ids(), ["doc1"]);
        assert!(state.summary().is_some());
        assert_eq!(state.error(), Some("Document not found"));
    }
}
