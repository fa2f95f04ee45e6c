//! Deletion and the reconciliation of dependent state.

use crate::controller::state::ControllerState;

/// Prompt shown before a document is deleted.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this document?";

/// Confirmation step required before an irreversible action.
pub trait Confirm {
    /// Return `true` to proceed.
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirmation that always proceeds, for non-interactive callers that already asked.
#[derive(Debug, Clone, Copy, Default)]
pub struct Confirmed;

impl Confirm for Confirmed {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Effect of reconciling state after a deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    /// The deleted id was part of the selection.
    pub was_selected: bool,
    /// Summary and chat answer were cleared because the selection became empty.
    pub cleared_results: bool,
}

/// What happened to a deletion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionOutcome {
    /// The confirmation was declined; nothing was sent.
    Cancelled,
    /// The service removed the document and local state was reconciled.
    Deleted(Reconciliation),
}

impl ControllerState {
    /// Drop a deleted document from the list and the selection.
    ///
    /// When removing it empties the selection, the summary and chat answer are cleared too.
    /// Deleting an unselected document leaves them untouched.
    pub fn reconcile_deletion(&mut self, doc_id: &str) -> Reconciliation {
        self.documents.retain(|document| document.id != doc_id);

        let was_selected = self.selection.remove(doc_id);
        let cleared_results = was_selected && self.selection.is_empty();
        if cleared_results {
            self.summary = None;
            self.chat_answer = None;
        }

        Reconciliation {
            was_selected,
            cleared_results,
        }
    }
}
