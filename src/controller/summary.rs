//! Summary dispatch: single-document or combined, chosen by selection size.

use crate::backend::{DocumentBackend, RequestError, SummaryStyle};
use crate::controller::state::ControllerState;
use crate::controller::types::{ControllerError, Dispatch, DispatchKind, SummaryResult};
use uuid::Uuid;

const NO_SELECTION_MESSAGE: &str = "Please select at least one document to generate a summary.";

/// Snapshot of the selection a summary request was issued for.
#[derive(Debug, Clone)]
pub struct SummaryTicket {
    id: Uuid,
    style: SummaryStyle,
    selection: Vec<String>,
}

impl SummaryTicket {
    /// Correlation id used in logs.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Requested style.
    pub fn style(&self) -> SummaryStyle {
        self.style
    }

    /// Selected ids at dispatch time, in selection order. Never empty.
    pub fn selection(&self) -> &[String] {
        &self.selection
    }
}

impl ControllerState {
    /// Start a summary request for the current selection.
    ///
    /// Clears the displayed summary and the banner so a failed request leaves nothing stale behind.
    pub fn begin_summary(&mut self, style: SummaryStyle) -> Result<SummaryTicket, ControllerError> {
        if self.selection.is_empty() {
            return Err(self.fail(ControllerError::NoSelection(NO_SELECTION_MESSAGE.into())));
        }
        if self.busy.summary {
            return Err(self.fail(ControllerError::Busy(DispatchKind::Summary)));
        }

        self.busy.summary = true;
        self.summary_style = style;
        self.summary = None;
        self.error = None;

        Ok(SummaryTicket {
            id: Uuid::new_v4(),
            style,
            selection: self.selection.ids().to_vec(),
        })
    }

    /// Apply a finished summary request.
    ///
    /// The result is dropped when the selection no longer matches the ticket's snapshot.
    pub fn apply_summary_result(
        &mut self,
        ticket: SummaryTicket,
        result: Result<String, RequestError>,
    ) -> Result<Dispatch<SummaryResult>, ControllerError> {
        self.busy.summary = false;

        if self.selection.ids() != ticket.selection.as_slice() {
            tracing::warn!(
                dispatch_id = %ticket.id,
                style = %ticket.style,
                "Selection changed while summary was in flight; discarding result"
            );
            return Ok(Dispatch::Discarded);
        }

        match result {
            Ok(text) => {
                let summary = SummaryResult {
                    style: ticket.style,
                    text,
                };
                self.summary = Some(summary.clone());
                Ok(Dispatch::Applied(summary))
            }
            Err(error) => {
                self.summary = None;
                Err(self.fail(ControllerError::Request(error)))
            }
        }
    }
}

/// Call the single-document operation for one selected id, the combined one otherwise.
pub async fn request_summary<B>(backend: &B, ticket: &SummaryTicket) -> Result<String, RequestError>
where
    B: DocumentBackend + ?Sized,
{
    match ticket.selection.as_slice() {
        [only] => {
            tracing::debug!(dispatch_id = %ticket.id, doc_id = %only, style = %ticket.style, "Requesting document summary");
            let response = backend.summarize_document(only, ticket.style).await?;
            Ok(response.summary)
        }
        many => {
            tracing::debug!(dispatch_id = %ticket.id, documents = many.len(), style = %ticket.style, "Requesting combined summary");
            let response = backend.summarize_combined(many, ticket.style).await?;
            Ok(response.summary)
        }
    }
}
