//! Chat dispatch against the selected documents.

use crate::backend::{ChatRequest, ChatTarget, DocumentBackend, RequestError};
use crate::controller::state::ControllerState;
use crate::controller::types::{ChatAnswer, ControllerError, Dispatch, DispatchKind};
use uuid::Uuid;

const EMPTY_MESSAGE: &str = "Please enter a message.";
const NO_SELECTION_MESSAGE: &str = "Please select at least one document to chat with.";

/// Chat request plus the selection it was issued for.
#[derive(Debug, Clone)]
pub struct ChatTicket {
    id: Uuid,
    selection: Vec<String>,
    request: ChatRequest,
}

impl ChatTicket {
    /// Correlation id used in logs.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Wire request that will be sent.
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }
}

impl ControllerState {
    /// Start a chat request with the pending draft.
    pub fn begin_draft_chat(&mut self) -> Result<ChatTicket, ControllerError> {
        let draft = self.chat_draft.clone();
        self.begin_chat(&draft)
    }

    /// Start a chat request for `message` against the current selection.
    ///
    /// The previous answer stays visible until a new one arrives.
    pub fn begin_chat(&mut self, message: &str) -> Result<ChatTicket, ControllerError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(self.fail(ControllerError::Validation(EMPTY_MESSAGE.into())));
        }
        let Some(target) = ChatTarget::for_selection(self.selection.ids()) else {
            return Err(self.fail(ControllerError::NoSelection(NO_SELECTION_MESSAGE.into())));
        };
        if self.busy.chat {
            return Err(self.fail(ControllerError::Busy(DispatchKind::Chat)));
        }

        self.busy.chat = true;
        self.error = None;

        Ok(ChatTicket {
            id: Uuid::new_v4(),
            selection: self.selection.ids().to_vec(),
            request: ChatRequest {
                target,
                message: message.to_string(),
            },
        })
    }

    /// Apply a finished chat request.
    ///
    /// Success replaces the answer and clears the draft. Failure keeps the previous answer.
    /// Results for an outdated selection are dropped.
    pub fn apply_chat_answer(
        &mut self,
        ticket: ChatTicket,
        result: Result<String, RequestError>,
    ) -> Result<Dispatch<ChatAnswer>, ControllerError> {
        self.busy.chat = false;

        if self.selection.ids() != ticket.selection.as_slice() {
            tracing::warn!(
                dispatch_id = %ticket.id,
                "Selection changed while chat was in flight; discarding answer"
            );
            return Ok(Dispatch::Discarded);
        }

        match result {
            Ok(text) => {
                let answer = ChatAnswer { text };
                self.chat_answer = Some(answer.clone());
                self.chat_draft.clear();
                Ok(Dispatch::Applied(answer))
            }
            Err(error) => Err(self.fail(ControllerError::Request(error))),
        }
    }
}

/// Send the ticket's chat request and return the answer text.
pub async fn request_chat<B>(backend: &B, ticket: &ChatTicket) -> Result<String, RequestError>
where
    B: DocumentBackend + ?Sized,
{
    tracing::debug!(
        dispatch_id = %ticket.id,
        documents = ticket.selection.len(),
        "Sending chat message"
    );
    let response = backend.chat(&ticket.request).await?;
    Ok(response.answer)
}
