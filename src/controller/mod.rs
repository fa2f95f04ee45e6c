//! Selection-driven document controller.
//!
//! Transitions on [`ControllerState`] are synchronous and never touch the network; the async
//! [`DocumentController`] wraps them around calls to a [`crate::backend::DocumentBackend`].

pub mod chat;
pub mod deletion;
pub mod selection;
pub mod service;
pub mod state;
pub mod summary;
pub mod types;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;

pub use chat::ChatTicket;
pub use deletion::{Confirm, Confirmed, DELETE_PROMPT, DeletionOutcome, Reconciliation};
pub use selection::SelectionSet;
pub use service::DocumentController;
pub use state::ControllerState;
pub use summary::SummaryTicket;
pub use types::{
    BatchFailure, BatchStatus, BusyFlags, ChatAnswer, ControllerError, Dispatch, DispatchKind,
    SummaryResult, UploadOutcome, UploadReport, UploadStatus,
};
pub use upload::UploadTicket;
