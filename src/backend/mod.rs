//! Document RAG service integration.

pub mod client;
pub mod message;
pub mod types;

pub use client::DocumentApiClient;
pub use message::extract_error_message;
pub use types::{
    ChatRequest, ChatResponse, ChatTarget, CombinedSummaryResponse, DeleteReceipt, DocumentList,
    DocumentRecord, RequestError, SummaryResponse, SummaryStyle, UploadFile, UploadReceipt,
    parse_timestamp,
};

use async_trait::async_trait;

/// Request/response contract of the document service.
///
/// The controller only ever talks to the service through this trait, which keeps it testable
/// without a network. Each method performs a single attempt.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// List documents, optionally restricted to one case.
    async fn list_documents(&self, case_id: Option<&str>) -> Result<DocumentList, RequestError>;

    /// Fetch one document's metadata.
    async fn get_document(&self, doc_id: &str) -> Result<DocumentRecord, RequestError>;

    /// Upload a single file, optionally tagged with a case identifier.
    async fn upload_document(
        &self,
        file: &UploadFile,
        case_id: Option<&str>,
    ) -> Result<UploadReceipt, RequestError>;

    /// Permanently remove a document.
    async fn delete_document(&self, doc_id: &str) -> Result<DeleteReceipt, RequestError>;

    /// Summarize one document.
    async fn summarize_document(
        &self,
        doc_id: &str,
        style: SummaryStyle,
    ) -> Result<SummaryResponse, RequestError>;

    /// Produce one summary spanning several documents.
    async fn summarize_combined(
        &self,
        doc_ids: &[String],
        style: SummaryStyle,
    ) -> Result<CombinedSummaryResponse, RequestError>;

    /// Ask a question about one or more documents.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, RequestError>;
}
