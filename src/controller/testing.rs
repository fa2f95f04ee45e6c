//! In-memory backend used by the controller's unit tests.

use crate::backend::{
    ChatRequest, ChatResponse, ChatTarget, CombinedSummaryResponse, DeleteReceipt, DocumentBackend,
    DocumentList, DocumentRecord, RequestError, SummaryResponse, SummaryStyle, UploadFile,
    UploadReceipt, parse_timestamp,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub(crate) fn record(id: &str) -> DocumentRecord {
    DocumentRecord {
        id: id.into(),
        filename: format!("{id}.pdf"),
        case_id: None,
        uploaded_at: parse_timestamp("2024-05-01T10:00:00Z").expect("timestamp"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    List(Option<String>),
    Get(String),
    Upload {
        filename: String,
        case_id: Option<String>,
    },
    Delete(String),
    Summary {
        doc_id: String,
        style: SummaryStyle,
    },
    CombinedSummary {
        doc_ids: Vec<String>,
        style: SummaryStyle,
    },
    Chat(ChatRequest),
}

fn rejected(message: &str) -> RequestError {
    RequestError::Status {
        status: StatusCode::BAD_REQUEST,
        message: message.to_string(),
    }
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    calls: Mutex<Vec<Call>>,
    documents: Mutex<Vec<DocumentRecord>>,
    upload_failures: HashMap<String, String>,
    fail_summary: Option<String>,
    fail_chat: Option<String>,
    fail_delete: Option<String>,
    fail_get: Option<String>,
    gate: Option<Arc<Notify>>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_documents(self, ids: &[&str]) -> Self {
        *self.documents.lock().expect("documents") = ids.iter().map(|id| record(id)).collect();
        self
    }

    pub(crate) fn reject_upload(mut self, filename: &str, reason: &str) -> Self {
        self.upload_failures
            .insert(filename.to_string(), reason.to_string());
        self
    }

    pub(crate) fn fail_summary(mut self, message: &str) -> Self {
        self.fail_summary = Some(message.to_string());
        self
    }

    pub(crate) fn fail_chat(mut self, message: &str) -> Self {
        self.fail_chat = Some(message.to_string());
        self
    }

    pub(crate) fn fail_delete(mut self, message: &str) -> Self {
        self.fail_delete = Some(message.to_string());
        self
    }

    pub(crate) fn fail_get(mut self, message: &str) -> Self {
        self.fail_get = Some(message.to_string());
        self
    }

    /// Hold summary and chat responses until the returned handle is notified.
    pub(crate) fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls").clone()
    }

    fn record_call(&self, call: Call) {
        self.calls.lock().expect("calls").push(call);
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl DocumentBackend for FakeBackend {
    async fn list_documents(&self, case_id: Option<&str>) -> Result<DocumentList, RequestError> {
        self.record_call(Call::List(case_id.map(str::to_string)));
        let documents = self.documents.lock().expect("documents").clone();
        Ok(DocumentList {
            total: documents.len(),
            documents,
        })
    }

    async fn get_document(&self, doc_id: &str) -> Result<DocumentRecord, RequestError> {
        self.record_call(Call::Get(doc_id.to_string()));
        if let Some(message) = &self.fail_get {
            return Err(rejected(message));
        }
        Ok(record(doc_id))
    }

    async fn upload_document(
        &self,
        file: &UploadFile,
        case_id: Option<&str>,
    ) -> Result<UploadReceipt, RequestError> {
        self.record_call(Call::Upload {
            filename: file.filename.clone(),
            case_id: case_id.map(str::to_string),
        });
        if let Some(reason) = self.upload_failures.get(&file.filename) {
            return Err(rejected(reason));
        }
        let mut documents = self.documents.lock().expect("documents");
        let id = format!("doc{}", documents.len() + 1);
        documents.push(record(&id));
        Ok(UploadReceipt {
            id,
            filename: file.filename.clone(),
            message: "Document uploaded".into(),
        })
    }

    async fn delete_document(&self, doc_id: &str) -> Result<DeleteReceipt, RequestError> {
        self.record_call(Call::Delete(doc_id.to_string()));
        if let Some(message) = &self.fail_delete {
            return Err(rejected(message));
        }
        self.documents
            .lock()
            .expect("documents")
            .retain(|document| document.id != doc_id);
        Ok(DeleteReceipt {
            message: "Document deleted".into(),
            doc_id: doc_id.to_string(),
        })
    }

    async fn summarize_document(
        &self,
        doc_id: &str,
        style: SummaryStyle,
    ) -> Result<SummaryResponse, RequestError> {
        self.record_call(Call::Summary {
            doc_id: doc_id.to_string(),
            style,
        });
        self.wait_for_gate().await;
        if let Some(message) = &self.fail_summary {
            return Err(rejected(message));
        }
        Ok(SummaryResponse {
            doc_id: doc_id.to_string(),
            summary_type: style.to_string(),
            summary: format!("{style} summary of {doc_id}"),
        })
    }

    async fn summarize_combined(
        &self,
        doc_ids: &[String],
        style: SummaryStyle,
    ) -> Result<CombinedSummaryResponse, RequestError> {
        self.record_call(Call::CombinedSummary {
            doc_ids: doc_ids.to_vec(),
            style,
        });
        self.wait_for_gate().await;
        if let Some(message) = &self.fail_summary {
            return Err(rejected(message));
        }
        Ok(CombinedSummaryResponse {
            doc_ids: doc_ids.to_vec(),
            summary_type: style.to_string(),
            summary: format!("{style} summary of {}", doc_ids.join("+")),
        })
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, RequestError> {
        self.record_call(Call::Chat(request.clone()));
        self.wait_for_gate().await;
        if let Some(message) = &self.fail_chat {
            return Err(rejected(message));
        }
        Ok(ChatResponse {
            answer: format!("answer to: {}", request.message),
            doc_id: match &request.target {
                ChatTarget::Single(doc_id) => Some(doc_id.clone()),
                ChatTarget::Multiple(_) => None,
            },
        })
    }
}
