//! HTTP client wrapper for the document RAG service.

use crate::backend::{
    DocumentBackend,
    message::extract_error_message,
    types::{
        ChatRequest, ChatResponse, CombinedSummaryBody, CombinedSummaryResponse, DeleteReceipt,
        DocumentList, DocumentRecord, RequestError, SummaryBody, SummaryResponse, SummaryStyle,
        UploadFile, UploadReceipt,
    },
};
use crate::config::{Config, get_config};
use async_trait::async_trait;
use reqwest::{
    Client, Method, Url,
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;

/// Lightweight HTTP client for document service operations.
///
/// Every call performs exactly one request; there is no retry and no client-side timeout.
pub struct DocumentApiClient {
    pub(crate) client: Client,
    pub(crate) base_url: String,
}

impl DocumentApiClient {
    /// Construct a new client using configuration derived from the environment.
    pub fn new() -> Result<Self, RequestError> {
        Self::from_config(get_config())
    }

    /// Construct a client from an explicit configuration.
    pub fn from_config(config: &Config) -> Result<Self, RequestError> {
        let client = Client::builder().user_agent(&config.user_agent).build()?;
        let base_url = normalize_base_url(&config.api_base_url).map_err(RequestError::InvalidUrl)?;
        tracing::debug!(url = %base_url, "Initialized document service client");
        Ok(Self { client, base_url })
    }

    /// Base URL every request path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format_endpoint(&self.base_url, path);
        tracing::debug!(%method, %url, "Sending request");
        self.client.request(method, url)
    }

    /// Request against `documents/{doc_id}[/{action}]` with the id encoded as one path segment.
    fn document_request(
        &self,
        method: Method,
        doc_id: &str,
        action: Option<&str>,
    ) -> Result<reqwest::RequestBuilder, RequestError> {
        let url = document_url(&self.base_url, doc_id, action)?;
        tracing::debug!(%method, %url, "Sending request");
        Ok(self.client.request(method, url))
    }

    async fn decode<T>(&self, response: reqwest::Response, operation: &str) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
    {
        if response.status().is_success() {
            return Ok(response.json().await?);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let error = RequestError::Status {
            status,
            message: extract_error_message(&body),
        };
        tracing::error!(operation, %status, error = %error, "Document service request failed");
        Err(error)
    }
}

#[async_trait]
impl DocumentBackend for DocumentApiClient {
    async fn list_documents(&self, case_id: Option<&str>) -> Result<DocumentList, RequestError> {
        let mut request = self.request(Method::GET, "documents/");
        if let Some(case_id) = case_id.map(str::trim).filter(|value| !value.is_empty()) {
            request = request.query(&[("case_id", case_id)]);
        }
        let response = request.send().await?;
        self.decode(response, "list_documents").await
    }

    async fn get_document(&self, doc_id: &str) -> Result<DocumentRecord, RequestError> {
        let response = self
            .document_request(Method::GET, doc_id, None)?
            .send()
            .await?;
        self.decode(response, "get_document").await
    }

    async fn upload_document(
        &self,
        file: &UploadFile,
        case_id: Option<&str>,
    ) -> Result<UploadReceipt, RequestError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.filename.clone())
            .mime_str(&file.content_type)?;
        let mut form = Form::new().part("file", part);
        if let Some(case_id) = case_id.map(str::trim).filter(|value| !value.is_empty()) {
            form = form.text("case_id", case_id.to_string());
        }

        let response = self
            .request(Method::POST, "documents/")
            .multipart(form)
            .send()
            .await?;
        self.decode(response, "upload_document").await
    }

    async fn delete_document(&self, doc_id: &str) -> Result<DeleteReceipt, RequestError> {
        let response = self
            .document_request(Method::DELETE, doc_id, None)?
            .send()
            .await?;
        self.decode(response, "delete_document").await
    }

    async fn summarize_document(
        &self,
        doc_id: &str,
        style: SummaryStyle,
    ) -> Result<SummaryResponse, RequestError> {
        let response = self
            .document_request(Method::POST, doc_id, Some("summary"))?
            .json(&SummaryBody {
                summary_type: style,
            })
            .send()
            .await?;
        self.decode(response, "summarize_document").await
    }

    async fn summarize_combined(
        &self,
        doc_ids: &[String],
        style: SummaryStyle,
    ) -> Result<CombinedSummaryResponse, RequestError> {
        let response = self
            .request(Method::POST, "documents/combined-summary")
            .json(&CombinedSummaryBody {
                doc_ids,
                summary_type: style,
            })
            .send()
            .await?;
        self.decode(response, "summarize_combined").await
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, RequestError> {
        let response = self
            .request(Method::POST, "documents/chat")
            .json(request)
            .send()
            .await?;
        self.decode(response, "chat").await
    }
}

fn normalize_base_url(url: &str) -> Result<String, String> {
    let mut parsed = reqwest::Url::parse(url).map_err(|err| err.to_string())?;
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);
    Ok(parsed.to_string())
}

fn document_url(base: &str, doc_id: &str, action: Option<&str>) -> Result<Url, RequestError> {
    let mut url = Url::parse(base).map_err(|err| RequestError::InvalidUrl(err.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| RequestError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .push("documents")
        .push(doc_id)
        .extend(action);
    Ok(url)
}

fn format_endpoint(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}
