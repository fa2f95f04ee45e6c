//! Wire types exchanged with the document RAG service.

use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;
use time::{OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339};

/// Errors returned while talking to the document service.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Base URL failed to parse or normalize.
    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed before a usable response was received.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Service responded with a non-success status.
    #[error("{}", status_message(.status, .message))]
    Status {
        /// HTTP status returned by the service.
        status: StatusCode,
        /// Best-effort message extracted from the response body (may be empty).
        message: String,
    },
}

impl RequestError {
    /// Message suitable for a user-facing banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { status, message } => status_message(status, message),
            other => other.to_string(),
        }
    }
}

fn status_message(status: &StatusCode, message: &str) -> String {
    if message.is_empty() {
        format!("Request failed: {}", status.as_u16())
    } else {
        message.to_string()
    }
}

/// Summary flavours supported by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStyle {
    /// Two or three sentences.
    #[default]
    Brief,
    /// Topics, arguments, and outcomes.
    Detailed,
    /// Bullet list of the main points.
    KeyPoints,
}

impl SummaryStyle {
    /// Wire representation of the style.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Brief => "brief",
            Self::Detailed => "detailed",
            Self::KeyPoints => "key_points",
        }
    }
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SummaryStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "brief" => Ok(Self::Brief),
            "detailed" => Ok(Self::Detailed),
            "key_points" | "keypoints" => Ok(Self::KeyPoints),
            other => Err(format!(
                "unknown summary style '{other}' (expected brief, detailed, or key_points)"
            )),
        }
    }
}

/// Document metadata as stored by the service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DocumentRecord {
    /// Opaque server-assigned identifier.
    pub id: String,
    /// Original filename of the upload.
    pub filename: String,
    /// Optional case identifier grouping related documents.
    #[serde(default)]
    pub case_id: Option<String>,
    /// Upload time; naive timestamps are interpreted as UTC.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub uploaded_at: OffsetDateTime,
}

/// Response body of `GET /documents/`.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentList {
    /// Documents matching the request filter.
    pub documents: Vec<DocumentRecord>,
    /// Total number of matching documents reported by the service.
    pub total: usize,
}

/// Response body of `POST /documents/`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadReceipt {
    /// Identifier assigned to the new document.
    pub id: String,
    /// Filename recorded by the service.
    pub filename: String,
    /// Human-readable confirmation.
    pub message: String,
}

/// Response body of `DELETE /documents/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteReceipt {
    /// Human-readable confirmation.
    pub message: String,
    /// Identifier of the removed document.
    pub doc_id: String,
}

/// Response body of `POST /documents/{id}/summary`.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryResponse {
    /// Summarized document.
    pub doc_id: String,
    /// Style echoed by the service.
    pub summary_type: String,
    /// Generated summary text.
    pub summary: String,
}

/// Response body of `POST /documents/combined-summary`.
#[derive(Debug, Clone, Deserialize)]
pub struct CombinedSummaryResponse {
    /// Documents covered by the summary.
    pub doc_ids: Vec<String>,
    /// Style echoed by the service.
    pub summary_type: String,
    /// Generated summary text.
    pub summary: String,
}

/// Response body of `POST /documents/chat`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Answer produced by the RAG pipeline.
    pub answer: String,
    /// Document the service attributes the answer to; absent for multi-document chats.
    #[serde(default)]
    pub doc_id: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct SummaryBody {
    pub(crate) summary_type: SummaryStyle,
}

#[derive(Serialize)]
pub(crate) struct CombinedSummaryBody<'a> {
    pub(crate) doc_ids: &'a [String],
    pub(crate) summary_type: SummaryStyle,
}

/// Documents a chat message is addressed to.
///
/// Serializes as exactly one of `doc_id` or `doc_ids`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ChatTarget {
    /// One selected document.
    #[serde(rename = "doc_id")]
    Single(String),
    /// Two or more selected documents, in selection order.
    #[serde(rename = "doc_ids")]
    Multiple(Vec<String>),
}

impl ChatTarget {
    /// Route a selection by cardinality; `None` for an empty selection.
    pub fn for_selection(ids: &[String]) -> Option<Self> {
        match ids {
            [] => None,
            [only] => Some(Self::Single(only.clone())),
            many => Some(Self::Multiple(many.to_vec())),
        }
    }
}

/// Request body of `POST /documents/chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    /// Addressed documents.
    #[serde(flatten)]
    pub target: ChatTarget,
    /// Trimmed user message.
    pub message: String,
}

/// A local file staged for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Name reported to the service and used in failure reports.
    pub filename: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
    /// MIME type of the contents.
    pub content_type: String,
}

impl UploadFile {
    /// Build an upload from in-memory contents, guessing the MIME type from the filename.
    pub fn from_bytes(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let content_type = mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            filename,
            bytes,
            content_type,
        }
    }

    /// Read a file from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::from_bytes(filename, bytes))
    }
}

/// Parse an RFC 3339 timestamp, or a naive ISO 8601 timestamp assumed to be UTC.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(value, &Rfc3339).or_else(|rfc_error| {
        PrimitiveDateTime::parse(
            value,
            time::macros::format_description!(
                "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
            ),
        )
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|_| rfc_error)
    })
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}
