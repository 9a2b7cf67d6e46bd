//! Generation backend integration
//!
//! The backend is a black box reached over two routes: a JSON route for
//! text-only submissions and a multipart route for submissions with a file.

mod http;
mod payload;
mod reply;

use async_trait::async_trait;
use thiserror::Error;

pub use http::{download_url, HttpTransport};
pub use payload::{GenerateRequest, DEFAULT_LANGUAGE};
pub use reply::classify;

/// Transport-level failures
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Request timed out after 30 seconds")]
    Timeout,

    #[error("Unexpected response format:\n{0}")]
    UnexpectedFormat(String),

    #[error("{0}")]
    Status(String),

    #[error("Invalid response: {0}")]
    InvalidJson(String),
}

/// Backend route used for a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Generate,
    GenerateWithFile,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Generate => "/generate",
            Endpoint::GenerateWithFile => "/generate-with-file",
        }
    }
}

/// A file attached to a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// MIME type guessed from the file extension
    pub fn mime_type(&self) -> &'static str {
        let extension = self
            .name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "txt" | "feature" => "text/plain",
            "pdf" => "application/pdf",
            "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "py" => "text/x-python",
            "js" | "jsx" => "text/javascript",
            "ts" | "tsx" => "text/x-typescript",
            "html" => "text/html",
            "css" => "text/css",
            _ => "application/octet-stream",
        }
    }
}

/// A request ready for the wire. The variant decides the route, so a file
/// can never travel over the JSON route or be left off the multipart one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundRequest {
    Json(GenerateRequest),
    Multipart {
        payload: GenerateRequest,
        file: Attachment,
    },
}

impl OutboundRequest {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            OutboundRequest::Json(_) => Endpoint::Generate,
            OutboundRequest::Multipart { .. } => Endpoint::GenerateWithFile,
        }
    }

    pub fn payload(&self) -> &GenerateRequest {
        match self {
            OutboundRequest::Json(payload) | OutboundRequest::Multipart { payload, .. } => payload,
        }
    }
}

/// Undecoded backend response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReply {
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

impl RawReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type.contains("application/json")
    }
}

#[cfg(test)]
impl RawReply {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            content_type: "application/json".into(),
            body: body.to_string(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/html; charset=utf-8".into(),
            body: body.to_string(),
        }
    }
}

/// Sends generation requests to the backend
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<RawReply, BackendError>;
}
