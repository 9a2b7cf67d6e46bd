//! Backend reply classification

use serde::Deserialize;
use thiserror::Error;

use super::{BackendError, RawReply};

const GENERIC_FAILURE: &str = "Failed to generate response";
const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// JSON body returned by both generation routes
#[derive(Debug, Default, Deserialize)]
struct ReplyBody {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// A successful generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub content: String,
    pub filename: Option<String>,
}

/// Why a submission produced no artifact. Both kinds render the same way;
/// only the message text differs.
#[derive(Debug, Error)]
pub enum ReplyError {
    #[error(transparent)]
    Transport(#[from] BackendError),

    #[error("{0}")]
    Application(String),
}

/// Turn a transport result into either generated content or an error.
pub fn classify(result: Result<RawReply, BackendError>) -> Result<Generated, ReplyError> {
    let raw = result?;

    if !raw.is_json() {
        return Err(BackendError::UnexpectedFormat(raw.body).into());
    }

    let body: ReplyBody = serde_json::from_str(&raw.body)
        .map_err(|e| BackendError::InvalidJson(e.to_string()))?;

    if !raw.is_success() {
        let message = body
            .message
            .or(body.detail)
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());
        return Err(BackendError::Status(message).into());
    }

    match body.status.as_deref() {
        Some("success") => Ok(Generated {
            content: body.content.unwrap_or_default(),
            filename: body.filename.filter(|name| !name.is_empty()),
        }),
        Some("error") => Err(ReplyError::Application(
            body.message.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
        )),
        _ => Err(ReplyError::Application(
            body.message.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
        )),
    }
}
