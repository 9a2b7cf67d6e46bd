//! Conversation types and state management

mod ids;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use ids::IdSource;

/// A single entry in the chat history. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,

    /// Set only on user messages created from a file submission
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_file: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_kind: Option<FileKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_code: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,

    /// Server-assigned artifact name, downloadable through the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Message {
    fn bare(id: String, role: Role, content: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: content.into(),
            has_file: None,
            file_name: None,
            file_kind: None,
            is_code: None,
            is_error: None,
            filename: None,
            created_at: Utc::now(),
        }
    }

    pub fn system(id: String, content: impl Into<String>) -> Self {
        Self::bare(id, Role::System, content)
    }

    pub fn user(id: String, content: impl Into<String>) -> Self {
        Self::bare(id, Role::User, content)
    }

    /// A user message that carries an attached file
    pub fn user_with_file(id: String, content: impl Into<String>, file_name: &str) -> Self {
        Self {
            has_file: Some(true),
            file_name: Some(file_name.to_string()),
            file_kind: Some(FileKind::from_file_name(file_name)),
            ..Self::bare(id, Role::User, content)
        }
    }

    /// A successful generator reply
    pub fn assistant(
        id: String,
        content: impl Into<String>,
        is_code: bool,
        filename: Option<String>,
    ) -> Self {
        Self {
            is_code: Some(is_code),
            filename,
            ..Self::bare(id, Role::Assistant, content)
        }
    }

    /// An assistant message describing a failed request. Never carries a filename.
    pub fn assistant_error(id: String, content: impl Into<String>) -> Self {
        Self {
            is_error: Some(true),
            ..Self::bare(id, Role::Assistant, content)
        }
    }

    #[cfg(test)]
    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }
}

/// Coarse file category used by the rendering layer to pick an icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Pdf,
    Code,
    Document,
    Feature,
    Text,
    Other,
}

impl FileKind {
    pub fn from_file_name(name: &str) -> Self {
        let extension = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => FileKind::Pdf,
            "py" | "js" | "jsx" | "ts" | "tsx" | "html" | "css" => FileKind::Code,
            "docx" | "doc" => FileKind::Document,
            "feature" => FileKind::Feature,
            "txt" => FileKind::Text,
            _ => FileKind::Other,
        }
    }
}

/// Append-only message history for one chat session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            messages: Vec::new(),
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Discard the history and start a fresh session
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
