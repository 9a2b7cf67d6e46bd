//! Conversation orchestrator
//!
//! The Orchestrator owns the chat state and performs the request/response
//! cycle for every submission:
//! 1. Checks that a feature is selected
//! 2. Appends the user message and raises the loading flag
//! 3. Builds the payload and dispatches it under a fixed deadline
//! 4. Classifies the reply into exactly one assistant message
//! 5. Appends it and lowers the loading flag

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::{classify, Attachment, BackendError, GenerateRequest, OutboundRequest, Transport};
use crate::conversation::{Conversation, IdSource, Message};
use crate::selection::{Feature, Selection, SelectionError, Task};

/// Deadline for every backend call
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const SELECT_FEATURE_NOTICE: &str =
    "Please select a feature (Test Case Generator or Selenium Script Generator) first.";

#[derive(Debug, Default)]
struct ChatState {
    selection: Selection,
    conversation: Conversation,
    loading: bool,
}

/// Read-only view handed to the rendering layer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub selection: Selection,
    pub loading: bool,
    pub conversation_id: Uuid,
    pub messages: Vec<Message>,
}

/// How a submission ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The backend call settled and its reply was recorded
    Replied,
    /// No feature selected; only the selection notice was appended
    NeedsFeature,
    /// Another submission is still in flight; nothing was appended
    Busy,
}

/// Submission accepted for dispatch
struct Accepted {
    feature: Feature,
    task: Option<Task>,
    conversation_id: Uuid,
}

pub struct Orchestrator {
    transport: Arc<dyn Transport>,
    ids: IdSource,
    state: RwLock<ChatState>,
}

impl Orchestrator {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            ids: IdSource::new(),
            state: RwLock::new(ChatState::default()),
        }
    }

    pub async fn snapshot(&self) -> Snapshot {
        let state = self.state.read().await;
        Snapshot {
            selection: state.selection.clone(),
            loading: state.loading,
            conversation_id: state.conversation.id,
            messages: state.conversation.messages.clone(),
        }
    }

    #[cfg(test)]
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    #[cfg(test)]
    pub async fn selection(&self) -> Selection {
        self.state.read().await.selection.clone()
    }

    #[cfg(test)]
    pub async fn messages(&self) -> Vec<Message> {
        self.state.read().await.conversation.messages.clone()
    }

    /// Switch topic. Any selection call discards the current history.
    pub async fn select(
        &self,
        feature: Option<Feature>,
        task: Option<Task>,
    ) -> Result<(), SelectionError> {
        let mut state = self.state.write().await;
        state.selection.select(feature, task)?;
        state.conversation.reset();
        tracing::info!(selection = ?state.selection, "Selection changed, conversation cleared");
        Ok(())
    }

    /// Clear both the history and the selection
    pub async fn new_chat(&self) {
        let mut state = self.state.write().await;
        state.selection.clear();
        state.conversation.reset();
        tracing::info!(conversation_id = %state.conversation.id, "Started new chat");
    }

    /// Submit text over the JSON route
    pub async fn send_text(&self, content: &str) -> SendOutcome {
        let user_message = |id| Message::user(id, content);
        let accepted = match self.begin(user_message).await {
            Ok(accepted) => accepted,
            Err(outcome) => return outcome,
        };

        let payload =
            GenerateRequest::build(accepted.feature, accepted.task.as_ref(), content, &self.ids);
        self.dispatch(accepted, OutboundRequest::Json(payload)).await;
        SendOutcome::Replied
    }

    /// Submit a file plus optional text over the multipart route.
    ///
    /// Empty text is shown as a placeholder in the history but sent as-is.
    pub async fn send_file(&self, file: Attachment, content: &str) -> SendOutcome {
        let display = if content.is_empty() {
            format!("File upload: {}", file.name)
        } else {
            content.to_string()
        };
        let file_name = file.name.clone();
        let user_message = |id| Message::user_with_file(id, display, &file_name);
        let accepted = match self.begin(user_message).await {
            Ok(accepted) => accepted,
            Err(outcome) => return outcome,
        };

        let payload =
            GenerateRequest::build(accepted.feature, accepted.task.as_ref(), content, &self.ids);
        self.dispatch(accepted, OutboundRequest::Multipart { payload, file })
            .await;
        SendOutcome::Replied
    }

    /// Append the user message and raise the loading flag, or append the
    /// selection notice when no feature is chosen. The loading check and the
    /// raise happen under one write lock, so only one submission is in flight.
    async fn begin(
        &self,
        user_message: impl FnOnce(String) -> Message,
    ) -> Result<Accepted, SendOutcome> {
        let mut state = self.state.write().await;

        if state.loading {
            tracing::debug!("Submission rejected, a request is already in flight");
            return Err(SendOutcome::Busy);
        }

        let Some(feature) = state.selection.feature else {
            tracing::warn!("Submission without a selected feature");
            let notice = Message::system(self.ids.message_id(), SELECT_FEATURE_NOTICE);
            state.conversation.push(notice);
            return Err(SendOutcome::NeedsFeature);
        };

        state.conversation.push(user_message(self.ids.message_id()));
        state.loading = true;

        Ok(Accepted {
            feature,
            task: state.selection.task.clone(),
            conversation_id: state.conversation.id,
        })
    }

    async fn dispatch(&self, accepted: Accepted, request: OutboundRequest) {
        let endpoint = request.endpoint();
        tracing::debug!(
            ?endpoint,
            agent_type = request.payload().agent_type(),
            "Dispatching generation request"
        );

        // Dropping the send future on expiry aborts the in-flight call
        let result = match tokio::time::timeout(REQUEST_TIMEOUT, self.transport.send(request)).await
        {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(?endpoint, "Generation request timed out");
                Err(BackendError::Timeout)
            }
        };

        let id = self.ids.message_id();
        let reply = match classify(result) {
            Ok(generated) => {
                tracing::info!(filename = ?generated.filename, "Generation succeeded");
                Message::assistant(
                    id,
                    generated.content,
                    accepted.feature.renders_code(),
                    generated.filename,
                )
            }
            Err(e) => {
                tracing::warn!(error = %e, "Generation failed");
                Message::assistant_error(id, e.to_string())
            }
        };

        let mut state = self.state.write().await;
        if state.conversation.id == accepted.conversation_id {
            state.conversation.push(reply);
        } else {
            tracing::debug!("Conversation was reset while in flight, dropping reply");
        }
        state.loading = false;
    }
}
