//! API routes consumed by the browser rendering layer

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::backend::{download_url, Attachment};
use crate::core::{SendOutcome, Snapshot};
use crate::selection::{Feature, SelectionError, Task};
use crate::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FeatureInfo {
    name: Feature,
    agent_type: &'static str,
    tasks: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    #[serde(default)]
    pub feature: Option<Feature>,
    #[serde(default)]
    pub task: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
struct SessionSummary {
    id: u32,
    name: &'static str,
    timestamp: &'static str,
}

static SESSIONS: [SessionSummary; 3] = [
    SessionSummary {
        id: 1,
        name: "Session 1",
        timestamp: "2 hours ago",
    },
    SessionSummary {
        id: 2,
        name: "Session 2",
        timestamp: "5 hours ago",
    },
    SessionSummary {
        id: 3,
        name: "Session 3",
        timestamp: "Yesterday",
    },
];

/// Errors surfaced to the rendering layer before a submission reaches the orchestrator
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Message content is empty")]
    EmptyContent,

    #[error("A request is already in progress")]
    Busy,

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFile(String),

    #[error("Invalid upload: {0}")]
    Upload(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::EmptyContent
            | ApiError::Selection(_)
            | ApiError::UnsupportedLanguage(_)
            | ApiError::Upload(_) => StatusCode::BAD_REQUEST,
            ApiError::Busy => StatusCode::CONFLICT,
            ApiError::UnsupportedFile(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "status": "error",
            "message": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn features(State(state): State<AppState>) -> Json<Vec<FeatureInfo>> {
    let features = Feature::ALL
        .iter()
        .map(|&feature| FeatureInfo {
            name: feature,
            agent_type: feature.agent_type(),
            tasks: match feature {
                Feature::TestCaseGenerator => Vec::new(),
                Feature::SeleniumScriptGenerator => state.config.client.selenium.languages.clone(),
            },
        })
        .collect();
    Json(features)
}

async fn snapshot(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.orchestrator.snapshot().await)
}

async fn select(
    State(state): State<AppState>,
    Json(request): Json<SelectionRequest>,
) -> Result<Json<Snapshot>, ApiError> {
    if let Some(language) = &request.task {
        if !state.config.client.selenium.languages.contains(language) {
            return Err(ApiError::UnsupportedLanguage(language.clone()));
        }
    }

    state
        .orchestrator
        .select(request.feature, request.task.map(Task::language))
        .await?;
    Ok(Json(state.orchestrator.snapshot().await))
}

async fn new_chat(State(state): State<AppState>) -> Json<Snapshot> {
    state.orchestrator.new_chat().await;
    Json(state.orchestrator.snapshot().await)
}

async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<SendRequest>,
) -> Result<Json<Snapshot>, ApiError> {
    if request.content.trim().is_empty() {
        return Err(ApiError::EmptyContent);
    }

    // Spawned so a client disconnect cannot cancel the send halfway
    let orchestrator = state.orchestrator.clone();
    let outcome = tokio::spawn(async move { orchestrator.send_text(&request.content).await })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    settled(&state, outcome).await
}

async fn send_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Snapshot>, ApiError> {
    let mut file = None;
    let mut content = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Upload(e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let name = field
                    .file_name()
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .ok_or_else(|| ApiError::Upload("file part has no file name".into()))?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Upload(e.to_string()))?;
                file = Some(Attachment::new(name, bytes.to_vec()));
            }
            Some("content") => {
                content = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Upload(e.to_string()))?;
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| ApiError::Upload("missing file part".into()))?;
    if !state.config.client.upload.accepts(&file.name) {
        return Err(ApiError::UnsupportedFile(file.name));
    }

    let orchestrator = state.orchestrator.clone();
    let outcome = tokio::spawn(async move { orchestrator.send_file(file, &content).await })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    settled(&state, outcome).await
}

async fn settled(state: &AppState, outcome: SendOutcome) -> Result<Json<Snapshot>, ApiError> {
    match outcome {
        SendOutcome::Busy => Err(ApiError::Busy),
        SendOutcome::Replied | SendOutcome::NeedsFeature => {
            Ok(Json(state.orchestrator.snapshot().await))
        }
    }
}

async fn sessions() -> Json<&'static [SessionSummary]> {
    Json(&SESSIONS[..])
}

async fn download(State(state): State<AppState>, Path(filename): Path<String>) -> Redirect {
    Redirect::temporary(&download_url(&state.config.backend_url, &filename))
}

/// `max_upload_bytes` caps the multipart body of the file route
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/features", get(features))
        .route("/api/state", get(snapshot))
        .route("/api/selection", post(select))
        .route("/api/new-chat", post(new_chat))
        .route("/api/messages", post(send_message))
        .route(
            "/api/messages/file",
            post(send_file).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/api/sessions", get(sessions))
        .route("/api/download/:filename", get(download))
}
