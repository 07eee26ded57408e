//! HTTP route handlers for the PDF chat API.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;
use tracing::{error, warn};

use crate::core::document::UploadedDocument;
use crate::core::errors::ChatError;
use crate::core::outcome::Outcome;
use crate::ingest::ProcessReport;
use crate::interaction::SessionView;

use super::state::AppState;

type ApiResult<T> = Result<Json<ActionResponse<T>>, (StatusCode, String)>;

/// Create the API router with all routes and the single page as fallback.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/session", get(session_view))
        .route("/api/conversations", post(create_conversation))
        .route("/api/conversations/select", post(select_conversation))
        .route("/api/process", post(process_documents))
        .route("/api/ask", post(ask_question))
        .fallback_service(ServeDir::new(&state.static_dir))
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "pdf-chat",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Whether the action ran or was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionStatus {
    /// Action ran.
    Ok,
    /// Action refused with a user warning.
    Warning,
}

/// Body of every action response.
#[derive(Debug, Serialize)]
pub struct ActionResponse<T> {
    /// Outcome kind.
    pub status: ActionStatus,
    /// Warning text, when refused.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Action result, when it ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    /// Session after the action.
    pub session: SessionView,
}

impl<T> ActionResponse<T> {
    fn from_outcome(outcome: Outcome<T>, session: SessionView) -> Self {
        match outcome {
            Outcome::Done(result) => Self {
                status: ActionStatus::Ok,
                message: None,
                result: Some(result),
                session,
            },
            Outcome::Warned(warning) => Self {
                status: ActionStatus::Warning,
                message: Some(warning.to_string()),
                result: None,
                session,
            },
        }
    }
}

fn service_error(err: &ChatError) -> (StatusCode, String) {
    error!("Action failed: {err}");
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

/// Current session snapshot.
async fn session_view(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    Json(state.interaction.lock().await.view())
}

/// Conversation name payload.
#[derive(Debug, Deserialize)]
pub struct ConversationRequest {
    /// Conversation name.
    pub name: String,
}

async fn create_conversation(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConversationRequest>,
) -> ApiResult<()> {
    let mut interaction = state.interaction.lock().await;
    let outcome = interaction.create_conversation(&request.name);
    Ok(Json(ActionResponse::from_outcome(outcome, interaction.view())))
}

async fn select_conversation(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConversationRequest>,
) -> ApiResult<()> {
    let mut interaction = state.interaction.lock().await;
    let outcome = interaction.select_conversation(&request.name);
    Ok(Json(ActionResponse::from_outcome(outcome, interaction.view())))
}

/// Read every file part of the upload form.
async fn read_uploads(mut multipart: Multipart) -> Result<Vec<UploadedDocument>, (StatusCode, String)> {
    let bad_request = |err: axum::extract::multipart::MultipartError| {
        warn!("Rejected upload: {err}");
        (StatusCode::BAD_REQUEST, format!("Malformed upload: {err}"))
    };

    let mut uploads = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        if file_name.is_empty() {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(bad_request)?;
        uploads.push(UploadedDocument::new(file_name, content_type, bytes.to_vec()));
    }
    Ok(uploads)
}

async fn process_documents(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<ProcessReport> {
    let uploads = read_uploads(multipart).await?;
    let mut interaction = state.interaction.lock().await;
    let outcome = interaction
        .process_documents(uploads)
        .await
        .map_err(|err| service_error(&err))?;
    Ok(Json(ActionResponse::from_outcome(outcome, interaction.view())))
}

/// Question payload.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Question text.
    pub question: String,
}

/// Answer returned to the page.
#[derive(Debug, Serialize)]
pub struct AskResult {
    /// Answer text.
    pub answer: String,
    /// Context chunks the answer was generated from.
    pub sources: Vec<String>,
}

async fn ask_question(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AskRequest>,
) -> ApiResult<AskResult> {
    let mut interaction = state.interaction.lock().await;
    let outcome = match interaction.ask(&request.question).await {
        Ok(Outcome::Done(answer)) => Outcome::Done(AskResult {
            answer: answer.text,
            sources: answer.sources.into_iter().map(|chunk| chunk.text).collect(),
        }),
        Ok(Outcome::Warned(warning)) => Outcome::Warned(warning),
        Err(err) => return Err(service_error(&err)),
    };
    Ok(Json(ActionResponse::from_outcome(outcome, interaction.view())))
}
