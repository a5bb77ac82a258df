//! HTTP handlers for the chat page and session API

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ChataiError;
use crate::server::page::render_page;
use crate::server::AppState;
use crate::session::{ChatSession, Message, Role, UsageStats};

/// Error returned by API handlers, rendered as `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<ChataiError>() {
            Some(ChataiError::EmptyMessage) => StatusCode::BAD_REQUEST,
            Some(ChataiError::SessionNotFound(_)) => StatusCode::NOT_FOUND,
            Some(ChataiError::SessionBusy(_)) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("Request failed: {:#}", self.0);
        }
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// A log entry as rendered by the widget
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageView {
    pub role: Role,
    /// `user` or `assistant`
    pub tag: String,
    pub content: String,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role.clone(),
            tag: message.role.display_tag().to_string(),
            content: message.content.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsageView {
    pub count: u64,
    pub last_used: Option<String>,
}

impl From<&UsageStats> for UsageView {
    fn from(usage: &UsageStats) -> Self {
        Self {
            count: usage.count,
            last_used: usage.last_used_display(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
    pub id: Uuid,
    pub messages: Vec<MessageView>,
    pub usage: UsageView,
}

impl SessionView {
    fn new(id: Uuid, session: &ChatSession) -> Self {
        Self {
            id,
            messages: session.messages().iter().map(MessageView::from).collect(),
            usage: UsageView::from(session.usage()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub reply: String,
    pub messages: Vec<MessageView>,
    pub usage: UsageView,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_page(&state.chat))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let (id, handle) = state.sessions.create()?;
    let session = handle.lock().await;
    Ok((StatusCode::CREATED, Json(SessionView::new(id, &session))))
}

/// Current log and usage; waits for a pending reply to land first
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let handle = state.sessions.get(&id)?;
    let session = handle.lock().await;
    Ok(Json(SessionView::new(id, &session)))
}

pub async fn get_usage(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UsageView>, ApiError> {
    let handle = state.sessions.get(&id)?;
    let session = handle.lock().await;
    Ok(Json(UsageView::from(session.usage())))
}

/// Submit one user message; the call blocks until the reply is appended
///
/// A second submission while a reply is pending is rejected with 409. If the
/// request is dropped before the reply arrives the log is left unchanged.
pub async fn submit_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SubmitRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let handle = state.sessions.get(&id)?;
    let mut session = handle
        .try_lock()
        .map_err(|_| ChataiError::SessionBusy(id.to_string()))?;

    let reply = session.submit_message(&body.text).await?;

    Ok(Json(SubmitResponse {
        reply,
        messages: session.messages().iter().map(MessageView::from).collect(),
        usage: UsageView::from(session.usage()),
    }))
}

pub async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.sessions.remove(&id)?;
    Ok(StatusCode::NO_CONTENT)
}
