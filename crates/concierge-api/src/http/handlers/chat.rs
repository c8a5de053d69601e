//! Chat session HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/chat/sessions               - Open a session
//! - GET    /api/v1/chat/sessions/{id}          - Transcript and flags
//! - POST   /api/v1/chat/sessions/{id}/messages - Send a visitor message
//! - DELETE /api/v1/chat/sessions/{id}          - Close the session
//!
//! Open sessions live in `AppState::sessions` until they are closed or
//! swept as idle. Opening fails with 503 once the live-session cap is hit.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use concierge_core::chat::session::SessionSnapshot;
use concierge_types::chat::{SendOutcome, SessionStatus};

use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::{AppState, ConcreteChatSession};

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub outcome: SendOutcome,
    /// Whether the transcript changed; clients can skip re-rendering if not.
    pub appended: bool,
    pub session: SessionSnapshot,
}

#[derive(Debug, Serialize)]
pub struct CloseSessionResponse {
    pub id: Uuid,
    pub status: SessionStatus,
    /// Whether a summary is being generated in the background.
    pub summarizing: bool,
}

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

fn find_session(state: &AppState, id: &str) -> Result<Arc<ConcreteChatSession>, AppError> {
    let id = parse_uuid(id)?;
    state
        .sessions
        .get(&id)
        .ok_or_else(|| AppError::SessionNotFound(id.to_string()))
}

fn session_link(id: Uuid) -> String {
    format!("/api/v1/chat/sessions/{id}")
}

/// POST /api/v1/chat/sessions - Open a session seeded with the greeting.
pub async fn open_session(
    State(state): State<AppState>,
) -> Result<ApiResponse<SessionSnapshot>, AppError> {
    let timer = RequestTimer::start();
    let chat_service = state
        .chat_service
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("Chat is disabled: no model API key configured".to_string()))?;

    let session = Arc::new(chat_service.open_session());
    let snapshot = session.snapshot();
    state.sessions.insert(session).map_err(|full| {
        warn!(max_live = full.max_live, "Refusing new chat session: live session cap reached");
        AppError::Unavailable("Too many open chat sessions, please try again shortly".to_string())
    })?;
    info!(session_id = %snapshot.id, live_sessions = state.sessions.len(), "Opened chat session over HTTP");

    let link = session_link(snapshot.id);
    Ok(timer.finish(snapshot).with_link("self", &link))
}

/// GET /api/v1/chat/sessions/{id} - Current transcript and flags.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<SessionSnapshot>, AppError> {
    let timer = RequestTimer::start();
    let session = find_session(&state, &id)?;
    Ok(timer.finish(session.snapshot()))
}

/// POST /api/v1/chat/sessions/{id}/messages - Send a visitor message.
///
/// The send runs on its own task so that a client disconnect cannot drop
/// it halfway and leave the session stuck awaiting a reply.
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<ApiResponse<SendMessageResponse>, AppError> {
    let timer = RequestTimer::start();
    let session = find_session(&state, &id)?;

    let task_session = Arc::clone(&session);
    let outcome = tokio::spawn(async move { task_session.send(&body.text).await })
        .await
        .map_err(|e| AppError::Internal(format!("chat turn task failed: {e}")))?;

    debug!(session_id = %session.id(), ?outcome, "Chat turn handled over HTTP");
    Ok(timer.finish(SendMessageResponse {
        outcome,
        appended: outcome.appended(),
        session: session.snapshot(),
    }))
}

/// DELETE /api/v1/chat/sessions/{id} - Close the session.
///
/// Removes it from the live registry; summarization continues detached.
pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<CloseSessionResponse>, AppError> {
    let timer = RequestTimer::start();
    let id = parse_uuid(&id)?;
    let session = state
        .sessions
        .remove(&id)
        .ok_or_else(|| AppError::SessionNotFound(id.to_string()))?;

    let summarizing = session.close().is_some();
    info!(session_id = %id, summarizing, "Closed chat session over HTTP");

    Ok(timer.finish(CloseSessionResponse {
        id,
        status: session.status(),
        summarizing,
    }))
}
