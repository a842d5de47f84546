//! Axum route handlers for the verification conversation API.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dialogue::orchestrator::TurnOutcome;
use crate::errors::AppError;
use crate::models::session::Session;
use crate::sessions::transcript::Transcript;
use crate::state::AppState;
use crate::verification::state_machine::Stage;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AgentResponse {
    pub session_id: Uuid,
    pub agent_text: String,
    pub audio_ref: Option<String>,
    pub audio_available: bool,
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

impl From<TurnOutcome> for AgentResponse {
    fn from(outcome: TurnOutcome) -> Self {
        AgentResponse {
            session_id: outcome.session_id,
            agent_text: outcome.agent_text,
            audio_ref: outcome.audio_ref,
            audio_available: outcome.audio_available,
            stage: outcome.stage,
            suggestions: outcome.suggestions,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TranscriptListResponse {
    pub transcripts: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/session/create
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<Json<AgentResponse>, AppError> {
    let outcome = state.orchestrator.create_session().await?;
    Ok(Json(outcome.into()))
}

/// POST /api/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<AgentResponse>, AppError> {
    let outcome = state
        .orchestrator
        .chat_turn(req.session_id, &req.message)
        .await?;
    Ok(Json(outcome.into()))
}

/// GET /api/session/:session_id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Session>, AppError> {
    let session = state.orchestrator.sessions.get(session_id).await?;
    Ok(Json(session))
}

/// GET /api/audio/:filename
pub async fn handle_get_audio(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let audio = state.orchestrator.audio.load(&filename).await?;
    Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio))
}

/// DELETE /api/audio/:filename
pub async fn handle_delete_audio(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<StatusCode, AppError> {
    state.orchestrator.audio.delete(&filename).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/transcripts
pub async fn handle_list_transcripts(
    State(state): State<AppState>,
) -> Result<Json<TranscriptListResponse>, AppError> {
    let transcripts = state.orchestrator.transcripts.list().await?;
    Ok(Json(TranscriptListResponse { transcripts }))
}

/// GET /api/transcript/:session_id
pub async fn handle_get_transcript(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Transcript>, AppError> {
    let transcript = state.orchestrator.transcripts.load(session_id).await?;
    Ok(Json(transcript))
}
