//! HTTP handlers for back-office endpoints.

use std::str::FromStr;

use axum::extract::{Json, Path, Query, State};
use axum::response::IntoResponse;

use super::dto::{AssignConsultantRequest, ConversationView, TranscriptQuery, TranscriptView};
use crate::adapters::http::{ApiError, AppState};
use crate::application::{AssignConsultantCommand, CloseConversationCommand, GetTranscriptQuery};
use crate::domain::foundation::{ConsultantId, ConversationId};

fn parse_conversation_id(raw: &str) -> Result<ConversationId, ApiError> {
    ConversationId::from_str(raw)
        .map_err(|_| ApiError::BadRequest(format!("invalid conversation id '{}'", raw)))
}

/// POST /api/conversations/:id/assign
pub async fn assign_consultant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AssignConsultantRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = AssignConsultantCommand {
        conversation_id: parse_conversation_id(&id)?,
        consultant_id: ConsultantId::new(request.consultant_id)?,
    };

    let conversation = state.assign_consultant_handler().handle(cmd).await?;
    Ok(Json(ConversationView::from(&conversation)))
}

/// POST /api/conversations/:id/close
pub async fn close_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = CloseConversationCommand {
        conversation_id: parse_conversation_id(&id)?,
    };

    let conversation = state.close_conversation_handler().handle(cmd).await?;
    Ok(Json(ConversationView::from(&conversation)))
}

/// GET /api/conversations/:id/transcript?latest=N
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TranscriptQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let query = GetTranscriptQuery {
        conversation_id: parse_conversation_id(&id)?,
        latest: query.latest,
    };

    let transcript = state.transcript_handler().handle(query).await?;
    Ok(Json(TranscriptView::from(&transcript)))
}
