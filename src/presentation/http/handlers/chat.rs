//! Chat Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use validator::Validate;

use crate::application::dto::request::{CreateGroupChatRequest, CreatePrivateChatRequest};
use crate::application::dto::response::{ChatListResponse, ChatResponse, ChatWithMessagesResponse};
use crate::application::services::{ChatCreation, ChatError};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

/// GET /chats
pub async fn list_chats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ChatListResponse>, AppError> {
    let chats = state
        .chat_service()
        .list_chats(&auth.username)
        .await
        .map_err(AppError::from)?;

    Ok(Json(ChatListResponse { chats }))
}

/// POST /chats
///
/// Returns 201 with the new chat, or 200 with the existing one when the
/// unordered pair already has a private chat.
pub async fn create_private_chat(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreatePrivateChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    let participant_id = parse_id(&req.participant_id)
        .ok_or_else(|| AppError::NotFound("Participant not found".into()))?;

    let outcome = state
        .chat_service()
        .create_private_chat(&auth.username, participant_id)
        .await
        .map_err(AppError::from)?;

    let (status, chat) = match outcome {
        ChatCreation::Created(chat) => (StatusCode::CREATED, chat),
        ChatCreation::Existing(chat) => (StatusCode::OK, chat),
    };

    Ok((status, Json(ChatResponse { chat })))
}

/// POST /chats/group
pub async fn create_group_chat(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateGroupChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate().map_err(validation_error)?;

    let mut participant_ids = Vec::with_capacity(req.participant_ids.len());
    for raw in &req.participant_ids {
        let id = parse_id(raw).ok_or_else(|| AppError::from(ChatError::ParticipantsNotFound))?;
        participant_ids.push(id);
    }

    let chat = state
        .chat_service()
        .create_group_chat(&auth.username, &participant_ids, &req.group_name)
        .await
        .map_err(AppError::from)?;

    Ok((StatusCode::CREATED, Json(ChatResponse { chat })))
}

/// GET /chats/{chat_id}
///
/// A malformed id, a missing chat and a chat the caller is not in all
/// answer with the same 404.
pub async fn get_chat(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(chat_id): Path<String>,
) -> Result<Json<ChatWithMessagesResponse>, AppError> {
    let chat_id = parse_id(&chat_id).ok_or_else(|| AppError::from(ChatError::NotFound))?;

    let (chat, messages) = state
        .chat_service()
        .get_chat_for_user(chat_id, &auth.username)
        .await
        .map_err(AppError::from)?;

    Ok(Json(ChatWithMessagesResponse { chat, messages }))
}

fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}
