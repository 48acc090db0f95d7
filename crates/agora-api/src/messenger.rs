use agora_types::api::{LastMessageResponse, SendMessageRequest, StartConversationRequest};
use agora_types::{Conversation, ConversationId, Message, UserId};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::info;

use crate::error::{ApiError, run_blocking};
use crate::middleware::CurrentUser;
use crate::state::AppState;

pub async fn start(
    State(state): State<AppState>,
    Path(owner_id): Path<UserId>,
    CurrentUser(who): CurrentUser,
    Json(req): Json<StartConversationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.engine.allow_messenger_scope(&who, owner_id)?;
    let service = state.messenger.clone();
    let conversation =
        run_blocking(move || service.start_conversation(owner_id, &req.recipient)).await?;
    info!(
        "conversation {} opened between {} and {}",
        conversation.id, conversation.owner_id, conversation.recipient_id
    );
    Ok((StatusCode::CREATED, Json(conversation)))
}

pub async fn list(
    State(state): State<AppState>,
    Path(owner_id): Path<UserId>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<Vec<Conversation>>, ApiError> {
    state.engine.allow_messenger_scope(&who, owner_id)?;
    let service = state.messenger.clone();
    let conversations = run_blocking(move || service.list_conversations(owner_id)).await?;
    Ok(Json(conversations))
}

/// Removes the caller's side only; the other participant keeps theirs.
pub async fn remove(
    State(state): State<AppState>,
    Path((owner_id, messenger_id)): Path<(UserId, ConversationId)>,
    CurrentUser(who): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let engine = state.engine.clone();
    let service = state.messenger.clone();
    run_blocking(move || {
        engine.allow_conversation(&who, owner_id, messenger_id)?;
        service.delete_conversation(messenger_id)
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn send(
    State(state): State<AppState>,
    Path((owner_id, messenger_id)): Path<(UserId, ConversationId)>,
    CurrentUser(who): CurrentUser,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let engine = state.engine.clone();
    let service = state.messenger.clone();
    let message = run_blocking(move || {
        engine.allow_conversation(&who, owner_id, messenger_id)?;
        service.send_message(messenger_id, &req.text)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn messages(
    State(state): State<AppState>,
    Path((owner_id, messenger_id)): Path<(UserId, ConversationId)>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<Vec<Message>>, ApiError> {
    let engine = state.engine.clone();
    let service = state.messenger.clone();
    let messages = run_blocking(move || {
        engine.allow_conversation(&who, owner_id, messenger_id)?;
        service.list_messages(messenger_id)
    })
    .await?;
    Ok(Json(messages))
}

pub async fn last(
    State(state): State<AppState>,
    Path((owner_id, messenger_id)): Path<(UserId, ConversationId)>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<LastMessageResponse>, ApiError> {
    let engine = state.engine.clone();
    let service = state.messenger.clone();
    let text = run_blocking(move || {
        engine.allow_conversation(&who, owner_id, messenger_id)?;
        service.last_message(messenger_id)
    })
    .await?;
    Ok(Json(LastMessageResponse { text }))
}

pub async fn message(
    State(state): State<AppState>,
    Path((owner_id, messenger_id, message_id)): Path<(UserId, ConversationId, String)>,
    CurrentUser(who): CurrentUser,
) -> Result<Json<Message>, ApiError> {
    let engine = state.engine.clone();
    let service = state.messenger.clone();
    let message = run_blocking(move || {
        engine.allow_message(&who, owner_id, messenger_id, &message_id)?;
        service.find_message(messenger_id, &message_id)
    })
    .await?;
    Ok(Json(message))
}
