//! Messaging endpoints: inbox, conversation summaries and threads.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::{debug, info};

use crate::db::{ConversationSummary, Message, NewMessage, SendMessageRequest, UnreadCount, User};
use crate::engine::conversations;
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::extract::{ApiJson, ApiPath};
use super::validation::validate_message_content;

/// Every message the current user sent or received, newest first
///
/// GET /api/messages
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    user: User,
) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = state.store.messages_for_user(user.id).await?;
    Ok(Json(messages))
}

/// One summary per counterparty, most recently active first
///
/// GET /api/messages/conversations
pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
    user: User,
) -> Result<Json<Vec<ConversationSummary>>, ApiError> {
    let messages = state.store.messages_for_user(user.id).await?;
    Ok(Json(conversations::summarize(user.id, &messages)))
}

/// Open the thread with another user, oldest first.
///
/// Opening a thread marks everything the other user sent as read before the
/// thread is returned, so the returned messages already show as read.
///
/// GET /api/messages/conversation/:user_id
pub async fn get_conversation(
    State(state): State<Arc<AppState>>,
    user: User,
    ApiPath(other_id): ApiPath<i64>,
) -> Result<Json<Vec<Message>>, ApiError> {
    if state.store.mark_read(user.id, other_id).await? {
        debug!(user_id = user.id, counterparty_id = other_id, "Conversation marked read");
    }

    let thread = state.store.conversation(user.id, other_id).await?;
    Ok(Json(thread))
}

/// Send a message from the current user
///
/// POST /api/messages
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    user: User,
    ApiJson(req): ApiJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    errors.check("content", validate_message_content(&req.content));
    if req.receiver_id == user.id {
        errors.add("receiverId", "You cannot send a message to yourself");
    }
    errors.finish()?;

    let message = state
        .store
        .create_message(NewMessage {
            sender_id: user.id,
            receiver_id: req.receiver_id,
            content: req.content,
            pet_id: req.pet_id,
        })
        .await?;

    info!(
        message_id = message.id,
        sender_id = message.sender_id,
        receiver_id = message.receiver_id,
        "Message sent"
    );
    Ok((StatusCode::CREATED, Json(message)))
}

/// Total unread messages addressed to the current user
///
/// GET /api/messages/unread
pub async fn unread_count(
    State(state): State<Arc<AppState>>,
    user: User,
) -> Result<Json<UnreadCount>, ApiError> {
    let count = state.store.unread_count(user.id).await?;
    Ok(Json(UnreadCount { count }))
}
