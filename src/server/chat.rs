// group chat

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use super::groups::group_not_found;
use super::{ApiError, AppState, CurrentUser};
use crate::{ChatMessage, MessageType};

#[derive(Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    content: String,
}

// unknown groups just have no messages
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<i64>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    Ok(Json(state.store.messages(group_id).await?))
}

pub async fn send(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(group_id): Path<i64>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<ChatMessage>, ApiError> {
    if req.content.trim().is_empty() {
        return Err(ApiError::BadRequest("message content is required".to_string()));
    }

    if !state.store.group_exists(group_id).await? {
        return Err(group_not_found(group_id));
    }

    let message = state
        .store
        .add_message(group_id, user.id, &req.content, MessageType::Text, Utc::now())
        .await?;

    debug!(group_id, message_id = message.id, "message sent");
    Ok(Json(message))
}
