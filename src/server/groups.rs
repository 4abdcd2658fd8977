// study groups and membership

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::{ApiError, AppState, CurrentUser};
use crate::{NewGroup, StudyGroup};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    subject: String,
    #[serde(default = "public_by_default")]
    is_public: bool,
}

fn public_by_default() -> bool {
    true
}

pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<StudyGroup>>, ApiError> {
    Ok(Json(state.store.public_groups().await?))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateGroupRequest>,
) -> Result<Json<StudyGroup>, ApiError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("group name is required".to_string()));
    }

    let group = state
        .store
        .create_group(
            NewGroup {
                name: name.to_string(),
                description: req.description,
                subject: req.subject,
                is_public: req.is_public,
            },
            &user,
        )
        .await?;

    info!(group_id = group.id, user_id = user.id, "group created");
    Ok(Json(group))
}

pub async fn mine(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<StudyGroup>>, ApiError> {
    Ok(Json(state.store.groups_for_member(user.id).await?))
}

pub async fn show(
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<i64>,
) -> Result<Json<StudyGroup>, ApiError> {
    state
        .store
        .group(group_id)
        .await?
        .map(Json)
        .ok_or_else(|| group_not_found(group_id))
}

pub async fn join(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(group_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !state.store.group_exists(group_id).await? {
        return Err(group_not_found(group_id));
    }

    state.store.add_member(group_id, user.id).await?;
    info!(group_id, user_id = user.id, "joined group");

    Ok(Json(
        serde_json::json!({ "message": "Joined group successfully" }),
    ))
}

pub(super) fn group_not_found(group_id: i64) -> ApiError {
    ApiError::NotFound(format!("group {group_id} not found"))
}
