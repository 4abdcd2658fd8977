// accounts and bearer sessions

use axum::{
    Json,
    extract::{FromRequestParts, OptionalFromRequestParts, State},
    http::{header, request::Parts},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::{ApiError, AppState};
use crate::{ROLE_STUDENT, User, verify_password};

/// The user behind the request's `Authorization: Bearer <token>` header.
///
/// As a plain extractor it rejects with 401. Wrapped in `Option` it lets
/// anonymous requests through, unknown tokens included.
pub struct CurrentUser(pub User);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError::Unauthorized)?;

        state
            .store
            .user_for_session(&token)
            .await?
            .map(CurrentUser)
            .ok_or(ApiError::Unauthorized)
    }
}

impl OptionalFromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Option<Self>, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(None);
        };

        Ok(state.store.user_for_session(&token).await?.map(CurrentUser))
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    message: &'static str,
    token: String,
    user: User,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = req.email.trim().to_lowercase();
    let name = req.name.trim();

    if email.is_empty() || name.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "email, password and name are required".to_string(),
        ));
    }

    if state.store.user_by_email(&email).await?.is_some() {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }

    let user = state
        .store
        .create_user(&email, name, ROLE_STUDENT, &req.password)
        .await?;
    let token = state.store.create_session(user.id).await?;

    info!(user_id = user.id, "user registered");

    Ok(Json(AuthResponse {
        message: "User registered successfully",
        token,
        user,
    }))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = req.email.trim().to_lowercase();

    let user = state
        .store
        .user_by_email(&email)
        .await?
        .filter(|u| verify_password(&req.password, &u.password_hash))
        .ok_or_else(|| ApiError::BadRequest("Invalid credentials".to_string()))?;

    let token = state.store.create_session(user.id).await?;

    info!(user_id = user.id, "user logged in");

    Ok(Json(AuthResponse {
        message: "Login successful",
        token,
        user,
    }))
}

pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
