// ai tutor endpoints

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::{ApiError, AppState, CurrentUser};
use crate::{DEFAULT_CONTEXT, Error, NewExchange, ResponseType, TutorExchange, TutorReply, User};

const FAILURE_TEXT: &str = "I'm having technical difficulties. Please try again.";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorRequest {
    #[serde(default)]
    message: String,
    context: Option<String>,
    group_id: Option<i64>,
}

#[derive(Serialize)]
struct TutorResponse {
    response: String,
    #[serde(rename = "type")]
    kind: ResponseType,
    timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
struct TutorFailure {
    response: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    error: bool,
}

impl TutorFailure {
    fn respond(status: StatusCode) -> Response {
        let body = Self {
            response: FAILURE_TEXT,
            kind: "explanation",
            error: true,
        };
        (status, Json(body)).into_response()
    }
}

// the tutor itself never fails, so any failure here comes from the request
// or the store and is answered with TutorFailure
pub async fn ask(
    State(state): State<Arc<AppState>>,
    user: Result<Option<CurrentUser>, ApiError>,
    req: Result<Json<TutorRequest>, JsonRejection>,
) -> Response {
    let req = match req {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "unreadable tutor request");
            return TutorFailure::respond(rejection.status());
        }
    };

    let user = match user {
        Ok(user) => user,
        Err(e) => {
            error!(error = %e, "failed to resolve session for tutor request");
            return TutorFailure::respond(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let context = req
        .context
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CONTEXT);

    info!(context, chars = req.message.len(), "tutor request");

    let reply = state.tutor.answer(&req.message, Some(context)).await;
    let timestamp = Utc::now();

    if let Some(CurrentUser(user)) = user
        && let Err(e) = save(&state, &user, &req, context, &reply, timestamp).await
    {
        error!(error = %e, user_id = user.id, "failed to save tutor exchange");
        return TutorFailure::respond(StatusCode::INTERNAL_SERVER_ERROR);
    }

    info!(kind = %reply.kind, "tutor reply sent");

    Json(TutorResponse {
        response: reply.text,
        kind: reply.kind,
        timestamp,
    })
    .into_response()
}

async fn save(
    state: &AppState,
    user: &User,
    req: &TutorRequest,
    context: &str,
    reply: &TutorReply,
    created_at: DateTime<Utc>,
) -> Result<TutorExchange, Error> {
    let group_id = match req.group_id {
        Some(id) if state.store.group_exists(id).await? => Some(id),
        Some(id) => {
            warn!(group_id = id, "tutor request names an unknown group, saving without it");
            None
        }
        None => None,
    };

    state
        .store
        .record_exchange(NewExchange {
            user_id: user.id,
            group_id,
            user_message: req.message.clone(),
            context: context.to_string(),
            ai_response: reply.text.clone(),
            response_type: reply.kind,
            created_at,
        })
        .await
}

pub async fn conversations(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<TutorExchange>>, ApiError> {
    Ok(Json(state.store.exchanges_for_user(user.id).await?))
}
