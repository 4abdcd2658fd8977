// http server - the rest api the study-group frontend talks to

mod auth;
mod chat;
mod demo;
mod error;
mod groups;
mod tutor;

use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::{Error, Store, Tutor, TutorConfig};

pub use auth::CurrentUser;
pub use error::ApiError;

pub struct AppState {
    pub store: Store,
    pub tutor: Tutor,
}

impl AppState {
    pub fn new(store: Store, tutor: Tutor) -> Arc<Self> {
        Arc::new(Self { store, tutor })
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/groups", get(groups::list).post(groups::create))
        .route("/api/groups/my-groups", get(groups::mine))
        .route("/api/groups/{group_id}", get(groups::show))
        .route("/api/groups/{group_id}/join", post(groups::join))
        .route(
            "/api/chat/{group_id}/messages",
            get(chat::list).post(chat::send),
        )
        .route("/api/ai/tutor", post(tutor::ask))
        .route("/api/ai/conversations", get(tutor::conversations))
        .route("/api/demo/setup", post(demo::setup))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub struct Server;

impl Server {
    pub async fn run(db_url: &str, tutor: TutorConfig, host: &str, port: u16) -> Result<(), Error> {
        let store = Store::connect(db_url).await?;

        let tutor = Tutor::new(tutor);
        if tutor.config().credential().is_none() {
            warn!("no usable api key, the tutor will answer with a configuration error");
        }

        let state = AppState::new(store, tutor);
        let app = router(state);

        let addr = format!("{host}:{port}");
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        info!(%addr, "server running");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        info!("server stopped");
        Ok(())
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// resolves on ctrl-c or sigterm
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install ctrl-c handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to install sigterm handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("shutdown signal received");
}
