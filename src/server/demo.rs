use axum::extract::State;
use std::sync::Arc;

use super::{ApiError, AppState};

pub async fn setup(State(state): State<Arc<AppState>>) -> Result<&'static str, ApiError> {
    crate::demo::seed(&state.store).await?;
    Ok("Demo data created successfully!")
}
