//! DELETE /api/session/{user_id}: start a fresh conversation session.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub session_id: String,
}

/// DELETE /api/session/{user_id}
pub async fn new_session(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<NewSessionResponse>, AppError> {
    let memory = state.chat_service.memory();
    let session_id = memory.new_session(&memory.attribution(&user_id)).await?;

    Ok(Json(NewSessionResponse {
        status: "ok",
        message: "New session started",
        session_id,
    }))
}
