use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::{Arc, MutexGuard};
use tracing::error;

use checkers_core::{Database, Error, GameStats};

use crate::AppState;

pub mod games;

/// Handler error, rendered as `{"error": message}`.
#[derive(Debug)]
pub enum ApiError {
    Core(Error),
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError::Core(e)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(Error::Move(_)) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Core(Error::Conflict(_)) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Core(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Core(Error::Move(e)) => e.to_string(),
            ApiError::Core(e) => e.to_string(),
            ApiError::NotFound(id) => format!("Game {} not found", id),
            ApiError::BadRequest(msg) | ApiError::Internal(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            error!(%status, "{}", message);
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub(crate) fn lock_db(state: &AppState) -> Result<MutexGuard<'_, Database>, ApiError> {
    state
        .db
        .lock()
        .map_err(|_| ApiError::Internal("Database lock poisoned".to_string()))
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<GameStats>, ApiError> {
    let db = lock_db(&state)?;
    Ok(Json(db.game_stats()?))
}

pub async fn health() -> &'static str {
    "OK"
}
