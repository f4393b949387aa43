use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use checkers_core::{rules, Error, GameSession, Square, StoredGame, WireMove, WireSession};

use super::{lock_db, ApiError};
use crate::AppState;

const RECENT_GAMES_LIMIT: u32 = 50;

// ============================================================================
// RESPONSES
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    #[serde(flatten)]
    pub game: WireSession,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&StoredGame> for GameResponse {
    fn from(stored: &StoredGame) -> Self {
        Self {
            game: WireSession::from(&stored.session),
            created_at: format_timestamp(stored.created_at),
            updated_at: format_timestamp(stored.updated_at),
        }
    }
}

fn format_timestamp(secs: u64) -> String {
    chrono::DateTime::from_timestamp(secs as i64, 0)
        .map(|d| d.to_rfc3339())
        .unwrap_or_default()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveHint {
    pub to_row: u8,
    pub to_col: u8,
    pub capture: bool,
}

#[derive(Serialize)]
pub struct MovesResponse {
    pub moves: Vec<MoveHint>,
}

// ============================================================================
// QUERY PARAMS
// ============================================================================

#[derive(Deserialize)]
pub struct SquareQuery {
    pub row: i64,
    pub col: i64,
}

// ============================================================================
// HANDLERS
// ============================================================================

pub async fn create_game(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<GameResponse>), ApiError> {
    let session = GameSession::new();
    let db = lock_db(&state)?;
    let stored = db.insert_game(&session)?;

    info!(game_id = %session.id(), "Created game");
    Ok((StatusCode::CREATED, Json(GameResponse::from(&stored))))
}

pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GameResponse>, ApiError> {
    let db = lock_db(&state)?;
    let stored = db.get_game(&id)?.ok_or(ApiError::NotFound(id))?;
    Ok(Json(GameResponse::from(&stored)))
}

pub async fn list_games(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<GameResponse>>, ApiError> {
    let db = lock_db(&state)?;
    let games = db.get_recent_games(RECENT_GAMES_LIMIT)?;
    debug!("Found {} games in database", games.len());
    Ok(Json(games.iter().map(GameResponse::from).collect()))
}

pub async fn play_move(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<WireMove>, JsonRejection>,
) -> Result<Json<GameResponse>, ApiError> {
    let Json(mv) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    info!(
        game_id = %id,
        "Move request: from ({}, {}) to ({}, {})",
        mv.from_row, mv.from_col, mv.to_row, mv.to_col
    );

    let db = lock_db(&state)?;
    let stored = match db.play_move(&id, &mv) {
        Ok(Some(stored)) => stored,
        Ok(None) => return Err(ApiError::NotFound(id)),
        Err(Error::Move(e)) => {
            warn!(game_id = %id, error = %e, "Rejected move");
            if let Ok(Some(current)) = db.get_game(&id) {
                debug!(game_id = %id, "Board:\n{}", current.session.board());
            }
            return Err(Error::Move(e).into());
        }
        Err(e) => return Err(e.into()),
    };

    let session = &stored.session;
    debug!(
        game_id = %id,
        turn = %session.turn(),
        more_jumps = session.active_chain().is_some(),
        "Board after move:\n{}",
        session.board()
    );
    if let Some(winner) = session.winner() {
        info!(game_id = %id, %winner, "Game over");
    }

    Ok(Json(GameResponse::from(&stored)))
}

/// Destinations the piece on `row`/`col` may move to right now.
pub async fn legal_moves(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    query: Result<Query<SquareQuery>, QueryRejection>,
) -> Result<Json<MovesResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let db = lock_db(&state)?;
    let stored = db.get_game(&id)?.ok_or(ApiError::NotFound(id))?;

    let moves = Square::from_coords(query.row, query.col)
        .map(|square| rules::legal_moves_for(&stored.session, square))
        .unwrap_or_default()
        .into_iter()
        .map(|mv| MoveHint {
            to_row: mv.to.row(),
            to_col: mv.to.col(),
            capture: mv.is_capture(),
        })
        .collect();

    Ok(Json(MovesResponse { moves }))
}
