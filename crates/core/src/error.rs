//! Error types for checkers-core

use thiserror::Error;

/// Reasons a move request is rejected. Rejection never changes the session.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("Game is already finished")]
    GameFinished,

    #[error("No piece of the side to move on that square")]
    NotYourPiece,

    #[error("The capturing piece must continue its jump")]
    MustContinueChain,

    #[error("Illegal move")]
    IllegalMove,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Move rejected: {0}")]
    Move(#[from] MoveError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid board: {0}")]
    Wire(String),

    #[error("Game {0} was modified concurrently")]
    Conflict(String),

    #[error("Stored game is corrupt: {0}")]
    Corrupt(String),
}

pub type Result<T> = std::result::Result<T, Error>;
