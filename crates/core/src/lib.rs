//! Checkers Core Library

pub mod board;
pub mod error;
pub mod rules;
pub mod session;
pub mod storage;
pub mod wire;

pub use board::{Board, Piece, Rank, Side, Square};
pub use error::{Error, MoveError, Result};
pub use rules::{apply_coords, apply_move, legal_moves, Move};
pub use session::{GameSession, Status};
pub use storage::{Database, GameStats, StoredGame};
pub use wire::{WireMove, WireSession};

/// Basic position information
#[derive(Debug)]
pub struct PositionInfo {
    pub red_pieces: u32,
    pub black_pieces: u32,
    pub kings: u32,
    pub legal_move_count: u32,
    pub side_to_move: Side,
    pub must_capture: bool,
    pub is_finished: bool,
}

/// Analyzes a game position
pub fn analyze_position(session: &GameSession) -> PositionInfo {
    let board = session.board();
    let side_to_move = session.turn();

    let move_count = match session.active_chain() {
        _ if session.is_finished() => 0,
        Some(chain) => rules::capture_moves(board, chain).len(),
        None => rules::all_legal_moves(board, side_to_move).len(),
    };

    let kings = [Side::Red, Side::Black]
        .into_iter()
        .flat_map(move |side| board.pieces(side))
        .filter(|(_, piece)| piece.is_king())
        .count() as u32;

    PositionInfo {
        red_pieces: board.count(Side::Red) as u32,
        black_pieces: board.count(Side::Black) as u32,
        kings,
        legal_move_count: move_count as u32,
        side_to_move,
        must_capture: rules::has_capture(board, side_to_move),
        is_finished: session.is_finished(),
    }
}

/// Creates a game at the standard starting position
pub fn starting_position() -> GameSession {
    GameSession::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_position() {
        let info = analyze_position(&starting_position());

        assert_eq!(info.red_pieces, 12);
        assert_eq!(info.black_pieces, 12);
        assert_eq!(info.kings, 0);

        // Red moves first
        assert_eq!(info.side_to_move, Side::Red);

        // Four front-row men, only the edge man has a single step
        assert_eq!(info.legal_move_count, 7);
        assert!(!info.must_capture);
        assert!(!info.is_finished);
    }
}
