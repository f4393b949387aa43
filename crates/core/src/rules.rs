//! Rules engine: move generation, move application and game end detection
//!
//! Every function here is pure. Sessions go in by reference and successor
//! sessions come out, so a rejected move leaves the caller's state untouched.

use crate::board::{Board, Piece, Rank, Side, Square};
use crate::error::MoveError;
use crate::session::GameSession;

const COL_STEPS: [i8; 2] = [-1, 1];

/// A single step or a single jump. Multi-jump sequences are played as a
/// chain of capture moves by the same piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub captured: Option<Square>,
}

impl Move {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }
}

fn row_steps(piece: Piece) -> &'static [i8] {
    match (piece.rank, piece.side) {
        (Rank::King, _) => &[-1, 1],
        (Rank::Man, Side::Red) => &[-1],
        (Rank::Man, Side::Black) => &[1],
    }
}

/// Jumps available to the piece on `square`, ignoring the rest of the board.
pub fn capture_moves(board: &Board, square: Square) -> Vec<Move> {
    let Some(piece) = board.piece_at(square) else {
        return Vec::new();
    };

    let mut moves = Vec::new();
    for &d_row in row_steps(piece) {
        for d_col in COL_STEPS {
            let (Some(over), Some(landing)) = (
                square.offset(d_row, d_col),
                square.offset(2 * d_row, 2 * d_col),
            ) else {
                continue;
            };

            let jumps_opponent = board
                .piece_at(over)
                .is_some_and(|jumped| jumped.side != piece.side);
            if jumps_opponent && landing.is_playable() && board.piece_at(landing).is_none() {
                moves.push(Move {
                    from: square,
                    to: landing,
                    captured: Some(over),
                });
            }
        }
    }
    moves
}

fn simple_moves(board: &Board, square: Square) -> Vec<Move> {
    let Some(piece) = board.piece_at(square) else {
        return Vec::new();
    };

    let mut moves = Vec::new();
    for &d_row in row_steps(piece) {
        for d_col in COL_STEPS {
            if let Some(to) = square.offset(d_row, d_col) {
                if to.is_playable() && board.piece_at(to).is_none() {
                    moves.push(Move {
                        from: square,
                        to,
                        captured: None,
                    });
                }
            }
        }
    }
    moves
}

/// Whether any piece of `side` can capture somewhere on the board.
pub fn has_capture(board: &Board, side: Side) -> bool {
    board
        .pieces(side)
        .any(|(square, _)| !capture_moves(board, square).is_empty())
}

/// Legal moves for the piece on `square`, with capture mandatory board-wide:
/// while any piece of the same side can jump, only jumps are returned.
pub fn legal_moves(board: &Board, square: Square) -> Vec<Move> {
    let Some(piece) = board.piece_at(square) else {
        return Vec::new();
    };

    let captures = capture_moves(board, square);
    if !captures.is_empty() {
        return captures;
    }
    if has_capture(board, piece.side) {
        return Vec::new();
    }
    simple_moves(board, square)
}

/// Every legal move for `side`.
pub fn all_legal_moves(board: &Board, side: Side) -> Vec<Move> {
    let squares: Vec<Square> = board.pieces(side).map(|(square, _)| square).collect();

    let captures: Vec<Move> = squares
        .iter()
        .flat_map(|&square| capture_moves(board, square))
        .collect();
    if !captures.is_empty() {
        return captures;
    }

    squares
        .iter()
        .flat_map(|&square| simple_moves(board, square))
        .collect()
}

/// Legal moves from `square` in the context of a session: only the side to
/// move has moves, and an open chain restricts play to the chain square.
pub fn legal_moves_for(session: &GameSession, square: Square) -> Vec<Move> {
    if session.is_finished() {
        return Vec::new();
    }
    let owned = session
        .board()
        .piece_at(square)
        .is_some_and(|piece| piece.side == session.turn());
    if !owned {
        return Vec::new();
    }
    match session.active_chain() {
        Some(chain) if chain != square => Vec::new(),
        Some(_) => capture_moves(session.board(), square),
        None => legal_moves(session.board(), square),
    }
}

/// Validates and plays `from -> to`, returning the successor session.
pub fn apply_move(
    session: &GameSession,
    from: Square,
    to: Square,
) -> Result<GameSession, MoveError> {
    if session.is_finished() {
        return Err(MoveError::GameFinished);
    }

    let board = session.board();
    let mover = session.turn();
    match board.piece_at(from) {
        Some(piece) if piece.side == mover => {}
        _ => return Err(MoveError::NotYourPiece),
    }

    if let Some(chain) = session.active_chain() {
        if from != chain {
            return Err(MoveError::MustContinueChain);
        }
    }

    let chosen = legal_moves(board, from)
        .into_iter()
        .find(|mv| mv.to == to)
        .ok_or(MoveError::IllegalMove)?;

    let next = board.with_move(chosen.from, chosen.to, chosen.captured);

    let continues = chosen.is_capture() && !capture_moves(&next, chosen.to).is_empty();
    let (turn, chain) = if continues {
        (mover, Some(chosen.to))
    } else {
        (mover.other(), None)
    };

    let opponent = mover.other();
    let opponent_stuck = chain.is_none() && all_legal_moves(&next, opponent).is_empty();
    let winner = if next.count(opponent) == 0 || opponent_stuck {
        Some(mover)
    } else {
        None
    };

    Ok(session.advance(next, turn, chain.filter(|_| winner.is_none()), winner))
}

/// `apply_move` over raw wire coordinates. Off-board coordinates are
/// illegal moves once the game is known to be live.
pub fn apply_coords(
    session: &GameSession,
    from_row: i64,
    from_col: i64,
    to_row: i64,
    to_col: i64,
) -> Result<GameSession, MoveError> {
    if session.is_finished() {
        return Err(MoveError::GameFinished);
    }
    let from = Square::from_coords(from_row, from_col).ok_or(MoveError::IllegalMove)?;
    let to = Square::from_coords(to_row, to_col).ok_or(MoveError::IllegalMove)?;
    apply_move(session, from, to)
}
