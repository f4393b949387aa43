//! Game session: one board plus whose turn it is and how the game stands

use rand::Rng;

use crate::board::{Board, Side, Square};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    InProgress,
    Finished,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::InProgress => "in_progress",
            Status::Finished => "finished",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in_progress" => Some(Status::InProgress),
            "finished" => Some(Status::Finished),
            _ => None,
        }
    }
}

/// The unit persisted and returned across the API boundary. Only
/// `rules::apply_move` produces successor sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    id: String,
    board: Board,
    turn: Side,
    status: Status,
    winner: Option<Side>,
    active_chain: Option<Square>,
}

impl GameSession {
    /// A fresh game with a random id. Red moves first.
    pub fn new() -> Self {
        Self::with_board(generate_id(), Board::new(), Side::Red)
    }

    /// An in-progress game from an arbitrary position.
    pub fn with_board(id: impl Into<String>, board: Board, turn: Side) -> Self {
        Self {
            id: id.into(),
            board,
            turn,
            status: Status::InProgress,
            winner: None,
            active_chain: None,
        }
    }

    /// Rebuilds a session from stored fields, checking that they agree.
    pub fn restore(
        id: impl Into<String>,
        board: Board,
        turn: Side,
        status: Status,
        winner: Option<Side>,
        active_chain: Option<Square>,
    ) -> Result<Self> {
        let id = id.into();
        match (status, winner) {
            (Status::Finished, None) => {
                return Err(Error::Corrupt(format!("{}: finished without a winner", id)))
            }
            (Status::InProgress, Some(_)) => {
                return Err(Error::Corrupt(format!("{}: winner set on a live game", id)))
            }
            _ => {}
        }
        if let Some(square) = active_chain {
            let owner = board.piece_at(square).map(|p| p.side);
            if status == Status::Finished || owner != Some(turn) {
                return Err(Error::Corrupt(format!(
                    "{}: chain square {} not held by the side to move",
                    id, square
                )));
            }
        }

        Ok(Self {
            id,
            board,
            turn,
            status,
            winner,
            active_chain,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn active_chain(&self) -> Option<Square> {
        self.active_chain
    }

    pub fn is_finished(&self) -> bool {
        self.status == Status::Finished
    }

    pub(crate) fn advance(
        &self,
        board: Board,
        turn: Side,
        active_chain: Option<Square>,
        winner: Option<Side>,
    ) -> Self {
        Self {
            id: self.id.clone(),
            board,
            turn,
            status: if winner.is_some() {
                Status::Finished
            } else {
                Status::InProgress
            },
            winner,
            active_chain,
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

fn generate_id() -> String {
    let value: u128 = rand::rng().random();
    format!("{:032x}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Piece;

    #[test]
    fn test_new_session() {
        let session = GameSession::new();
        assert_eq!(session.turn(), Side::Red);
        assert_eq!(session.status(), Status::InProgress);
        assert_eq!(session.winner(), None);
        assert_eq!(session.active_chain(), None);
        assert_eq!(session.board(), &Board::new());
        assert_eq!(session.id().len(), 32);
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(GameSession::new().id(), GameSession::new().id());
    }

    #[test]
    fn test_restore_checks_winner() {
        let board = Board::new();
        assert!(GameSession::restore("g", board, Side::Red, Status::Finished, None, None).is_err());
        assert!(
            GameSession::restore("g", board, Side::Red, Status::InProgress, Some(Side::Red), None)
                .is_err()
        );
        assert!(
            GameSession::restore("g", board, Side::Red, Status::Finished, Some(Side::Black), None)
                .is_ok()
        );
    }

    #[test]
    fn test_restore_checks_chain_owner() {
        let square = Square::new(3, 2).unwrap();
        let board = Board::empty()
            .with_piece(square, Some(Piece::man(Side::Red)))
            .unwrap();

        let ok = GameSession::restore("g", board, Side::Red, Status::InProgress, None, Some(square));
        assert_eq!(ok.unwrap().active_chain(), Some(square));

        let bad = GameSession::restore("g", board, Side::Black, Status::InProgress, None, Some(square));
        assert!(matches!(bad, Err(Error::Corrupt(_))));
    }

    #[test]
    fn test_status_strings() {
        for status in [Status::InProgress, Status::Finished] {
            assert_eq!(Status::parse(status.as_str()), Some(status));
        }
        assert_eq!(Status::parse("active"), None);
    }
}
