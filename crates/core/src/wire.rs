//! Client wire format
//!
//! The browser client expects the board as an 8x8 grid of one-character
//! strings: `""` empty, `r`/`b` men, `R`/`B` kings.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Piece, Side, Square, BOARD_SIZE};
use crate::error::{Error, Result};
use crate::session::{GameSession, Status};

pub type WireBoard = [[String; BOARD_SIZE as usize]; BOARD_SIZE as usize];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireStatus {
    Active,
    Finished,
}

impl From<Status> for WireStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::InProgress => WireStatus::Active,
            Status::Finished => WireStatus::Finished,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSession {
    pub game_id: String,
    pub board: WireBoard,
    pub current_player: Side,
    pub status: WireStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Side>,
    #[serde(default)]
    pub has_more_jumps: bool,
}

impl From<&GameSession> for WireSession {
    fn from(session: &GameSession) -> Self {
        Self {
            game_id: session.id().to_string(),
            board: board_to_wire(session.board()),
            current_player: session.turn(),
            status: session.status().into(),
            winner: session.winner(),
            has_more_jumps: session.active_chain().is_some(),
        }
    }
}

impl WireSession {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn parse_board(&self) -> Result<Board> {
        board_from_wire(&self.board)
    }
}

/// Body of a move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMove {
    pub from_row: i64,
    pub from_col: i64,
    pub to_row: i64,
    pub to_col: i64,
}

pub fn board_to_wire(board: &Board) -> WireBoard {
    std::array::from_fn(|row| {
        std::array::from_fn(|col| {
            Square::new(row as u8, col as u8)
                .and_then(|square| board.piece_at(square))
                .map(|piece| piece.code().to_string())
                .unwrap_or_default()
        })
    })
}

pub fn board_from_wire(cells: &WireBoard) -> Result<Board> {
    let mut board = Board::empty();
    for (row, line) in cells.iter().enumerate() {
        for (col, cell) in line.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }

            let mut chars = cell.chars();
            let piece = match (chars.next(), chars.next()) {
                (Some(code), None) => Piece::from_code(code),
                _ => None,
            }
            .ok_or_else(|| Error::Wire(format!("unknown piece code {:?}", cell)))?;

            let square = Square::new(row as u8, col as u8)
                .ok_or_else(|| Error::Wire(format!("row {} col {} off the board", row, col)))?;
            board = board
                .with_piece(square, Some(piece))
                .ok_or_else(|| Error::Wire(format!("piece on non-playable square {}", square)))?;
        }
    }
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::apply_move;

    #[test]
    fn test_initial_wire_layout() {
        let wire = WireSession::from(&GameSession::new());

        assert_eq!(wire.board[0][1], "b");
        assert_eq!(wire.board[0][0], "");
        assert_eq!(wire.board[5][0], "r");
        assert_eq!(wire.board[3].iter().filter(|c| !c.is_empty()).count(), 0);
        assert_eq!(wire.status, WireStatus::Active);
        assert!(!wire.has_more_jumps);
    }

    #[test]
    fn test_json_shape() {
        let session = GameSession::with_board("abc", Board::new(), Side::Red);
        let json: serde_json::Value =
            serde_json::from_str(&WireSession::from(&session).to_json().unwrap()).unwrap();

        assert_eq!(json["gameId"], "abc");
        assert_eq!(json["currentPlayer"], "red");
        assert_eq!(json["status"], "active");
        assert_eq!(json["hasMoreJumps"], false);
        assert_eq!(json["board"][7][0], "r");
        assert_eq!(json["board"][7][1], "");
        assert!(json.get("winner").is_none());
    }

    #[test]
    fn test_board_survives_json() {
        let board: Board = concat!(
            ".B.....b", "........", "........", "........",
            "........", "........", ".r......", "..R.....",
        )
        .parse()
        .unwrap();
        let session = GameSession::with_board("g", board, Side::Black);

        let json = WireSession::from(&session).to_json().unwrap();
        let parsed = WireSession::from_json(&json).unwrap();

        assert_eq!(parsed.parse_board().unwrap(), board);
        assert_eq!(parsed.current_player, Side::Black);
    }

    #[test]
    fn test_finished_game_reports_winner() {
        let board: Board = concat!(
            "........", "........", "........", "........",
            "...b....", "..r.....", "........", "........",
        )
        .parse()
        .unwrap();
        let session = GameSession::with_board("g", board, Side::Red);
        let done = apply_move(
            &session,
            Square::new(5, 2).unwrap(),
            Square::new(3, 4).unwrap(),
        )
        .unwrap();

        let wire = WireSession::from(&done);
        assert_eq!(wire.status, WireStatus::Finished);
        assert_eq!(wire.winner, Some(Side::Red));
    }

    #[test]
    fn test_rejects_bad_cells() {
        let mut cells = board_to_wire(&Board::empty());
        cells[0][0] = "r".to_string();
        assert!(matches!(board_from_wire(&cells), Err(Error::Wire(_))));

        let mut cells = board_to_wire(&Board::empty());
        cells[0][1] = "rr".to_string();
        assert!(matches!(board_from_wire(&cells), Err(Error::Wire(_))));

        let mut cells = board_to_wire(&Board::empty());
        cells[0][1] = "k".to_string();
        assert!(matches!(board_from_wire(&cells), Err(Error::Wire(_))));
    }

    #[test]
    fn test_move_body() {
        let mv: WireMove =
            serde_json::from_str(r#"{"fromRow":5,"fromCol":0,"toRow":4,"toCol":1}"#).unwrap();
        assert_eq!(
            mv,
            WireMove {
                from_row: 5,
                from_col: 0,
                to_row: 4,
                to_col: 1
            }
        );
    }
}
