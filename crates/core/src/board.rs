//! Board representation for 8x8 checkers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const BOARD_SIZE: u8 = 8;
const PLAYABLE_SQUARES: usize = 32;

/// Side owning a piece. Red moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Red,
    Black,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }

    /// Row delta of a forward step. Red starts at the bottom (rows 5-7).
    pub fn forward(self) -> i8 {
        match self {
            Side::Red => -1,
            Side::Black => 1,
        }
    }

    /// Row on which a man of this side is crowned.
    pub fn crowning_row(self) -> u8 {
        match self {
            Side::Red => 0,
            Side::Black => BOARD_SIZE - 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Red => "red",
            Side::Black => "black",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(Side::Red),
            "black" => Ok(Side::Black),
            other => Err(ParseBoardError::UnknownSide(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    Man,
    King,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub side: Side,
    pub rank: Rank,
}

impl Piece {
    pub fn man(side: Side) -> Self {
        Self { side, rank: Rank::Man }
    }

    pub fn king(side: Side) -> Self {
        Self { side, rank: Rank::King }
    }

    pub fn is_king(&self) -> bool {
        self.rank == Rank::King
    }

    /// Single-character code: lower case for men, upper case for kings.
    pub fn code(&self) -> char {
        match (self.side, self.rank) {
            (Side::Red, Rank::Man) => 'r',
            (Side::Red, Rank::King) => 'R',
            (Side::Black, Rank::Man) => 'b',
            (Side::Black, Rank::King) => 'B',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'r' => Some(Piece::man(Side::Red)),
            'R' => Some(Piece::king(Side::Red)),
            'b' => Some(Piece::man(Side::Black)),
            'B' => Some(Piece::king(Side::Black)),
            _ => None,
        }
    }

    fn crowned(self) -> Self {
        Piece::king(self.side)
    }
}

/// A board coordinate. Always on the board, not necessarily playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Builds a square from untrusted signed coordinates.
    pub fn from_coords(row: i64, col: i64) -> Option<Self> {
        let row = u8::try_from(row).ok()?;
        let col = u8::try_from(col).ok()?;
        Self::new(row, col)
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn col(&self) -> u8 {
        self.col
    }

    /// Dark squares, the only ones pieces may stand on.
    pub fn is_playable(&self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    pub fn offset(&self, d_row: i8, d_col: i8) -> Option<Self> {
        let row = self.row as i8 + d_row;
        let col = self.col as i8 + d_col;
        if row < 0 || col < 0 {
            return None;
        }
        Self::new(row as u8, col as u8)
    }

    /// Every playable square in row-major order.
    pub fn playable() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE)
            .flat_map(|row| (0..BOARD_SIZE).map(move |col| Square { row, col }))
            .filter(Square::is_playable)
    }

    fn index(&self) -> Option<usize> {
        if self.is_playable() {
            Some(self.row as usize * 4 + self.col as usize / 2)
        } else {
            None
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseBoardError {
    #[error("expected 64 squares, found {0}")]
    WrongLength(usize),

    #[error("unknown piece code {0:?}")]
    UnknownCode(String),

    #[error("piece on non-playable square {0}")]
    NotPlayable(Square),

    #[error("unknown side {0:?}")]
    UnknownSide(String),
}

/// Checkers board. Only the 32 playable squares carry state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; PLAYABLE_SQUARES],
}

impl Board {
    /// Standard opening layout: black men on rows 0-2, red men on rows 5-7.
    pub fn new() -> Self {
        let mut board = Self::empty();
        for square in Square::playable() {
            let piece = match square.row {
                0..=2 => Some(Piece::man(Side::Black)),
                5..=7 => Some(Piece::man(Side::Red)),
                _ => None,
            };
            board.set(square, piece);
        }
        board
    }

    pub fn empty() -> Self {
        Self {
            squares: [None; PLAYABLE_SQUARES],
        }
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        square.index().and_then(|idx| self.squares[idx])
    }

    /// Returns a copy with `square` set to `piece`, or `None` if the square
    /// is not playable.
    pub fn with_piece(&self, square: Square, piece: Option<Piece>) -> Option<Board> {
        let idx = square.index()?;
        let mut board = *self;
        board.squares[idx] = piece;
        Some(board)
    }

    /// Relocates the piece on `from` to `to`, crowning it on its far row and
    /// clearing `removed`. Legality is the caller's concern.
    pub fn with_move(&self, from: Square, to: Square, removed: Option<Square>) -> Board {
        let mut board = *self;
        let Some(piece) = board.take(from) else {
            return board;
        };

        let piece = if to.row == piece.side.crowning_row() {
            piece.crowned()
        } else {
            piece
        };
        board.set(to, Some(piece));

        if let Some(removed) = removed {
            board.set(removed, None);
        }
        board
    }

    pub fn pieces(&self, side: Side) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::playable().filter_map(move |square| {
            self.piece_at(square)
                .filter(|piece| piece.side == side)
                .map(|piece| (square, piece))
        })
    }

    pub fn count(&self, side: Side) -> usize {
        self.squares
            .iter()
            .flatten()
            .filter(|piece| piece.side == side)
            .count()
    }

    /// The 64 square codes in row-major order, `.` for empty squares.
    pub fn codes(&self) -> String {
        (0..BOARD_SIZE)
            .flat_map(|row| (0..BOARD_SIZE).map(move |col| Square { row, col }))
            .map(|square| self.piece_at(square).map_or('.', |p| p.code()))
            .collect()
    }

    fn take(&mut self, square: Square) -> Option<Piece> {
        let idx = square.index()?;
        self.squares[idx].take()
    }

    fn set(&mut self, square: Square, piece: Option<Piece>) {
        if let Some(idx) = square.index() {
            self.squares[idx] = piece;
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<char> = self.codes().chars().collect();
        for (row, line) in codes.chunks(BOARD_SIZE as usize).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            let line: Vec<String> = line.iter().map(char::to_string).collect();
            write!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// Parses 64 square codes (`.` or `_` for empty), ignoring whitespace. Accepts
/// both `codes()` output and the `Display` diagram.
impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let codes: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if codes.len() != (BOARD_SIZE as usize).pow(2) {
            return Err(ParseBoardError::WrongLength(codes.len()));
        }

        let mut board = Board::empty();
        for (i, code) in codes.into_iter().enumerate() {
            let square = Square {
                row: (i / BOARD_SIZE as usize) as u8,
                col: (i % BOARD_SIZE as usize) as u8,
            };
            if code == '.' || code == '_' {
                continue;
            }
            let piece = Piece::from_code(code)
                .ok_or_else(|| ParseBoardError::UnknownCode(code.to_string()))?;
            if !square.is_playable() {
                return Err(ParseBoardError::NotPlayable(square));
            }
            board.set(square, Some(piece));
        }
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: u8, col: u8) -> Square {
        Square::new(row, col).unwrap()
    }

    #[test]
    fn test_initial_layout() {
        let board = Board::new();
        assert_eq!(board.count(Side::Red), 12);
        assert_eq!(board.count(Side::Black), 12);

        assert_eq!(board.piece_at(sq(0, 1)), Some(Piece::man(Side::Black)));
        assert_eq!(board.piece_at(sq(5, 0)), Some(Piece::man(Side::Red)));
        assert_eq!(board.piece_at(sq(0, 0)), None);
        assert!(board.pieces(Side::Red).all(|(s, _)| s.row() >= 5));
        assert!(board.pieces(Side::Black).all(|(s, _)| s.row() <= 2));
    }

    #[test]
    fn test_playable_parity() {
        assert_eq!(Square::playable().count(), 32);
        assert!(sq(0, 1).is_playable());
        assert!(!sq(0, 0).is_playable());
        assert!(sq(4, 1).is_playable());
    }

    #[test]
    fn test_with_piece_rejects_light_square() {
        let board = Board::empty();
        assert!(board.with_piece(sq(2, 2), Some(Piece::man(Side::Red))).is_none());
        assert!(board.with_piece(sq(2, 3), Some(Piece::man(Side::Red))).is_some());
    }

    #[test]
    fn test_with_move_leaves_receiver_untouched() {
        let board = Board::new();
        let moved = board.with_move(sq(5, 0), sq(4, 1), None);

        assert_eq!(board.piece_at(sq(5, 0)), Some(Piece::man(Side::Red)));
        assert_eq!(moved.piece_at(sq(5, 0)), None);
        assert_eq!(moved.piece_at(sq(4, 1)), Some(Piece::man(Side::Red)));
    }

    #[test]
    fn test_with_move_crowns_and_removes() {
        let board = Board::empty()
            .with_piece(sq(2, 3), Some(Piece::man(Side::Red)))
            .and_then(|b| b.with_piece(sq(1, 2), Some(Piece::man(Side::Black))))
            .unwrap();

        let moved = board.with_move(sq(2, 3), sq(0, 1), Some(sq(1, 2)));
        assert_eq!(moved.piece_at(sq(0, 1)), Some(Piece::king(Side::Red)));
        assert_eq!(moved.count(Side::Black), 0);
    }

    #[test]
    fn test_king_stays_king_off_crowning_row() {
        let board = Board::empty()
            .with_piece(sq(0, 1), Some(Piece::king(Side::Red)))
            .unwrap();
        let moved = board.with_move(sq(0, 1), sq(1, 2), None);
        assert_eq!(moved.piece_at(sq(1, 2)), Some(Piece::king(Side::Red)));
    }

    #[test]
    fn test_text_form_parses_back() {
        let board = Board::new();
        assert_eq!(board.codes().parse::<Board>().unwrap(), board);
        assert_eq!(board.to_string().parse::<Board>().unwrap(), board);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(
            "r".parse::<Board>(),
            Err(ParseBoardError::WrongLength(1))
        );

        let mut codes = ".".repeat(64);
        codes.replace_range(0..1, "r");
        assert_eq!(
            codes.parse::<Board>(),
            Err(ParseBoardError::NotPlayable(sq(0, 0)))
        );

        let mut codes = ".".repeat(64);
        codes.replace_range(1..2, "x");
        assert!(matches!(
            codes.parse::<Board>(),
            Err(ParseBoardError::UnknownCode(_))
        ));
    }
}
