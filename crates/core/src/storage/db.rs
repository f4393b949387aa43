//! Database operations

use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use super::models::*;
use crate::board::{Board, Side, Square};
use crate::error::{Error, Result};
use crate::rules;
use crate::session::{GameSession, Status};
use crate::wire::WireMove;

const GAME_COLUMNS: &str =
    "id, board, turn, status, winner, chain_row, chain_col, version, created_at, updated_at";

pub struct Database {
    conn: Connection,
}

/// Raw column values of one `games` row, validated by `into_stored`.
struct GameRow {
    id: String,
    board: String,
    turn: String,
    status: String,
    winner: Option<String>,
    chain_row: Option<u8>,
    chain_col: Option<u8>,
    version: u64,
    created_at: u64,
    updated_at: u64,
}

impl GameRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            board: row.get(1)?,
            turn: row.get(2)?,
            status: row.get(3)?,
            winner: row.get(4)?,
            chain_row: row.get(5)?,
            chain_col: row.get(6)?,
            version: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    fn into_stored(self) -> Result<StoredGame> {
        let corrupt = |what: String| Error::Corrupt(format!("{}: {}", self.id, what));

        let board: Board = self
            .board
            .parse()
            .map_err(|e| corrupt(format!("board {}", e)))?;
        let turn: Side = self.turn.parse().map_err(|e| corrupt(format!("turn {}", e)))?;
        let status = Status::parse(&self.status)
            .ok_or_else(|| corrupt(format!("status {:?}", self.status)))?;
        let winner = self
            .winner
            .as_deref()
            .map(str::parse::<Side>)
            .transpose()
            .map_err(|e| corrupt(format!("winner {}", e)))?;
        let active_chain = match (self.chain_row, self.chain_col) {
            (Some(row), Some(col)) => Some(
                Square::new(row, col)
                    .ok_or_else(|| corrupt(format!("chain square ({}, {})", row, col)))?,
            ),
            (None, None) => None,
            _ => return Err(corrupt("half a chain square".to_string())),
        };

        let session = GameSession::restore(self.id, board, turn, status, winner, active_chain)?;
        Ok(StoredGame {
            session,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS games (
                id TEXT PRIMARY KEY,
                board TEXT NOT NULL,
                turn TEXT NOT NULL,
                status TEXT NOT NULL,
                winner TEXT,
                chain_row INTEGER,
                chain_col INTEGER,
                version INTEGER NOT NULL DEFAULT 1,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_games_status ON games(status);
            CREATE INDEX IF NOT EXISTS idx_games_updated_at ON games(updated_at);
            "#,
        )?;
        Ok(())
    }

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    pub fn insert_game(&self, session: &GameSession) -> Result<StoredGame> {
        let now = Self::now();
        let chain = session.active_chain();

        self.conn.execute(
            r#"
            INSERT INTO games
            (id, board, turn, status, winner, chain_row, chain_col, version, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?8)
            "#,
            params![
                session.id(),
                session.board().codes(),
                session.turn().as_str(),
                session.status().as_str(),
                session.winner().map(|s| s.as_str()),
                chain.map(|s| s.row()),
                chain.map(|s| s.col()),
                now,
            ],
        )?;

        Ok(StoredGame {
            session: session.clone(),
            version: 1,
            created_at: now,
            updated_at: now,
        })
    }

    /// Writes `session` over the stored row if nobody saved since
    /// `expected_version` was read.
    pub fn save_game(&self, session: &GameSession, expected_version: u64) -> Result<StoredGame> {
        let now = Self::now();
        let chain = session.active_chain();

        let updated = self.conn.execute(
            r#"
            UPDATE games
            SET board = ?1, turn = ?2, status = ?3, winner = ?4,
                chain_row = ?5, chain_col = ?6, version = version + 1, updated_at = ?7
            WHERE id = ?8 AND version = ?9
            "#,
            params![
                session.board().codes(),
                session.turn().as_str(),
                session.status().as_str(),
                session.winner().map(|s| s.as_str()),
                chain.map(|s| s.row()),
                chain.map(|s| s.col()),
                now,
                session.id(),
                expected_version,
            ],
        )?;

        if updated == 0 {
            return Err(Error::Conflict(session.id().to_string()));
        }

        self.get_game(session.id())?
            .ok_or_else(|| Error::Conflict(session.id().to_string()))
    }

    pub fn get_game(&self, id: &str) -> Result<Option<StoredGame>> {
        let sql = format!("SELECT {} FROM games WHERE id = ?1", GAME_COLUMNS);
        let row = self
            .conn
            .query_row(&sql, params![id], GameRow::from_row)
            .optional()?;

        row.map(GameRow::into_stored).transpose()
    }

    /// Loads game `id`, plays the move and stores the result in one
    /// transaction. `Ok(None)` means no such game.
    pub fn play_move(&self, id: &str, mv: &WireMove) -> Result<Option<StoredGame>> {
        let tx = self.conn.unchecked_transaction()?;

        let Some(stored) = self.get_game(id)? else {
            return Ok(None);
        };
        let next = rules::apply_coords(
            &stored.session,
            mv.from_row,
            mv.from_col,
            mv.to_row,
            mv.to_col,
        )?;
        let saved = self.save_game(&next, stored.version)?;

        tx.commit()?;
        Ok(Some(saved))
    }

    pub fn get_recent_games(&self, limit: u32) -> Result<Vec<StoredGame>> {
        let sql = format!(
            "SELECT {} FROM games ORDER BY updated_at DESC, rowid DESC LIMIT ?1",
            GAME_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let rows = stmt
            .query_map(params![limit], GameRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(GameRow::into_stored).collect()
    }

    pub fn count_games(&self) -> Result<u32> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM games",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn game_stats(&self) -> Result<GameStats> {
        let stats = self.conn.query_row(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(status = 'in_progress'), 0),
                COALESCE(SUM(status = 'finished'), 0),
                COALESCE(SUM(winner = 'red'), 0),
                COALESCE(SUM(winner = 'black'), 0)
            FROM games
            "#,
            [],
            |row| {
                Ok(GameStats {
                    total_games: row.get(0)?,
                    in_progress: row.get(1)?,
                    finished: row.get(2)?,
                    red_wins: row.get(3)?,
                    black_wins: row.get(4)?,
                })
            },
        )?;
        Ok(stats)
    }
}
