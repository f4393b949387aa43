//! SQLite storage for game sessions

mod db;
mod models;

pub use db::Database;
pub use models::*;
