use chrono::{DateTime, Local};
use clap::ValueEnum;
use rusqlite::{params, Connection};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use thiserror::Error;

use crate::app_dirs::AppDirs;
use crate::mode::GameMode;
use crate::session::FinalResults;

pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("leaderboard database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("failed to create leaderboard directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("leaderboard unavailable: {0}")]
    Unavailable(String),
}

/// One row of the leaderboard, ranked by letters per second
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub letters_per_second: f64,
    pub mode: GameMode,
    pub recorded_at: DateTime<Local>,
}

impl From<&FinalResults> for LeaderboardEntry {
    fn from(results: &FinalResults) -> Self {
        Self {
            player_name: results.player_name.clone(),
            letters_per_second: results.typing_speed,
            mode: results.mode,
            recorded_at: Local::now(),
        }
    }
}

/// Where finished runs are ranked
pub trait Leaderboard {
    fn submit(&mut self, entry: &LeaderboardEntry) -> Result<(), LeaderboardError>;
    /// Best entries first
    fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError>;
}

/// Lets the app keep one connection and share it with every session
impl<L: Leaderboard> Leaderboard for Rc<RefCell<L>> {
    fn submit(&mut self, entry: &LeaderboardEntry) -> Result<(), LeaderboardError> {
        self.borrow_mut().submit(entry)
    }

    fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        self.borrow().top(limit)
    }
}

#[derive(Debug)]
pub struct SqliteLeaderboard {
    conn: Connection,
}

impl SqliteLeaderboard {
    /// Opens the leaderboard under the user's state directory
    pub fn open_default() -> Result<Self, LeaderboardError> {
        let path = AppDirs::leaderboard_path().unwrap_or_else(|| PathBuf::from("leaderboard.db"));
        Self::open(path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LeaderboardError> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, LeaderboardError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, LeaderboardError> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS leaderboard (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                player_name TEXT NOT NULL,
                letters_per_second REAL NOT NULL,
                mode TEXT NOT NULL,
                recorded_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_leaderboard_lps ON leaderboard(letters_per_second)",
            [],
        )?;

        Ok(Self { conn })
    }
}

impl Leaderboard for SqliteLeaderboard {
    fn submit(&mut self, entry: &LeaderboardEntry) -> Result<(), LeaderboardError> {
        self.conn.execute(
            r#"
            INSERT INTO leaderboard (player_name, letters_per_second, mode, recorded_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                entry.player_name,
                entry.letters_per_second,
                mode_key(entry.mode),
                entry.recorded_at.to_rfc3339(),
            ],
        )?;
        log::debug!(
            "saved leaderboard entry {} - {:.2} LPS",
            entry.player_name,
            entry.letters_per_second
        );
        Ok(())
    }

    fn top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, LeaderboardError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT player_name, letters_per_second, mode, recorded_at
            FROM leaderboard
            ORDER BY letters_per_second DESC, id ASC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map([limit as i64], |row| {
            let mode_str: String = row.get(2)?;
            let mode = GameMode::from_str(&mode_str, true).map_err(|_| {
                rusqlite::Error::InvalidColumnType(2, "mode".to_string(), rusqlite::types::Type::Text)
            })?;

            let recorded_str: String = row.get(3)?;
            let recorded_at = DateTime::parse_from_rfc3339(&recorded_str)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        3,
                        "recorded_at".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?
                .with_timezone(&Local);

            Ok(LeaderboardEntry {
                player_name: row.get(0)?,
                letters_per_second: row.get(1)?,
                mode,
                recorded_at,
            })
        })?;

        let mut entries = Vec::new();
        for entry in rows {
            entries.push(entry?);
        }
        Ok(entries)
    }
}

fn mode_key(mode: GameMode) -> String {
    mode.to_possible_value()
        .map(|v| v.get_name().to_string())
        .unwrap_or_else(|| mode.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(name: &str, lps: f64, mode: GameMode) -> LeaderboardEntry {
        LeaderboardEntry {
            player_name: name.to_string(),
            letters_per_second: lps,
            mode,
            recorded_at: Local::now(),
        }
    }

    #[test]
    fn test_empty_leaderboard() {
        let board = SqliteLeaderboard::open_in_memory().unwrap();
        assert!(board.top(DEFAULT_TOP_N).unwrap().is_empty());
    }

    #[test]
    fn test_top_orders_by_speed_descending() {
        let mut board = SqliteLeaderboard::open_in_memory().unwrap();
        board.submit(&entry("slow", 1.5, GameMode::TimeAttack)).unwrap();
        board.submit(&entry("fast", 6.25, GameMode::Conquest)).unwrap();
        board.submit(&entry("mid", 3.0, GameMode::Survival)).unwrap();

        let top = board.top(10).unwrap();
        let names: Vec<&str> = top.iter().map(|e| e.player_name.as_str()).collect();
        assert_eq!(names, vec!["fast", "mid", "slow"]);
        assert_eq!(top[0].mode, GameMode::Conquest);
        assert_eq!(top[0].letters_per_second, 6.25);
    }

    #[test]
    fn test_top_respects_limit() {
        let mut board = SqliteLeaderboard::open_in_memory().unwrap();
        for i in 0..15 {
            board
                .submit(&entry(&format!("p{i}"), i as f64, GameMode::TimeAttack))
                .unwrap();
        }
        let top = board.top(DEFAULT_TOP_N).unwrap();
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].player_name, "p14");
        assert_eq!(top[9].player_name, "p5");
    }

    #[test]
    fn test_entries_persist_on_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("leaderboard.db");
        {
            let mut board = SqliteLeaderboard::open(&path).unwrap();
            board.submit(&entry("ada", 4.2, GameMode::Survival)).unwrap();
        }
        let board = SqliteLeaderboard::open(&path).unwrap();
        let top = board.top(1).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].player_name, "ada");
        assert_eq!(top[0].mode, GameMode::Survival);
    }

    #[test]
    fn test_entry_from_results() {
        let results = FinalResults {
            score: 10,
            wrongs_count: 1,
            total_words_presented: 4,
            typing_speed: 3.14,
            message: "Time's up!".into(),
            mode: GameMode::TimeAttack,
            player_name: "ada".into(),
        };
        let e = LeaderboardEntry::from(&results);
        assert_eq!(e.player_name, "ada");
        assert_eq!(e.letters_per_second, 3.14);
        assert_eq!(e.mode, GameMode::TimeAttack);
    }

    #[test]
    fn test_mode_key_matches_cli_names() {
        assert_eq!(mode_key(GameMode::TimeAttack), "time-attack");
        assert_eq!(mode_key(GameMode::Conquest), "conquest");
    }
}
