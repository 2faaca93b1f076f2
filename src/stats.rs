use chrono::{DateTime, Local};
use rusqlite::{params, Connection, OptionalExtension, Result};
use std::path::Path;
use tracing::{debug, instrument};

use crate::db::open_connection;

/// Running totals kept across games
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Counter {
    WinCount,
    LoseCount,
    CorrectGuesses,
    WrongGuesses,
}

impl Counter {
    pub const ALL: [Counter; 4] = [
        Counter::WinCount,
        Counter::LoseCount,
        Counter::CorrectGuesses,
        Counter::WrongGuesses,
    ];
}

/// One finished game
#[derive(Debug, Clone)]
pub struct GameResult {
    pub won: bool,
    pub words_guessed: usize,
    pub total_words: usize,
    pub finished_at: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSummary {
    pub wins: i64,
    pub losses: i64,
    pub correct_guesses: i64,
    pub wrong_guesses: i64,
}

impl StatsSummary {
    pub fn games_played(&self) -> i64 {
        self.wins + self.losses
    }

    /// Percentage of finished games that were won
    pub fn win_rate(&self) -> f64 {
        match self.games_played() {
            0 => 0.0,
            played => (self.wins as f64 / played as f64) * 100.0,
        }
    }

    /// Percentage of guesses that hit a letter
    pub fn accuracy(&self) -> f64 {
        match self.correct_guesses + self.wrong_guesses {
            0 => 0.0,
            total => (self.correct_guesses as f64 / total as f64) * 100.0,
        }
    }
}

/// Database manager for game statistics
#[derive(Debug)]
pub struct StatsDb {
    conn: Connection,
}

impl StatsDb {
    pub fn open(db_path: &Path) -> Result<Self> {
        Self::with_connection(open_connection(db_path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS counters (
                name TEXT PRIMARY KEY,
                value INTEGER NOT NULL DEFAULT 0
            );
            CREATE TABLE IF NOT EXISTS game_results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                won BOOLEAN NOT NULL,
                words_guessed INTEGER NOT NULL,
                total_words INTEGER NOT NULL,
                finished_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_game_results_finished_at ON game_results(finished_at);
            "#,
        )?;

        Ok(StatsDb { conn })
    }

    /// Add one to a counter, creating it on first use
    #[instrument(skip(self))]
    pub fn increment(&self, counter: Counter) -> Result<i64> {
        self.conn.execute(
            r#"
            INSERT INTO counters (name, value) VALUES (?1, 1)
            ON CONFLICT(name) DO UPDATE SET value = value + 1
            "#,
            [counter.to_string()],
        )?;
        let value = self.counter(counter)?;
        debug!(value, "counter incremented");
        Ok(value)
    }

    pub fn counter(&self, counter: Counter) -> Result<i64> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM counters WHERE name = ?1",
                [counter.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.unwrap_or(0))
    }

    pub fn record_result(&self, result: &GameResult) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO game_results (won, words_guessed, total_words, finished_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                result.won,
                result.words_guessed as i64,
                result.total_words as i64,
                result.finished_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    /// Most recent results first
    pub fn recent_results(&self, limit: usize) -> Result<Vec<GameResult>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT won, words_guessed, total_words, finished_at
            FROM game_results
            ORDER BY finished_at DESC, id DESC
            LIMIT ?1
            "#,
        )?;

        let result_iter = stmt.query_map([limit as i64], |row| {
            let finished_str: String = row.get(3)?;
            let finished_at = DateTime::parse_from_rfc3339(&finished_str)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        3,
                        "finished_at".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?
                .with_timezone(&Local);

            Ok(GameResult {
                won: row.get(0)?,
                words_guessed: row.get::<_, i64>(1)? as usize,
                total_words: row.get::<_, i64>(2)? as usize,
                finished_at,
            })
        })?;

        let mut results = Vec::new();
        for result in result_iter {
            results.push(result?);
        }

        Ok(results)
    }

    pub fn summary(&self) -> Result<StatsSummary> {
        Ok(StatsSummary {
            wins: self.counter(Counter::WinCount)?,
            losses: self.counter(Counter::LoseCount)?,
            correct_guesses: self.counter(Counter::CorrectGuesses)?,
            wrong_guesses: self.counter(Counter::WrongGuesses)?,
        })
    }

    /// Clear all statistics (for testing or reset purposes)
    pub fn clear_all(&self) -> Result<()> {
        self.conn
            .execute_batch("DELETE FROM counters; DELETE FROM game_results;")
    }
}
