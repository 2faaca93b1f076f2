use chrono::{DateTime, Local};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, instrument};

use crate::db::open_connection;
use crate::error::ServiceError;
use crate::game::Game;

/// Listing entry for a stored game, read from the summary columns
#[derive(Debug, Clone)]
pub struct SaveSummary {
    pub id: i64,
    pub updated_at: DateTime<Local>,
    pub words_guessed: usize,
    pub words_remaining: usize,
    pub misses: u32,
}

/// Game snapshots stored as JSON rows
#[derive(Debug)]
pub struct SaveStore {
    conn: Connection,
}

impl SaveStore {
    pub fn open(db_path: &Path) -> rusqlite::Result<Self> {
        Self::with_connection(open_connection(db_path)?)
    }

    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> rusqlite::Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS game_saves (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                state TEXT NOT NULL,
                words_guessed INTEGER NOT NULL,
                words_remaining INTEGER NOT NULL,
                misses INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        Ok(SaveStore { conn })
    }

    /// Store a new snapshot and return its id
    #[instrument(skip_all)]
    pub fn save(&self, game: &Game) -> Result<i64, ServiceError> {
        let state = serde_json::to_string(game)?;
        let now = Local::now().to_rfc3339();
        self.conn.execute(
            r#"
            INSERT INTO game_saves
                (state, words_guessed, words_remaining, misses, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
            params![
                state,
                game.words_guessed() as i64,
                game.words_remaining() as i64,
                game.misses(),
                now
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, "game saved");
        Ok(id)
    }

    /// Overwrite an existing snapshot
    #[instrument(skip(self, game))]
    pub fn update(&self, id: i64, game: &Game) -> Result<(), ServiceError> {
        let state = serde_json::to_string(game)?;
        let changed = self.conn.execute(
            r#"
            UPDATE game_saves
            SET state = ?1, words_guessed = ?2, words_remaining = ?3, misses = ?4, updated_at = ?5
            WHERE id = ?6
            "#,
            params![
                state,
                game.words_guessed() as i64,
                game.words_remaining() as i64,
                game.misses(),
                Local::now().to_rfc3339(),
                id
            ],
        )?;
        if changed == 0 {
            return Err(ServiceError::SaveNotFound(id));
        }
        Ok(())
    }

    pub fn get(&self, id: i64) -> Result<Option<Game>, ServiceError> {
        let state: Option<String> = self
            .conn
            .query_row(
                "SELECT state FROM game_saves WHERE id = ?1",
                [id],
                |row| row.get(0),
            )
            .optional()?;

        match state {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Every stored game, most recently updated first.
    ///
    /// Only the summary columns are read, so a damaged snapshot still lists.
    pub fn get_all(&self) -> Result<Vec<SaveSummary>, ServiceError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, updated_at, words_guessed, words_remaining, misses
            FROM game_saves
            ORDER BY updated_at DESC, id DESC
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            let updated_str: String = row.get(1)?;
            let updated_at = DateTime::parse_from_rfc3339(&updated_str)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        1,
                        "updated_at".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?
                .with_timezone(&Local);

            Ok(SaveSummary {
                id: row.get(0)?,
                updated_at,
                words_guessed: row.get::<_, i64>(2)? as usize,
                words_remaining: row.get::<_, i64>(3)? as usize,
                misses: row.get(4)?,
            })
        })?;

        let mut saves = Vec::new();
        for row in rows {
            saves.push(row?);
        }
        Ok(saves)
    }

    /// Returns whether a row was removed
    #[instrument(skip(self))]
    pub fn delete(&self, id: i64) -> Result<bool, ServiceError> {
        let removed = self
            .conn
            .execute("DELETE FROM game_saves WHERE id = ?1", [id])?;
        Ok(removed > 0)
    }
}
