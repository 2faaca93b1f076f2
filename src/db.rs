use rusqlite::{Connection, Result};
use std::path::Path;

/// Open (creating if needed) the sqlite file that holds saves and statistics
pub fn open_connection(db_path: &Path) -> Result<Connection> {
    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                Some(format!("Failed to create directory: {e}")),
            )
        })?;
    }

    Connection::open(db_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("hangman.db");
        let conn = open_connection(&path).unwrap();
        conn.execute_batch("CREATE TABLE t (x INTEGER)").unwrap();
        assert!(path.exists());
    }
}
