mod queries;

use std::fs;
use std::path::PathBuf;

use recipe_book_application::{ApplicationError, Clock, PreferenceStore};
use rusqlite::Connection;

use crate::migrations::MIGRATIONS;

/// Key-value preferences kept in a single SQLite table.
pub struct SqlitePreferenceStore {
    path: PathBuf,
    clock: Box<dyn Clock>,
}

impl SqlitePreferenceStore {
    pub fn new(path: String, clock: Box<dyn Clock>) -> Self {
        Self {
            path: PathBuf::from(path),
            clock,
        }
    }

    fn open_connection(&self) -> Result<Connection, ApplicationError> {
        Connection::open(&self.path)
            .map_err(|error| ApplicationError::Persistence(error.to_string()))
    }
}

impl PreferenceStore for SqlitePreferenceStore {
    fn initialize(&self) -> Result<(), ApplicationError> {
        if self.path.as_os_str().is_empty() {
            return Err(ApplicationError::InvalidInput(
                "store path must not be empty".to_string(),
            ));
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|error| ApplicationError::Io(error.to_string()))?;
            }
        }

        let conn = self.open_connection()?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|error| ApplicationError::Persistence(error.to_string()))?;

        for migration in MIGRATIONS {
            conn.execute_batch(migration)
                .map_err(|error| ApplicationError::Persistence(error.to_string()))?;
        }

        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, ApplicationError> {
        let conn = self.open_connection()?;
        queries::find_preference(&conn, key)
            .map_err(|error| ApplicationError::Persistence(error.to_string()))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), ApplicationError> {
        let conn = self.open_connection()?;
        let now = self.clock.now_timestamp_string();
        queries::upsert_preference(&conn, key, value, &now)
            .map_err(|error| ApplicationError::Persistence(error.to_string()))
    }
}
