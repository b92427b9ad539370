//! Storage layer for rollcall.
//!
//! This module provides `SQLite`-based persistent storage for attendance
//! sessions and their per-student records.

pub mod migrations;
pub mod schema;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::attendance::{ClassKey, Session, Status, DATE_FORMAT};
use crate::error::{Error, Result};

/// Storage engine for attendance sessions.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let mut conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;",
        )?;
        migrations::initialize_schema(&mut conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        migrations::initialize_schema(&mut conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save a session and all its records.
    ///
    /// Returns the assigned session ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the session fails validation or the database
    /// operation fails. Nothing is written in either case.
    pub fn save_session(&mut self, session: &Session) -> Result<i64> {
        session.validate()?;

        let tx = self.conn.transaction()?;
        tx.execute(
            r"
            INSERT INTO sessions (date, branch, year, section, topic)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
            params![
                session.date.format(DATE_FORMAT).to_string(),
                session.class.branch,
                session.class.year,
                session.class.section,
                session.topic,
            ],
        )?;
        let id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO records (session_id, reg_no, status) VALUES (?1, ?2, ?3)",
            )?;
            for (reg_no, status) in &session.records {
                stmt.execute(params![id, reg_no, status_to_db(*status)])?;
            }
        }
        tx.commit()?;

        info!(
            id,
            class = %session.class,
            date = %session.date,
            present = session.present_count(),
            total = session.total(),
            "saved attendance session"
        );
        Ok(id)
    }

    /// Get a session by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_session(&self, id: i64) -> Result<Option<Session>> {
        let session = self
            .conn
            .query_row(
                r"
                SELECT id, date, branch, year, section, topic
                FROM sessions WHERE id = ?1
                ",
                [id],
                Self::row_to_session,
            )
            .optional()?;

        match session {
            Some(mut session) => {
                session.records = self.load_records(id)?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    /// List sessions of a class in date order, optionally bounded by an
    /// inclusive date range.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list_sessions(
        &self,
        class: &ClassKey,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Session>> {
        let from = from.map(|d| d.format(DATE_FORMAT).to_string());
        let to = to.map(|d| d.format(DATE_FORMAT).to_string());

        let mut stmt = self.conn.prepare(
            r"
            SELECT id, date, branch, year, section, topic
            FROM sessions
            WHERE branch = ?1 AND year = ?2 AND section = ?3
              AND (?4 IS NULL OR date >= ?4)
              AND (?5 IS NULL OR date <= ?5)
            ORDER BY date ASC, id ASC
            ",
        )?;

        let mut sessions = stmt
            .query_map(
                params![class.branch, class.year, class.section, from, to],
                Self::row_to_session,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for session in &mut sessions {
            if let Some(id) = session.id {
                session.records = self.load_records(id)?;
            }
        }

        debug!(class = %class, count = sessions.len(), "listed sessions");
        Ok(sessions)
    }

    /// Delete a session and its records.
    ///
    /// Returns `true` if a session was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_session(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM sessions WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let (total_sessions, total_records): (i64, i64) = self.conn.query_row(
            "SELECT (SELECT COUNT(*) FROM sessions), (SELECT COUNT(*) FROM records)",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let (first, last): (Option<String>, Option<String>) = self.conn.query_row(
            "SELECT MIN(date), MAX(date) FROM sessions",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_sessions,
            total_records,
            first_session: first.and_then(|d| NaiveDate::parse_from_str(&d, DATE_FORMAT).ok()),
            last_session: last.and_then(|d| NaiveDate::parse_from_str(&d, DATE_FORMAT).ok()),
            db_size_bytes,
        })
    }

    fn load_records(&self, session_id: i64) -> Result<BTreeMap<String, Status>> {
        let mut stmt = self
            .conn
            .prepare("SELECT reg_no, status FROM records WHERE session_id = ?1")?;

        let rows = stmt
            .query_map([session_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut records = BTreeMap::new();
        for (reg_no, status) in rows {
            match status.parse::<Status>() {
                Ok(status) => {
                    records.insert(reg_no, status);
                }
                Err(_) => warn!(session_id, reg_no = %reg_no, status = %status, "skipping unknown status"),
            }
        }
        Ok(records)
    }

    /// Convert a database row to a session without records.
    fn row_to_session(row: &rusqlite::Row) -> rusqlite::Result<Session> {
        let id: i64 = row.get(0)?;
        let date_str: String = row.get(1)?;
        let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Session {
            id: Some(id),
            date,
            class: ClassKey {
                branch: row.get(2)?,
                year: row.get(3)?,
                section: row.get(4)?,
            },
            topic: row.get(5)?,
            records: BTreeMap::new(),
        })
    }
}

fn status_to_db(status: Status) -> &'static str {
    match status {
        Status::Present => "present",
        Status::Absent => "absent",
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Total number of sessions stored.
    pub total_sessions: i64,
    /// Total number of attendance marks stored.
    pub total_records: i64,
    /// Date of the earliest session.
    pub first_session: Option<NaiveDate>,
    /// Date of the latest session.
    pub last_session: Option<NaiveDate>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
