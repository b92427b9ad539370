//! Error types for rollcall.
//!
//! Registration-number decoding never fails and reports problems through
//! [`crate::regno::Warning`] instead. Everything with I/O or user-supplied
//! structure (rosters, sessions, the database, configuration) reports
//! through [`Error`].

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for rollcall operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Roster Errors ===
    /// A roster file could not be read or parsed.
    #[error("failed to load roster from {path}: {message}")]
    RosterLoad {
        /// Path to the roster file.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
    },

    // === Attendance Errors ===
    /// An attendance session is not fit to be saved.
    #[error("invalid session: {reason}")]
    InvalidSession {
        /// Why the session was rejected.
        reason: String,
    },

    /// A branch name that is not in the branch table.
    #[error("unknown branch '{0}'")]
    UnknownBranch(String),

    /// An attendance status that is neither present nor absent.
    #[error("unknown attendance status '{0}'")]
    UnknownStatus(String),

    /// A date that could not be parsed.
    #[error("invalid date '{input}': {source}")]
    InvalidDate {
        /// The offending input.
        input: String,
        /// The underlying error.
        #[source]
        source: chrono::ParseError,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for rollcall operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid session error.
    #[must_use]
    pub fn invalid_session(reason: impl Into<String>) -> Self {
        Self::InvalidSession {
            reason: reason.into(),
        }
    }

    /// Create a roster load error.
    #[must_use]
    pub fn roster_load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::RosterLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if this error was caused by bad user input rather than the
    /// environment.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSession { .. }
                | Self::UnknownBranch(_)
                | Self::UnknownStatus(_)
                | Self::InvalidDate { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownBranch("BIO".to_string());
        assert_eq!(err.to_string(), "unknown branch 'BIO'");

        let err = Error::invalid_session("no records");
        assert_eq!(err.to_string(), "invalid session: no records");
    }

    #[test]
    fn test_error_is_input_error() {
        assert!(Error::invalid_session("empty").is_input_error());
        assert!(Error::UnknownStatus("late".to_string()).is_input_error());
        assert!(!Error::DatabaseMigration {
            message: "x".to_string()
        }
        .is_input_error());
    }

    #[test]
    fn test_roster_load_error_display() {
        let err = Error::roster_load("/data/students.json", "expected an object");
        let msg = err.to_string();
        assert!(msg.contains("/data/students.json"));
        assert!(msg.contains("expected an object"));
    }

    #[test]
    fn test_invalid_date_error_display() {
        let source = chrono::NaiveDate::parse_from_str("2025-13-01", "%Y-%m-%d").unwrap_err();
        let err = Error::InvalidDate {
            input: "2025-13-01".to_string(),
            source,
        };
        assert!(err.to_string().contains("2025-13-01"));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "anchor_year out of range".to_string(),
        };
        assert!(err.to_string().contains("anchor_year"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
