//! `SQLite` schema definitions for rollcall.

/// One row per class meeting.
pub const CREATE_SESSIONS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    branch TEXT NOT NULL,
    year INTEGER NOT NULL,
    section TEXT NOT NULL,
    topic TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// Class lookups always filter on the full class key and a date range.
pub const CREATE_SESSIONS_CLASS_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_sessions_class_date
    ON sessions(branch, year, section, date)
";

/// One row per student per session.
pub const CREATE_RECORDS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS records (
    session_id INTEGER NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
    reg_no TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('present', 'absent')),
    PRIMARY KEY (session_id, reg_no)
)
";

/// Per-student history lookups.
pub const CREATE_RECORDS_REG_NO_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_records_reg_no ON records(reg_no)
";

/// Key-value pairs such as the schema version.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_SESSIONS_TABLE,
    CREATE_SESSIONS_CLASS_INDEX,
    CREATE_RECORDS_TABLE,
    CREATE_RECORDS_REG_NO_INDEX,
    CREATE_METADATA_TABLE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.trim().is_empty());
        }
    }

    #[test]
    fn test_records_reference_sessions() {
        assert!(CREATE_RECORDS_TABLE.contains("REFERENCES sessions(id) ON DELETE CASCADE"));
        assert!(CREATE_RECORDS_TABLE.contains("PRIMARY KEY (session_id, reg_no)"));
    }

    #[test]
    fn test_statements_apply_cleanly() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        for stmt in SCHEMA_STATEMENTS {
            conn.execute(stmt, []).unwrap();
        }
    }
}
