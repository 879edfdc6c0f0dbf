//! SQL schema for the campus SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS contacts (
    contact_id   TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    email        TEXT NOT NULL,
    phone        TEXT,
    subject      TEXT NOT NULL,
    message      TEXT NOT NULL,
    status       TEXT NOT NULL DEFAULT 'new'
                 CHECK (status IN ('new', 'read', 'replied', 'archived')),
    submitted_at TEXT NOT NULL,   -- fixed-width RFC 3339 UTC; never updated
    replied_at   TEXT,            -- set whenever status becomes 'replied'
    admin_notes  TEXT
);

CREATE INDEX IF NOT EXISTS contacts_submitted_idx ON contacts(submitted_at);
CREATE INDEX IF NOT EXISTS contacts_status_idx    ON contacts(status);

PRAGMA user_version = 1;
";
