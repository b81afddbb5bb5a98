//! SQL schema for the AgriFusion SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS profiles (
    id            TEXT PRIMARY KEY,
    auth_user_id  TEXT NOT NULL UNIQUE,
    role          TEXT NOT NULL,   -- 'farmer' | 'consultant'
    status        TEXT NOT NULL,   -- 'pending' | 'approved' | 'rejected' | 'suspended' | 'active'
    full_name     TEXT,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS farmers (
    id             TEXT PRIMARY KEY,
    profile_id     TEXT NOT NULL UNIQUE REFERENCES profiles(id) ON DELETE CASCADE,
    district       TEXT,
    state          TEXT,
    current_crops  TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
    consultant_id  TEXT REFERENCES profiles(id) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS notifications (
    id            TEXT PRIMARY KEY,
    recipient_id  TEXT NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
    type          TEXT NOT NULL,
    title         TEXT NOT NULL,
    message       TEXT NOT NULL DEFAULT '',
    is_read       INTEGER NOT NULL DEFAULT 0,
    read_at       TEXT,
    priority      TEXT NOT NULL DEFAULT 'normal',
    category      TEXT,
    metadata      TEXT,            -- JSON or NULL
    created_at    TEXT NOT NULL
);

-- Bearer sessions. Only the SHA-256 of a token is ever stored.
CREATE TABLE IF NOT EXISTS sessions (
    token_hash    TEXT PRIMARY KEY,
    auth_user_id  TEXT NOT NULL,
    created_at    TEXT NOT NULL,
    expires_at    TEXT
);

CREATE INDEX IF NOT EXISTS farmers_consultant_idx      ON farmers(consultant_id);
CREATE INDEX IF NOT EXISTS notifications_recipient_idx ON notifications(recipient_id, created_at);

PRAGMA user_version = 1;
";
