//! SQL schema for the match store.
//!
//! Executed once at connection startup. Idempotent thanks to
//! `CREATE TABLE IF NOT EXISTS`.

/// Full schema DDL.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per direction; a match is always two rows sharing chat_id.
CREATE TABLE IF NOT EXISTS user_match (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id          INTEGER NOT NULL,
    matched_user_id  INTEGER NOT NULL,
    match_type       INTEGER NOT NULL DEFAULT 1,
    chat_id          TEXT    NOT NULL,
    created_at       TEXT    NOT NULL,   -- ISO 8601 UTC
    updated_at       TEXT,
    UNIQUE (user_id, matched_user_id),
    CHECK  (user_id <> matched_user_id)
);

CREATE INDEX IF NOT EXISTS user_match_user_idx    ON user_match(user_id, matched_user_id);
CREATE INDEX IF NOT EXISTS user_match_matched_idx ON user_match(matched_user_id, user_id);

CREATE TABLE IF NOT EXISTS profile_media (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL,
    url         TEXT    NOT NULL,
    order_id    INTEGER NOT NULL,
    created_at  TEXT    NOT NULL,
    deleted_at  TEXT
);

CREATE INDEX IF NOT EXISTS profile_media_user_idx ON profile_media(user_id, order_id);

PRAGMA user_version = 1;
";
