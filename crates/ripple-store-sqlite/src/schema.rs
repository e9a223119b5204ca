//! SQL schema for the ripple SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`.
//! Future migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Users are created by an external registration process; this service
-- only ever reads them (plus a seeding helper for tests/ops).
CREATE TABLE IF NOT EXISTS users (
    id         TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    last_seen  TEXT             -- ISO 8601 UTC, second precision; NULL if never recorded
);

CREATE TABLE IF NOT EXISTS activities (
    feed_id              TEXT PRIMARY KEY,
    action_text_template TEXT NOT NULL    -- contains literal {subject} / {object}
);

-- Referring rows are only ever replaced wholesale: an upsert deletes
-- both lists for a feed_id and re-inserts, inside one transaction.
CREATE TABLE IF NOT EXISTS activity_subject_referring (
    feed_id        TEXT NOT NULL REFERENCES activities(feed_id),
    referring_type TEXT NOT NULL DEFAULT 'USER',  -- 'USER' | 'POST'
    referring_id   TEXT NOT NULL,
    user_id        TEXT                           -- owner of a referenced post
);

CREATE TABLE IF NOT EXISTS activity_object_referring (
    feed_id        TEXT NOT NULL REFERENCES activities(feed_id),
    referring_type TEXT NOT NULL DEFAULT 'USER',
    referring_id   TEXT NOT NULL,
    user_id        TEXT
);

CREATE INDEX IF NOT EXISTS subject_referring_feed_idx ON activity_subject_referring(feed_id);
CREATE INDEX IF NOT EXISTS object_referring_feed_idx  ON activity_object_referring(feed_id);

PRAGMA user_version = 1;
";
