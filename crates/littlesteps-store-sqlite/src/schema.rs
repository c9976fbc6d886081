//! SQL schema for the littlesteps SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Membership checks resolve single rows through the primary key. The
-- per-caller listings match by json_each over the id-set columns, which
-- scans the table; a link table is the migration path if rosters outgrow it.
CREATE TABLE IF NOT EXISTS children (
    child_id       TEXT PRIMARY KEY,
    name           TEXT NOT NULL,
    birthday       TEXT NOT NULL,               -- YYYY-MM-DD
    group_label    TEXT,
    allergies      TEXT NOT NULL DEFAULT '[]',  -- JSON array of strings
    notes          TEXT NOT NULL DEFAULT '',
    parent_ids     TEXT NOT NULL,               -- JSON array of 24-hex ids; never empty
    supervisor_ids TEXT NOT NULL DEFAULT '[]',  -- JSON array, set semantics
    created_at     TEXT NOT NULL                -- RFC 3339 UTC, fixed width
);

-- Activities are never updated in place; the only write after insertion is
-- individual deletion.
CREATE TABLE IF NOT EXISTS activities (
    activity_id TEXT PRIMARY KEY,
    child_id    TEXT NOT NULL,
    kind        TEXT NOT NULL,   -- open tag set: 'meal', 'sleep', 'drawing', ...
    details     TEXT NOT NULL,   -- JSON object
    logged_by   TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS activities_child_idx   ON activities(child_id);
CREATE INDEX IF NOT EXISTS activities_created_idx ON activities(created_at);

PRAGMA user_version = 1;
";
