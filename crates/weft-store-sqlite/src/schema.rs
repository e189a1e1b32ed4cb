//! SQL schema for the Weft SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Source rows the conversion pipeline reads. The catalogue feed owns this
-- table; the tool only reads it and writes the resolved IDs elsewhere.
CREATE TABLE IF NOT EXISTS products (
    record_id       TEXT PRIMARY KEY,
    display_name    TEXT NOT NULL,
    color_name      TEXT,
    size_name       TEXT,
    composite_value TEXT,
    color_id        INTEGER,
    size_id         INTEGER,
    created_at      TEXT,
    updated_at      TEXT
);

-- One rule table per domain. source_name is deliberately not unique:
-- duplicates are tolerated and resolution order settles ties.
CREATE TABLE IF NOT EXISTS color_rules (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    source_name TEXT NOT NULL,
    target_id   INTEGER NOT NULL,
    target_name TEXT NOT NULL,
    confidence  REAL NOT NULL DEFAULT 1.0,
    is_active   INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS size_rules (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    source_name TEXT NOT NULL,
    target_id   INTEGER NOT NULL,
    target_name TEXT NOT NULL,
    confidence  REAL NOT NULL DEFAULT 1.0,
    is_active   INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

-- The history table is strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS conversion_history (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    record_id         TEXT NOT NULL,
    original_value    TEXT NOT NULL,
    resolved_color_id INTEGER,
    resolved_size_id  INTEGER,
    kind              TEXT NOT NULL,   -- 'auto' | 'manual' | 'composite'
    status            TEXT NOT NULL,   -- 'success' | 'failed'
    confidence        REAL NOT NULL DEFAULT 1.0,
    error_message     TEXT,
    created_at        TEXT NOT NULL
);

-- Resolved assignments, one row per record, upserted on re-registration.
-- created_at survives conflicts; updated_at tracks the latest write.
CREATE TABLE IF NOT EXISTS color_assignments (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    record_id    TEXT NOT NULL UNIQUE,
    display_name TEXT NOT NULL,
    color_name   TEXT,
    color_id     INTEGER NOT NULL,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS size_assignments (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    record_id    TEXT NOT NULL UNIQUE,
    display_name TEXT NOT NULL,
    size_name    TEXT,
    size_id      INTEGER NOT NULL,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS color_rules_source_idx ON color_rules(source_name);
CREATE INDEX IF NOT EXISTS size_rules_source_idx  ON size_rules(source_name);
CREATE INDEX IF NOT EXISTS history_record_idx     ON conversion_history(record_id);
CREATE INDEX IF NOT EXISTS history_created_idx    ON conversion_history(created_at);

PRAGMA user_version = 1;
";
