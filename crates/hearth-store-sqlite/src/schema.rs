//! SQL schema for the Hearth SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA busy_timeout = 2000;

-- One row per document. `collection` is the full collection path, e.g.
-- 'groups/g1/members'; `doc_id` is the final path segment.
CREATE TABLE IF NOT EXISTS documents (
    collection  TEXT NOT NULL,
    doc_id      TEXT NOT NULL,
    fields      TEXT NOT NULL,   -- JSON object
    create_time TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    update_time TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    PRIMARY KEY (collection, doc_id)
);

CREATE INDEX IF NOT EXISTS documents_created_idx
    ON documents(collection, create_time);

PRAGMA user_version = 1;
";
