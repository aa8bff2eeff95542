//! SQL schema for the phonebook SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `name_key` and `surname_key` hold the case-folded key
/// ([`phonebook_core::RecordKey::folded`]), computed in Rust so that folding
/// is the same as for the in-memory directory. Lookups and uniqueness use
/// only these columns.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS records (
    seq         INTEGER PRIMARY KEY AUTOINCREMENT,  -- insertion order
    record_id   TEXT NOT NULL UNIQUE,
    name        TEXT NOT NULL,
    surname     TEXT NOT NULL,
    name_key    TEXT NOT NULL,
    surname_key TEXT NOT NULL,
    phone       TEXT NOT NULL,
    birth_date  TEXT,                               -- ISO 8601 date or NULL
    UNIQUE (name_key, surname_key)
);

PRAGMA user_version = 2;
";
