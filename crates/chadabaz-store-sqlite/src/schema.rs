//! SQL schema for the chadabaz SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS parties (
    party_id      TEXT PRIMARY KEY,
    name          TEXT NOT NULL UNIQUE,
    total_reports INTEGER NOT NULL DEFAULT 0,   -- denormalised; never read for stats
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

-- Intake identity is (name, area). The UNIQUE constraint lets find-or-create
-- run as INSERT .. ON CONFLICT DO NOTHING without racing.
CREATE TABLE IF NOT EXISTS subjects (
    subject_id  TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    area        TEXT NOT NULL,
    party_id    TEXT NOT NULL REFERENCES parties(party_id),
    image_url   TEXT,
    description TEXT,
    social_json TEXT NOT NULL DEFAULT '{}',
    visible     INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    UNIQUE (name, area)
);

-- Reports are hard-deleted; there is no tombstone.
CREATE TABLE IF NOT EXISTS reports (
    report_id   TEXT PRIMARY KEY,
    subject_id  TEXT NOT NULL REFERENCES subjects(subject_id),
    body        TEXT NOT NULL,
    media_json  TEXT NOT NULL DEFAULT '[]',   -- ordered JSON array of URLs
    status      TEXT NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'approved', 'rejected')),
    submitter   TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS reports_subject_idx ON reports(subject_id);
CREATE INDEX IF NOT EXISTS reports_status_idx  ON reports(status);
CREATE INDEX IF NOT EXISTS reports_created_idx ON reports(created_at);

PRAGMA user_version = 1;
";
