//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema for the card database.
///
/// Timestamps are unix microseconds so ordering comparisons stay numeric and
/// dates far past year 9999 still round-trip.
pub const SCHEMA: &str = r#"
-- Cards with their scheduling state
CREATE TABLE IF NOT EXISTS cards (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    front TEXT NOT NULL,
    back TEXT NOT NULL,
    subject TEXT,
    module TEXT,
    tags TEXT NOT NULL DEFAULT '[]',
    difficulty TEXT NOT NULL DEFAULT 'medium',
    created_at INTEGER NOT NULL,
    last_reviewed INTEGER,
    review_count INTEGER NOT NULL DEFAULT 0,
    correct_count INTEGER NOT NULL DEFAULT 0,
    interval_days INTEGER NOT NULL DEFAULT 1,
    ease_factor REAL NOT NULL DEFAULT 2.5,
    next_review INTEGER NOT NULL,
    streak INTEGER NOT NULL DEFAULT 0
);

-- Global settings
CREATE TABLE IF NOT EXISTS global_settings (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    maximum_interval_days INTEGER,
    new_cards_per_session INTEGER NOT NULL DEFAULT 20,
    reviews_per_session INTEGER NOT NULL DEFAULT 200
);

-- Per-subject overrides
CREATE TABLE IF NOT EXISTS subject_settings (
    subject TEXT PRIMARY KEY,
    maximum_interval_days INTEGER,
    interval_uncapped INTEGER NOT NULL DEFAULT 0,
    new_cards_per_session INTEGER,
    reviews_per_session INTEGER
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_cards_subject ON cards(subject);
CREATE INDEX IF NOT EXISTS idx_cards_next_review ON cards(next_review);
"#;

/// Initialize global settings if not exists.
pub const INIT_GLOBAL_SETTINGS: &str = r#"
INSERT OR IGNORE INTO global_settings (id) VALUES (1);
"#;
