//! SQL schema for the Itinera SQLite store.
//!
//! Executed once at connection startup. Every child table references its
//! parent with `ON DELETE CASCADE`, so removing a trip removes its whole
//! subtree.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS trips (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    region          TEXT    NOT NULL CHECK (length(trim(region)) > 0),
    name            TEXT    NOT NULL CHECK (length(trim(name)) > 0),
    duration_nights INTEGER NOT NULL CHECK (duration_nights >= 1)
);

CREATE TABLE IF NOT EXISTS days (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    trip_id    INTEGER NOT NULL REFERENCES trips(id) ON DELETE CASCADE,
    day_number INTEGER NOT NULL CHECK (day_number >= 1),   -- 1-based
    date       TEXT                                        -- free-form label or NULL
);

CREATE TABLE IF NOT EXISTS accommodations (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    day_id   INTEGER NOT NULL REFERENCES days(id) ON DELETE CASCADE,
    name     TEXT    NOT NULL CHECK (length(trim(name)) > 0),
    location TEXT    NOT NULL CHECK (length(trim(location)) > 0)
);

CREATE TABLE IF NOT EXISTS transfers (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    day_id        INTEGER NOT NULL REFERENCES days(id) ON DELETE CASCADE,
    mode          TEXT    NOT NULL CHECK (length(trim(mode)) > 0),
    from_location TEXT    NOT NULL CHECK (length(trim(from_location)) > 0),
    to_location   TEXT    NOT NULL CHECK (length(trim(to_location)) > 0)
);

CREATE TABLE IF NOT EXISTS activities (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    day_id      INTEGER NOT NULL REFERENCES days(id) ON DELETE CASCADE,
    name        TEXT    NOT NULL CHECK (length(trim(name)) > 0),
    description TEXT
);

CREATE UNIQUE INDEX IF NOT EXISTS days_trip_day_idx    ON days(trip_id, day_number);
CREATE INDEX IF NOT EXISTS trips_region_idx            ON trips(region);
CREATE INDEX IF NOT EXISTS trips_duration_idx          ON trips(duration_nights);
CREATE INDEX IF NOT EXISTS trips_region_duration_idx   ON trips(region, duration_nights);
CREATE INDEX IF NOT EXISTS accommodations_day_idx      ON accommodations(day_id);
CREATE INDEX IF NOT EXISTS transfers_day_idx           ON transfers(day_id);
CREATE INDEX IF NOT EXISTS activities_day_idx          ON activities(day_id);

PRAGMA user_version = 1;
";
