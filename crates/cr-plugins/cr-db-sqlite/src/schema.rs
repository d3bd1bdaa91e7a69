//! Table definitions. Cascades are declared here, never coded.

use cr_core::error::Result;
use sqlx::sqlite::SqlitePool;

use crate::db_err;

const STATEMENTS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS titles (
        id        BLOB PRIMARY KEY,
        name      TEXT NOT NULL UNIQUE,
        crown     TEXT NOT NULL DEFAULT '',
        copyright TEXT NOT NULL DEFAULT ''
    )",
    // A NULL title_id never collides under UNIQUE, as with any SQL UNIQUE.
    "CREATE TABLE IF NOT EXISTS granters (
        id           BLOB PRIMARY KEY,
        name         TEXT NOT NULL,
        portrait     TEXT,
        main_img     TEXT NOT NULL DEFAULT '',
        synopsis     TEXT NOT NULL DEFAULT '',
        title_id     BLOB REFERENCES titles(id) ON DELETE CASCADE,
        coat_of_arms TEXT NOT NULL DEFAULT '',
        description  TEXT NOT NULL DEFAULT '',
        copyright    TEXT NOT NULL DEFAULT '',
        UNIQUE (name, title_id)
    )",
    "CREATE TABLE IF NOT EXISTS countries (
        id   BLOB PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS country_rulers (
        country_id BLOB NOT NULL REFERENCES countries(id) ON DELETE CASCADE,
        granter_id BLOB NOT NULL REFERENCES granters(id) ON DELETE CASCADE,
        PRIMARY KEY (country_id, granter_id)
    )",
    "CREATE TABLE IF NOT EXISTS provinces (
        id   BLOB PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS cities (
        id           BLOB PRIMARY KEY,
        name         TEXT NOT NULL UNIQUE,
        grant_date   TEXT,
        granter_id   BLOB REFERENCES granters(id) ON DELETE CASCADE,
        province_id  BLOB REFERENCES provinces(id) ON DELETE CASCADE,
        main_img     TEXT NOT NULL DEFAULT '',
        synopsis     TEXT NOT NULL DEFAULT '',
        is_city      INTEGER DEFAULT 0,
        banned       INTEGER DEFAULT 0,
        coat_of_arms TEXT NOT NULL DEFAULT '',
        description  TEXT NOT NULL DEFAULT '',
        latin        TEXT NOT NULL DEFAULT ''
    )",
    "CREATE INDEX IF NOT EXISTS idx_cities_grant_date ON cities (grant_date)",
    "CREATE INDEX IF NOT EXISTS idx_cities_granter ON cities (granter_id)",
    "CREATE TABLE IF NOT EXISTS visits (
        id       BLOB PRIMARY KEY,
        date     TEXT,
        rating   REAL,
        city_id  BLOB REFERENCES cities(id) ON DELETE CASCADE,
        main_img TEXT NOT NULL DEFAULT ''
    )",
    "CREATE INDEX IF NOT EXISTS idx_visits_city ON visits (city_id)",
    "CREATE TABLE IF NOT EXISTS traces (
        id          BLOB PRIMARY KEY,
        name        TEXT NOT NULL DEFAULT '',
        city_id     BLOB REFERENCES cities(id) ON DELETE CASCADE,
        image       TEXT NOT NULL DEFAULT '',
        description TEXT NOT NULL DEFAULT '',
        lat         REAL,
        lon         REAL
    )",
    "CREATE INDEX IF NOT EXISTS idx_traces_city ON traces (city_id)",
    "CREATE TABLE IF NOT EXISTS todos (
        id          BLOB PRIMARY KEY,
        subject     TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        start_time  TEXT NOT NULL,
        end_time    TEXT NOT NULL,
        done        INTEGER NOT NULL DEFAULT 0,
        reminder    INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS selections (
        id       BLOB PRIMARY KEY,
        selected TEXT,
        todo     TEXT
    )",
    "CREATE TABLE IF NOT EXISTS history (
        id   BLOB PRIMARY KEY,
        todo TEXT,
        rank INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS timeblocks (
        id        BLOB PRIMARY KEY,
        name      TEXT NOT NULL,
        starts_at TEXT NOT NULL,
        ends_at   TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS timeblock_todos (
        timeblock_id BLOB NOT NULL REFERENCES timeblocks(id) ON DELETE CASCADE,
        todo_id      BLOB NOT NULL REFERENCES todos(id) ON DELETE CASCADE,
        PRIMARY KEY (timeblock_id, todo_id)
    )",
];

pub(crate) async fn init(pool: &SqlitePool) -> Result<()> {
    for statement in STATEMENTS {
        sqlx::query(*statement).execute(pool).await.map_err(db_err)?;
    }
    Ok(())
}
