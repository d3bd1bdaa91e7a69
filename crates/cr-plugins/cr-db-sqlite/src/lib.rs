//! # cr-db-sqlite Implementation
//!
//! This crate implements the data mapping between the SQLite relational model
//! and the `cr-core` domain models.

mod city_rights;
mod schema;
mod todo;

pub use city_rights::SqliteCityRightsRepo;
pub use todo::SqliteTodoRepo;

use cr_core::error::{AppError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use uuid::Uuid;

/// Opens a pool on `url` and makes sure the schema exists.
///
/// # Developer Note
/// Every connection to `sqlite::memory:` sees its own, empty database, so
/// in-memory pools are pinned to a single connection that never expires.
pub async fn connect(url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)
        .map_err(db_err)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool_options = if url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections)
    };

    let pool = pool_options.connect_with(options).await.map_err(db_err)?;
    schema::init(&pool).await?;
    log::info!("sqlite schema ready at {url}");
    Ok(pool)
}

// Helpers for UUID conversion
pub(crate) fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

pub(crate) fn blob_to_uuid(blob: &[u8]) -> Uuid {
    Uuid::from_slice(blob).unwrap_or_default()
}

pub(crate) fn opt_uuid_to_blob(id: Option<Uuid>) -> Option<Vec<u8>> {
    id.map(uuid_to_blob)
}

/// Maps driver failures onto the domain error taxonomy.
pub(crate) fn db_err(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return AppError::Conflict(db.message().to_string());
        }
        if db.is_foreign_key_violation() {
            return AppError::ValidationError(format!("dangling reference: {}", db.message()));
        }
    }
    AppError::Internal(err.to_string())
}

/// Case-insensitive prefix match that folds Unicode case, not just ASCII.
pub(crate) fn starts_with_ignore_case(name: &str, prefix: &str) -> bool {
    name.to_lowercase().starts_with(&prefix.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_match_folds_case() {
        assert!(starts_with_ignore_case("Haarlem", "haar"));
        assert!(starts_with_ignore_case("Élst", "élst"));
        assert!(starts_with_ignore_case("élst", "ÉL"));
        assert!(starts_with_ignore_case("Delft", ""));
        assert!(!starts_with_ignore_case("Haarlem", "arlem"));
        assert!(!starts_with_ignore_case("Haarlem", "H_ar"));
    }

    #[test]
    fn test_uuid_blob_round_trip() {
        let id = Uuid::now_v7();
        assert_eq!(blob_to_uuid(&uuid_to_blob(id)), id);
        assert_eq!(blob_to_uuid(&[1, 2, 3]), Uuid::nil());
    }

    #[tokio::test]
    async fn test_connect_is_idempotent_on_schema() {
        let pool = connect("sqlite::memory:", 1).await.unwrap();
        schema::init(&pool).await.unwrap();
    }
}
