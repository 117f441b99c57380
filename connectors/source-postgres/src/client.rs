//! Connection establishment for the `PostgreSQL` source.
//!
//! Uses the sync `postgres` crate. The crate manages its own internal
//! tokio runtime, so a blocking client works from any thread.

use std::time::Duration;

use postgres::{Client, NoTls};
use tracing::debug;

use quarry_types::error::SqlFailure;

use crate::config::ConnectionConfig;

/// Open a fresh client for the configured database.
///
/// # Errors
///
/// Returns the raw driver failure, carrying the SQL state when the
/// server reported one.
pub fn connect(config: &ConnectionConfig) -> Result<Client, SqlFailure> {
    debug!(server = %config.display_string(), "connecting to postgres");
    let mut pg = postgres::Config::new();
    pg.host(&config.host)
        .port(config.port)
        .user(&config.user)
        .dbname(&config.database);
    if !config.password.is_empty() {
        pg.password(&config.password);
    }
    if let Some(secs) = config.connect_timeout_secs {
        pg.connect_timeout(Duration::from_secs(secs));
    }
    pg.connect(NoTls).map_err(sql_failure)
}

/// Convert a driver error into the dialect-neutral failure shape.
///
/// `PostgreSQL` reports no numeric vendor code; the 5-character SQL
/// state carries the classification signal, so the code is left at 0.
#[must_use]
pub fn sql_failure(err: postgres::Error) -> SqlFailure {
    match err.as_db_error() {
        Some(db) => SqlFailure::new(db.message(), 0, Some(db.code().code().to_string())),
        None => SqlFailure::new(err.to_string(), 0, None),
    }
}
