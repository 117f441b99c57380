//! `PostgreSQL` batch source connector.
//!
//! Wires the sync `postgres` client into the core's [`RowSource`] seam
//! and selects the Postgres error-classification dialect. The CloudSQL
//! variant differs only in its documentation-link override.
//!
//! [`RowSource`]: quarry_core::row_source::RowSource

pub mod client;
pub mod config;
pub mod row_source;
pub mod types;

use quarry_core::classify::Dialect;
use quarry_core::config::SourceConfig;
use quarry_core::source::ConnectorSource;

pub use config::ConnectionConfig;
pub use row_source::{PostgresRowSource, PostgresRowSourceFactory};

/// Build a connector source for a self-managed `PostgreSQL` instance.
#[must_use]
pub fn connector_source(
    connection: ConnectionConfig,
    config: SourceConfig,
) -> ConnectorSource<PostgresRowSourceFactory> {
    ConnectorSource::new(
        config,
        Dialect::Postgres,
        PostgresRowSourceFactory::new(connection),
    )
}

/// Build a connector source for a CloudSQL-hosted `PostgreSQL` instance.
/// Same wire behavior; error messages link to the CloudSQL docs.
#[must_use]
pub fn cloudsql_connector_source(
    connection: ConnectionConfig,
    config: SourceConfig,
) -> ConnectorSource<PostgresRowSourceFactory> {
    ConnectorSource::new(
        config,
        Dialect::CloudSqlPostgres,
        PostgresRowSourceFactory::new(connection),
    )
}
