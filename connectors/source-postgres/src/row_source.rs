//! [`RowSource`] implementation over a sync `postgres` client.

use postgres::{Client, Row};
use tracing::debug;

use quarry_core::row_source::{AcquireError, RowSource, RowSourceFactory};
use quarry_types::error::SqlFailure;
use quarry_types::schema::{Field, Schema};

use crate::client::{connect, sql_failure};
use crate::config::ConnectionConfig;
use crate::types;

/// One exclusively owned `PostgreSQL` connection. The connection closes
/// when the source is dropped.
pub struct PostgresRowSource {
    client: Client,
}

impl PostgresRowSource {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl RowSource for PostgresRowSource {
    fn execute(&mut self, statement: &str) -> Result<(), SqlFailure> {
        debug!(statement, "executing statement");
        self.client.batch_execute(statement).map_err(sql_failure)
    }

    fn probe_schema(&mut self, query: &str) -> Result<Schema, SqlFailure> {
        debug!(query, "probing result schema");
        // Preparing the statement yields full result metadata without
        // fetching any rows, which stays inside the probe's 1-row budget.
        let statement = self.client.prepare(query).map_err(sql_failure)?;
        let fields = statement
            .columns()
            .iter()
            .map(|col| {
                let (data_type, logical_type) = types::resolve(col.type_().name());
                // Prepared-statement metadata does not report nullability,
                // so every probed field is treated as nullable.
                Field {
                    name: col.name().to_string(),
                    data_type,
                    logical_type,
                    nullable: true,
                }
            })
            .collect();
        Ok(Schema::new(fields))
    }

    fn query_bounds(&mut self, query: &str) -> Result<(i64, i64), SqlFailure> {
        debug!(query, "querying split bounds");
        let row = self.client.query_one(query, &[]).map_err(sql_failure)?;
        if row.len() != 2 {
            return Err(SqlFailure::new(
                format!(
                    "Bounding query must return exactly two columns (min, max), got {}.",
                    row.len()
                ),
                0,
                None,
            ));
        }
        Ok((integral_at(&row, 0)?, integral_at(&row, 1)?))
    }
}

/// Read an integral scalar, widening from whatever integer width the
/// server reported for the aggregate.
fn integral_at(row: &Row, idx: usize) -> Result<i64, SqlFailure> {
    if let Ok(v) = row.try_get::<_, i64>(idx) {
        return Ok(v);
    }
    if let Ok(v) = row.try_get::<_, i32>(idx) {
        return Ok(i64::from(v));
    }
    if let Ok(v) = row.try_get::<_, i16>(idx) {
        return Ok(i64::from(v));
    }
    Err(SqlFailure::new(
        format!("Bounding query column {idx} is not an integral type."),
        0,
        None,
    ))
}

/// Opens fresh [`PostgresRowSource`] connections from a fixed
/// configuration.
pub struct PostgresRowSourceFactory {
    config: ConnectionConfig,
}

impl PostgresRowSourceFactory {
    #[must_use]
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }
}

impl RowSourceFactory for PostgresRowSourceFactory {
    type Source = PostgresRowSource;

    fn open(&self) -> Result<Self::Source, AcquireError> {
        let client = connect(&self.config).map_err(AcquireError::Connect)?;
        Ok(PostgresRowSource::new(client))
    }
}
