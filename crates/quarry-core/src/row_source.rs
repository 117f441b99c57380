//! Row-source seam between the core and dialect drivers.
//!
//! The core never talks to a database client directly; it acquires a
//! [`RowSource`] from a [`RowSourceFactory`] for the duration of one
//! round-trip sequence and drops it when done (scoped acquisition — the
//! connection closes on drop regardless of outcome). Tests inject a fake
//! factory; real connectors wrap their driver.

use quarry_types::error::SqlFailure;
use quarry_types::schema::Schema;

/// Failure to acquire a row source.
#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    /// The driver itself could not be loaded or instantiated.
    #[error("driver unavailable: {0}")]
    Driver(String),
    /// The database could not be reached.
    #[error(transparent)]
    Connect(SqlFailure),
}

/// One live database connection, used synchronously and exclusively.
pub trait RowSource {
    /// Execute a statement for its side effects (init queries). Results
    /// are discarded.
    ///
    /// # Errors
    ///
    /// Returns the raw driver failure.
    fn execute(&mut self, statement: &str) -> Result<(), SqlFailure>;

    /// Run a probe query under a 1-row limit and derive the output
    /// schema from its result metadata.
    ///
    /// # Errors
    ///
    /// Returns the raw driver failure.
    fn probe_schema(&mut self, query: &str) -> Result<Schema, SqlFailure>;

    /// Run a bounding query returning exactly two scalars: the (min,
    /// max) of the split column.
    ///
    /// # Errors
    ///
    /// Returns the raw driver failure, including when the result shape
    /// is not two integral scalars.
    fn query_bounds(&mut self, query: &str) -> Result<(i64, i64), SqlFailure>;
}

/// Opens fresh, exclusively owned [`RowSource`] connections.
pub trait RowSourceFactory {
    type Source: RowSource;

    /// Open a new connection. The returned source is dropped (and the
    /// connection closed) when the caller's scope ends.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError`] when the driver is unavailable or the
    /// database cannot be reached.
    fn open(&self) -> Result<Self::Source, AcquireError>;
}
