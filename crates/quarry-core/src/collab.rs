//! Host collaborator seams.
//!
//! The orchestrator talks to its host pipeline framework through these
//! traits: a failure collector that accumulates validation errors without
//! short-circuiting, a lineage recorder, and the execution sink that
//! receives the final run descriptor. Hosts implement them; tests inject
//! recording fakes.

use quarry_types::column::ColumnType;
use quarry_types::error::{SourceError, ValidationFailure};
use quarry_types::schema::Schema;

/// Accumulates validation failures without short-circuiting.
pub trait FailureCollector {
    fn add_failure(&mut self, message: &str, correction: Option<&str>);
}

/// Vec-backed [`FailureCollector`] used by the orchestrator and tests.
#[derive(Debug, Default)]
pub struct CollectedFailures {
    failures: Vec<ValidationFailure>,
}

impl CollectedFailures {
    #[must_use]
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Convert the collected failures into a single configuration error,
    /// or `Ok(())` when nothing was collected.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Configuration`] carrying every failure.
    pub fn into_result(self) -> Result<(), SourceError> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(SourceError::Configuration(self.failures))
        }
    }
}

impl FailureCollector for CollectedFailures {
    fn add_failure(&mut self, message: &str, correction: Option<&str>) {
        self.failures.push(ValidationFailure::new(message, correction));
    }
}

/// Records which fields a run reads, for the host's lineage store.
pub trait LineageRecorder {
    fn record_read(&mut self, operation: &str, description: &str, fields: &[String]);
}

/// Per-split query assignment handed to the execution collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitAssignment {
    /// Fully planned: one self-contained query per worker, in split
    /// order.
    Queries(Vec<String>),
    /// Split count was left unset; the executor chooses the partition
    /// count from the raw bounds and binds predicates into the template
    /// itself.
    Deferred {
        template: String,
        split_by: String,
        min: i64,
        max: i64,
    },
}

impl SplitAssignment {
    /// Number of already-planned queries (zero while deferred).
    #[must_use]
    pub fn query_count(&self) -> usize {
        match self {
            Self::Queries(queries) => queries.len(),
            Self::Deferred { .. } => 0,
        }
    }
}

/// Everything the execution collaborator needs to run the read: the
/// effective output schema, marshaling column types, the split queries,
/// and connection session parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDescriptor {
    pub schema: Schema,
    pub column_types: Vec<ColumnType>,
    pub splits: SplitAssignment,
    pub init_queries: Vec<String>,
    pub fetch_size: Option<u32>,
}

/// Receives the run descriptor once planning succeeds.
pub trait ExecutionSink {
    fn submit(&mut self, descriptor: RunDescriptor);
}
