//! Source run orchestration.
//!
//! [`ConnectorSource`] drives one pipeline run through its phases:
//! exhaustive configuration validation, schema discovery over a scoped
//! connection, declared-schema reconciliation, split planning, and
//! finally the run-descriptor handoff to the execution collaborator.
//! Failure is terminal from any phase; every SQL failure routes through
//! the dialect classifier before surfacing, with the raw driver error
//! preserved as the cause.

use tracing::{debug, info};

use quarry_types::column::{self, ColumnType, type_codes};
use quarry_types::error::{Phase, SourceError, SqlFailure, ValidationFailure};
use quarry_types::schema::Schema;

use crate::classify::{Classifier, Dialect};
use crate::collab::{
    CollectedFailures, ExecutionSink, FailureCollector, LineageRecorder, RunDescriptor,
    SplitAssignment,
};
use crate::config::SourceConfig;
use crate::planner::{self, SplitPlan};
use crate::reconcile;
use crate::row_source::{AcquireError, RowSource, RowSourceFactory};
use crate::template;

/// Orchestrates one batch read over a relational database.
pub struct ConnectorSource<F> {
    config: SourceConfig,
    classifier: Classifier,
    factory: F,
}

impl<F: RowSourceFactory> ConnectorSource<F> {
    #[must_use]
    pub fn new(config: SourceConfig, dialect: Dialect, factory: F) -> Self {
        Self {
            config,
            classifier: Classifier::for_dialect(dialect),
            factory,
        }
    }

    #[must_use]
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Configure-time validation for the host's stage configurer: report
    /// every configuration violation to the collector, without touching
    /// the database. Macro-deferred fields are skipped.
    pub fn configure(&self, collector: &mut dyn FailureCollector) {
        self.config.validate(collector);
        if let Err(SourceError::Configuration(failures)) = self.config.declared_schema() {
            for failure in failures {
                collector.add_failure(&failure.message, failure.correction.as_deref());
            }
        }
    }

    /// Plan the run: discover the schema, reconcile it against any
    /// declared override, compute the splits, and hand the run
    /// descriptor to the execution sink.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on the first failing phase; configuration
    /// and schema errors carry every violation found, not just the
    /// first.
    pub fn prepare_run(
        &self,
        sink: &mut dyn ExecutionSink,
        lineage: &mut dyn LineageRecorder,
    ) -> Result<(), SourceError> {
        let mut collector = CollectedFailures::default();
        self.config.validate(&mut collector);
        collector.into_result()?;
        let declared = self.config.declared_schema()?;

        let import_query = self.required(&self.config.import_query, "Import Query")?;
        debug!(
            import_query,
            init_queries = self.config.init_queries.len(),
            "starting schema probe"
        );

        let discovered = self.probe_schema(import_query)?;
        debug!(fields = discovered.len(), "schema discovered");

        let effective = match declared {
            Some(declared) => {
                let mismatches = reconcile::reconcile(&discovered, Some(&declared));
                if !mismatches.is_empty() {
                    return Err(SourceError::SchemaMismatch(mismatches));
                }
                declared
            }
            None => discovered,
        };

        let splits = self.plan_splits(import_query, &effective)?;
        info!(
            splits = splits.query_count(),
            fields = effective.len(),
            "source run planned"
        );

        lineage.record_read(
            "Read",
            "Read from database source",
            &effective.field_names(),
        );
        let column_types = column::column_types(&effective);
        sink.submit(RunDescriptor {
            schema: effective,
            column_types,
            splits,
            init_queries: self.config.init_queries.clone(),
            fetch_size: self.config.fetch_size,
        });
        Ok(())
    }

    /// Run the condition-stripped probe query over a scoped connection
    /// and extract the discovered schema from its result metadata.
    fn probe_schema(&self, import_query: &str) -> Result<Schema, SourceError> {
        let probe_query = template::strip_conditions(import_query);
        let mut source = self.acquire()?;
        self.run_init_queries(&mut source)?;
        source
            .probe_schema(&probe_query)
            .map_err(|failure| self.query_error(Phase::SchemaProbe, failure))
        // source drops here; the connection closes regardless of outcome
    }

    fn plan_splits(
        &self,
        import_query: &str,
        schema: &Schema,
    ) -> Result<SplitAssignment, SourceError> {
        if self.config.has_one_split() {
            // Single split: no bounding query, no token requirement.
            return Ok(SplitAssignment::Queries(vec![template::strip_conditions(
                import_query,
            )]));
        }

        let split_by = self.required(&self.config.split_by, "Split-By Field Name")?;
        let bounding_query = self.required(&self.config.bounding_query, "Bounding Query")?;

        // A split column outside the select list is assumed integral;
        // the bounding query fails at the database otherwise.
        let split_column = schema
            .field(split_by)
            .map(ColumnType::for_field)
            .unwrap_or_else(|| ColumnType::new(split_by, type_codes::BIGINT));

        let (min, max) = {
            let mut source = self.acquire()?;
            self.run_init_queries(&mut source)?;
            source
                .query_bounds(bounding_query)
                .map_err(|failure| self.query_error(Phase::BoundingQuery, failure))?
        };
        debug!(min, max, split_by, "bounding query complete");

        let requested = self.config.num_splits.resolved().copied();
        match planner::plan(min, max, requested, &split_column)? {
            SplitPlan::Single => Ok(SplitAssignment::Queries(vec![template::strip_conditions(
                import_query,
            )])),
            SplitPlan::Deferred { min, max } => Ok(SplitAssignment::Deferred {
                template: import_query.to_string(),
                split_by: split_by.to_string(),
                min,
                max,
            }),
            SplitPlan::Ranges(ranges) => {
                let queries = ranges
                    .iter()
                    .map(|range| template::bind_split(import_query, &range.predicate(split_by)))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(SplitAssignment::Queries(queries))
            }
        }
    }

    fn run_init_queries(&self, source: &mut F::Source) -> Result<(), SourceError> {
        use crate::row_source::RowSource as _;
        for statement in &self.config.init_queries {
            debug!(statement, "executing init query");
            source
                .execute(statement)
                .map_err(|failure| self.query_error(Phase::InitQueries, failure))?;
        }
        Ok(())
    }

    fn acquire(&self) -> Result<F::Source, SourceError> {
        self.factory.open().map_err(|e| match e {
            AcquireError::Driver(message) => SourceError::DriverUnavailable(message),
            AcquireError::Connect(failure) => SourceError::Connection(
                self.classifier.classify_failure(Phase::Connect, &failure),
            ),
        })
    }

    fn query_error(&self, phase: Phase, failure: SqlFailure) -> SourceError {
        SourceError::Query {
            phase,
            classified: self.classifier.classify_failure(phase, &failure),
        }
    }

    fn required<'a>(
        &self,
        field: &'a crate::config::ConfigField<String>,
        name: &str,
    ) -> Result<&'a str, SourceError> {
        field.resolved().map(String::as_str).ok_or_else(|| {
            SourceError::Configuration(vec![ValidationFailure::new(
                format!("{name} must be resolved before run planning."),
                None,
            )])
        })
    }
}
