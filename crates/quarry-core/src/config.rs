//! Source run configuration and its pre-I/O validation.
//!
//! The host resolves macros before handing values over; a field whose
//! macro is still unresolved arrives as [`ConfigField::Deferred`] and is
//! skipped by validation on purpose — the tri-state makes that explicit
//! instead of hiding it behind null checks.

use quarry_types::error::{InvalidArgument, SourceError, ValidationFailure};
use quarry_types::schema::Schema;

use crate::collab::FailureCollector;
use crate::template;

/// A configuration field that is resolved, macro-deferred, or absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigField<T> {
    /// Concrete value supplied by the user (macros already substituted).
    Resolved(T),
    /// The field references a macro the host has not resolved yet; skip
    /// database-dependent validation until it is.
    Deferred,
    /// The user left the field unset.
    Absent,
}

impl<T> ConfigField<T> {
    /// The resolved value, if any.
    pub fn resolved(&self) -> Option<&T> {
        match self {
            Self::Resolved(value) => Some(value),
            Self::Deferred | Self::Absent => None,
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred)
    }
}

impl<T> From<Option<T>> for ConfigField<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Self::Resolved)
    }
}

/// Immutable run configuration for one source, owned by the orchestrator
/// for the duration of a pipeline run.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// SELECT template to import data; must contain `$CONDITIONS` unless
    /// `num_splits` is 1.
    pub import_query: ConfigField<String>,
    /// Query returning the (min, max) of `split_by`; required unless
    /// `num_splits` is 1.
    pub bounding_query: ConfigField<String>,
    /// Column used for range partitioning; required unless `num_splits`
    /// is 1.
    pub split_by: ConfigField<String>,
    /// Number of splits to generate; unset lets the execution engine
    /// choose, 1 disables partitioning.
    pub num_splits: ConfigField<u32>,
    /// Optional JSON override for the output schema.
    pub schema: Option<String>,
    /// Statements executed in order on every new connection, before any
    /// query.
    pub init_queries: Vec<String>,
    /// Per-split fetch-size hint for the execution collaborator.
    pub fetch_size: Option<u32>,
}

impl SourceConfig {
    /// Whether the run is explicitly unpartitioned.
    #[must_use]
    pub fn has_one_split(&self) -> bool {
        self.num_splits.resolved() == Some(&1)
    }

    /// Parse the declared override schema, if configured.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Configuration`] when the JSON is malformed.
    pub fn declared_schema(&self) -> Result<Option<Schema>, SourceError> {
        let Some(json) = self.schema.as_deref().filter(|s| !s.trim().is_empty()) else {
            return Ok(None);
        };
        Schema::parse_json(json).map(Some).map_err(|e| {
            let invalid = InvalidArgument(format!("Unable to parse schema. Reason: {e}"));
            SourceError::Configuration(vec![ValidationFailure::new(invalid.0, None)])
        })
    }

    /// Validate the configuration, reporting every violation to the
    /// collector without short-circuiting. No database access happens
    /// here; deferred fields are skipped.
    pub fn validate(&self, collector: &mut dyn FailureCollector) {
        let mut one_split = false;
        if let Some(&n) = self.num_splits.resolved() {
            if n < 1 {
                collector.add_failure(
                    &format!("Invalid value for numSplits '{n}'. Must be at least 1."),
                    Some("Set numSplits to at least 1."),
                );
            }
            one_split = n == 1;
        }

        match &self.import_query {
            ConfigField::Deferred => {}
            ConfigField::Absent => {
                collector.add_failure("Import Query must be specified.", None);
            }
            ConfigField::Resolved(query) if query.trim().is_empty() => {
                collector.add_failure("Import Query must be specified.", None);
            }
            ConfigField::Resolved(query) => {
                if !one_split
                    && !self.num_splits.is_deferred()
                    && !template::contains_token(query)
                {
                    collector.add_failure(
                        "Invalid Import Query.",
                        Some(&format!(
                            "Import Query '{query}' must contain the string '{}'.",
                            template::CONDITIONS_TOKEN
                        )),
                    );
                }
            }
        }

        if !one_split && !self.num_splits.is_deferred() && !self.split_by.is_deferred() {
            let missing = self
                .split_by
                .resolved()
                .map_or(true, |column| column.trim().is_empty());
            if missing {
                collector.add_failure(
                    "Split-By Field Name must be specified if Number of Splits is not set to 1.",
                    None,
                );
            }
        }

        if !one_split && !self.num_splits.is_deferred() && !self.bounding_query.is_deferred() {
            let missing = self
                .bounding_query
                .resolved()
                .map_or(true, |query| query.trim().is_empty());
            if missing {
                collector.add_failure(
                    "Bounding Query must be specified if Number of Splits is not set to 1.",
                    None,
                );
            }
        }

        if self.fetch_size == Some(0) {
            collector.add_failure("Fetch size must be a positive integer.", None);
        }
    }
}
