//! Structured error model for database source operations.
//!
//! [`SqlFailure`] is the black-box driver error (message, numeric code,
//! SQL state). [`ClassifiedError`] is the classifier's output, never
//! retained beyond the failing operation. [`SourceError`] is the taxonomy
//! the orchestrator surfaces to the host.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who is on the hook for a classified failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Caused by user input (bad query, bad credentials, constraint
    /// violation).
    User,
    /// Caused by the database or infrastructure (out of resources,
    /// connection loss).
    System,
    /// No mapping known for the code/state.
    Unknown,
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::User => "USER",
            Self::System => "SYSTEM",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Category of a classified failure: the plugin-level parent category
/// with an optional dialect-specific subcategory naming the failure
/// class (for example the SQL-state class behind a Postgres error).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCategory {
    pub subcategory: Option<String>,
}

impl ErrorCategory {
    /// Parent category for every failure surfaced by a source plugin.
    pub const PARENT: &'static str = "Plugin";

    /// The bare plugin-level category, used when the dialect defines no
    /// subcategory for the failure.
    #[must_use]
    pub fn plugin() -> Self {
        Self { subcategory: None }
    }

    #[must_use]
    pub fn named(subcategory: impl Into<String>) -> Self {
        Self {
            subcategory: Some(subcategory.into()),
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subcategory {
            Some(sub) => write!(f, "{}-'{sub}'", Self::PARENT),
            None => f.write_str(Self::PARENT),
        }
    }
}

/// Pipeline phase in which a failure occurred, for error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Validation,
    Connect,
    InitQueries,
    SchemaProbe,
    BoundingQuery,
    SplitExecution,
}

impl Phase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Connect => "connect",
            Self::InitQueries => "init queries",
            Self::SchemaProbe => "schema probe",
            Self::BoundingQuery => "bounding query",
            Self::SplitExecution => "split execution",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw database failure as reported by the driver.
///
/// The numeric code is dialect-specific (MySQL uses it; Postgres reports
/// `0` and relies on the 5-character SQL state instead).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlFailure {
    pub message: String,
    pub code: i32,
    pub sql_state: Option<String>,
}

impl SqlFailure {
    #[must_use]
    pub fn new(message: impl Into<String>, code: i32, sql_state: Option<String>) -> Self {
        Self {
            message: message.into(),
            code,
            sql_state,
        }
    }
}

impl fmt::Display for SqlFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (error code: {}", self.message, self.code)?;
        match &self.sql_state {
            Some(state) => write!(f, ", sql state: {state})"),
            None => f.write_str(")"),
        }
    }
}

impl std::error::Error for SqlFailure {}

/// A failure classified into the host's error taxonomy.
///
/// Constructed at the failure site and immediately surfaced; the raw
/// driver failure is preserved as the cause, never discarded.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ClassifiedError {
    pub category: ErrorCategory,
    pub error_type: ErrorType,
    pub phase: Phase,
    /// Fully rendered, human-readable message (phase, driver message,
    /// code, state, optional documentation link).
    pub message: String,
    pub documentation_link: Option<String>,
    #[source]
    pub cause: Option<SqlFailure>,
}

/// Argument rejected before any database work was attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct InvalidArgument(pub String);

/// Operation attempted from an invalid internal state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct InvalidState(pub String);

/// One configuration validation failure, with an optional corrective
/// action for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    pub message: String,
    pub correction: Option<String>,
}

impl ValidationFailure {
    #[must_use]
    pub fn new(message: impl Into<String>, correction: Option<&str>) -> Self {
        Self {
            message: message.into(),
            correction: correction.map(str::to_string),
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(correction) = &self.correction {
            write!(f, " {correction}")?;
        }
        Ok(())
    }
}

/// One field-level mismatch between the declared and discovered schemas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMismatch {
    pub field: String,
    pub message: String,
}

impl FieldMismatch {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

fn join_lines(items: &[impl fmt::Display]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Error taxonomy surfaced by a connector source run.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Bad or missing required configuration, detected before any I/O.
    /// Carries every violation found, not just the first.
    #[error("configuration is invalid: {}", join_lines(.0))]
    Configuration(Vec<ValidationFailure>),

    /// The database could not be reached.
    #[error("could not connect to the database")]
    Connection(#[source] ClassifiedError),

    /// A probe, bounding, or split query failed at the database.
    #[error("query failed in the '{phase}' phase")]
    Query {
        phase: Phase,
        #[source]
        classified: ClassifiedError,
    },

    /// Declared schema is incompatible with the discovered schema.
    /// Carries every mismatching field.
    #[error("declared schema does not match the discovered schema: {}", join_lines(.0))]
    SchemaMismatch(Vec<FieldMismatch>),

    /// The database driver could not be loaded or instantiated.
    #[error("database driver unavailable: {0}")]
    DriverUnavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn sql_failure_display_includes_code_and_state() {
        let failure = SqlFailure::new("duplicate key", 0, Some("23505".into()));
        assert_eq!(
            failure.to_string(),
            "duplicate key (error code: 0, sql state: 23505)"
        );
        let no_state = SqlFailure::new("boom", 1045, None);
        assert_eq!(no_state.to_string(), "boom (error code: 1045)");
    }

    #[test]
    fn configuration_error_lists_every_failure() {
        let err = SourceError::Configuration(vec![
            ValidationFailure::new("Import Query must be specified.", None),
            ValidationFailure::new("Bounding Query must be specified.", None),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("Import Query"));
        assert!(msg.contains("Bounding Query"));
    }

    #[test]
    fn query_error_preserves_cause_chain() {
        let cause = SqlFailure::new("relation does not exist", 0, Some("42P01".into()));
        let err = SourceError::Query {
            phase: Phase::SchemaProbe,
            classified: ClassifiedError {
                category: ErrorCategory::plugin(),
                error_type: ErrorType::User,
                phase: Phase::SchemaProbe,
                message: "rendered".into(),
                documentation_link: None,
                cause: Some(cause.clone()),
            },
        };
        let classified = err.source().expect("classified cause");
        let raw = classified.source().expect("raw sql cause");
        assert_eq!(raw.to_string(), cause.to_string());
    }

    #[test]
    fn category_display_includes_subcategory_when_named() {
        assert_eq!(ErrorCategory::plugin().to_string(), "Plugin");
        assert_eq!(
            ErrorCategory::named("Warning").to_string(),
            "Plugin-'Warning'"
        );
    }

    #[test]
    fn validation_failure_appends_correction() {
        let failure = ValidationFailure::new(
            "Invalid value for numSplits '0'.",
            Some("Set numSplits to at least 1."),
        );
        assert_eq!(
            failure.to_string(),
            "Invalid value for numSplits '0'. Set numSplits to at least 1."
        );
    }
}
