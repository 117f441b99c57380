//! Database error classification.
//!
//! Each dialect maps driver errors into {user, system, unknown}:
//! Postgres-family dialects key on the 2-character SQL-state class prefix,
//! MySQL-family dialects on numeric error-code ranges. Postgres-family
//! dialects additionally name a failure category per SQL-state class;
//! everything else carries the bare plugin category. A [`Classifier`]
//! composes the base rule tables with a per-dialect documentation link,
//! so the CloudSQL variants are just link overrides over the base tables
//! rather than a subclass hierarchy.
//!
//! Classification never fails: an unmapped code degrades to
//! [`ErrorType::Unknown`].

use std::error::Error as StdError;

use quarry_types::error::{
    ClassifiedError, ErrorCategory, ErrorType, InvalidArgument, InvalidState, Phase, SqlFailure,
};

/// Database dialect a source connector talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Dialect {
    Postgres,
    Mysql,
    Mariadb,
    Oracle,
    CloudSqlPostgres,
    CloudSqlMysql,
}

// https://www.postgresql.org/docs/current/errcodes-appendix.html
const POSTGRES_STATE_CLASSES: &[(&str, ErrorType)] = &[
    ("01", ErrorType::User),
    ("02", ErrorType::User),
    ("08", ErrorType::System),
    ("0A", ErrorType::User),
    ("22", ErrorType::User),
    ("23", ErrorType::User),
    ("28", ErrorType::User),
    ("40", ErrorType::System),
    ("42", ErrorType::User),
    ("53", ErrorType::System),
    ("54", ErrorType::System),
    ("55", ErrorType::User),
    ("57", ErrorType::System),
    ("58", ErrorType::System),
    ("P0", ErrorType::System),
    ("XX", ErrorType::System),
];

// Subcategory per SQL-state class; states outside the table fall back
// to the bare plugin category.
const POSTGRES_STATE_CATEGORIES: &[(&str, &str)] = &[
    ("01", "Warning"),
    ("02", "No Data"),
    ("08", "Postgres Server Connection Exception"),
    ("0A", "Postgres Server Feature Not Supported"),
    ("22", "Postgres Server Data Exception"),
    ("23", "Postgres Integrity Constraint Violation"),
    ("28", "Postgres Invalid Authorization Specification"),
    ("40", "Transaction Rollback"),
    ("42", "Syntax Error or Access Rule Violation"),
    ("53", "Postgres Server Insufficient Resources"),
    ("54", "Postgres Program Limit Exceeded"),
    ("55", "Object Not in Prerequisite State"),
    ("57", "Operator Intervention"),
    ("58", "Postgres Server System Error"),
    ("P0", "PL/pgSQL Error"),
    ("XX", "Postgres Server Internal Error"),
];

// https://dev.mysql.com/doc/refman/9.0/en/error-message-elements.html#error-code-ranges
// 1000-5999: server errors surfaced to clients; 10000-51999: server-internal
// and user-defined custom errors.
const MYSQL_CODE_RANGES: &[(i32, i32, ErrorType)] = &[
    (1_000, 5_999, ErrorType::User),
    (10_000, 51_999, ErrorType::System),
];

const POSTGRES_DOC_URL: &str = "https://www.postgresql.org/docs/current/errcodes-appendix.html";
const MYSQL_DOC_URL: &str = "https://dev.mysql.com/doc/mysql-errors/en/";
const MARIADB_DOC_URL: &str = "https://mariadb.com/kb/en/mariadb-error-code-reference/";
const CLOUDSQL_POSTGRES_DOC_URL: &str = "https://cloud.google.com/sql/docs/postgres/error-messages";
const CLOUDSQL_MYSQL_DOC_URL: &str = "https://cloud.google.com/sql/docs/mysql/error-messages";

/// How a dialect keys its classification table.
#[derive(Debug, Clone, Copy)]
enum Rules {
    /// Lookup by the first two characters of the SQL state.
    SqlStatePrefix(&'static [(&'static str, ErrorType)]),
    /// Lookup by inclusive numeric error-code ranges.
    CodeRanges(&'static [(i32, i32, ErrorType)]),
    /// No table: everything is unknown.
    Unmapped,
}

/// Per-dialect error classifier: a base rule table plus an optional
/// external documentation link appended to rendered messages.
#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    dialect: Dialect,
    rules: Rules,
    /// SQL-state class to category subcategory, for dialects that name
    /// their failure classes.
    categories: &'static [(&'static str, &'static str)],
    documentation_link: Option<&'static str>,
}

impl Classifier {
    /// Build the classifier for a dialect.
    ///
    /// The CloudSQL variants reuse their base dialect's rule table and
    /// override only the documentation link.
    #[must_use]
    pub fn for_dialect(dialect: Dialect) -> Self {
        let (rules, categories, documentation_link) = match dialect {
            Dialect::Postgres => (
                Rules::SqlStatePrefix(POSTGRES_STATE_CLASSES),
                POSTGRES_STATE_CATEGORIES,
                Some(POSTGRES_DOC_URL),
            ),
            Dialect::CloudSqlPostgres => (
                Rules::SqlStatePrefix(POSTGRES_STATE_CLASSES),
                POSTGRES_STATE_CATEGORIES,
                Some(CLOUDSQL_POSTGRES_DOC_URL),
            ),
            Dialect::Mysql => (
                Rules::CodeRanges(MYSQL_CODE_RANGES),
                &[][..],
                Some(MYSQL_DOC_URL),
            ),
            Dialect::Mariadb => (
                Rules::CodeRanges(MYSQL_CODE_RANGES),
                &[][..],
                Some(MARIADB_DOC_URL),
            ),
            Dialect::CloudSqlMysql => (
                Rules::CodeRanges(MYSQL_CODE_RANGES),
                &[][..],
                Some(CLOUDSQL_MYSQL_DOC_URL),
            ),
            Dialect::Oracle => (Rules::Unmapped, &[][..], None),
        };
        Self {
            dialect,
            rules,
            categories,
            documentation_link,
        }
    }

    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Static external reference appended to rendered error messages.
    #[must_use]
    pub fn documentation_link(&self) -> Option<&'static str> {
        self.documentation_link
    }

    /// Map a SQL state to the failure category.
    ///
    /// Dialects without a category table, and states outside it, get the
    /// bare plugin-level category.
    #[must_use]
    pub fn category(&self, sql_state: Option<&str>) -> ErrorCategory {
        let Some(prefix) = sql_state.and_then(|s| s.get(..2)) else {
            return ErrorCategory::plugin();
        };
        self.categories
            .iter()
            .find(|(class, _)| *class == prefix)
            .map_or_else(ErrorCategory::plugin, |(_, name)| {
                ErrorCategory::named(*name)
            })
    }

    /// Map a driver error code and SQL state to an error type.
    ///
    /// Never fails; anything outside the dialect's table is
    /// [`ErrorType::Unknown`].
    #[must_use]
    pub fn classify(&self, error_code: i32, sql_state: Option<&str>) -> ErrorType {
        match self.rules {
            Rules::SqlStatePrefix(table) => {
                let Some(prefix) = sql_state.and_then(|s| s.get(..2)) else {
                    return ErrorType::Unknown;
                };
                table
                    .iter()
                    .find(|(class, _)| *class == prefix)
                    .map_or(ErrorType::Unknown, |(_, ty)| *ty)
            }
            Rules::CodeRanges(ranges) => ranges
                .iter()
                .find(|(lo, hi, _)| (*lo..=*hi).contains(&error_code))
                .map_or(ErrorType::Unknown, |(_, _, ty)| *ty),
            Rules::Unmapped => ErrorType::Unknown,
        }
    }

    /// Classify a raw driver failure, producing the fully rendered error.
    #[must_use]
    pub fn classify_failure(&self, phase: Phase, failure: &SqlFailure) -> ClassifiedError {
        let error_type = self.classify(failure.code, failure.sql_state.as_deref());
        tracing::debug!(
            phase = %phase,
            code = failure.code,
            sql_state = failure.sql_state.as_deref().unwrap_or("-"),
            %error_type,
            "classified database failure"
        );
        ClassifiedError {
            category: self.category(failure.sql_state.as_deref()),
            error_type,
            phase,
            message: render_message(
                phase,
                &failure.message,
                failure.code,
                failure.sql_state.as_deref(),
                self.documentation_link,
            ),
            documentation_link: self.documentation_link.map(str::to_string),
            cause: Some(failure.clone()),
        }
    }

    /// Walk an error's causal chain and classify the first recognized
    /// cause.
    ///
    /// Returns `None` when the chain already contains a
    /// [`ClassifiedError`] (classifying again would double-wrap) or when
    /// nothing in the chain is recognized. Recognition order per element:
    /// already-classified wrapper, driver failure, invalid argument,
    /// invalid state.
    #[must_use]
    pub fn classify_chain(
        &self,
        phase: Phase,
        error: &(dyn StdError + 'static),
    ) -> Option<ClassifiedError> {
        let mut current = Some(error);
        while let Some(cause) = current {
            if cause.downcast_ref::<ClassifiedError>().is_some() {
                return None;
            }
            if let Some(failure) = cause.downcast_ref::<SqlFailure>() {
                return Some(self.classify_failure(phase, failure));
            }
            if let Some(invalid) = cause.downcast_ref::<InvalidArgument>() {
                return Some(ClassifiedError {
                    category: ErrorCategory::plugin(),
                    error_type: ErrorType::User,
                    phase,
                    message: render_plain_message(phase, &invalid.0),
                    documentation_link: None,
                    cause: None,
                });
            }
            if let Some(invalid) = cause.downcast_ref::<InvalidState>() {
                return Some(ClassifiedError {
                    category: ErrorCategory::plugin(),
                    error_type: ErrorType::System,
                    phase,
                    message: render_plain_message(phase, &invalid.0),
                    documentation_link: None,
                    cause: None,
                });
            }
            current = cause.source();
        }
        None
    }
}

/// Render a driver failure into one human-readable message: phase, raw
/// driver message, numeric code, SQL state, and a trailing documentation
/// sentence when the dialect defines a link. Pure and independent of
/// classification.
#[must_use]
pub fn render_message(
    phase: Phase,
    driver_message: &str,
    error_code: i32,
    sql_state: Option<&str>,
    documentation_link: Option<&str>,
) -> String {
    let mut message = format!(
        "Error occurred in the phase: '{phase}'. Error message: '{driver_message}'. \
         Error code: '{error_code}'. sqlState: '{state}'",
        state = sql_state.unwrap_or("")
    );
    if let Some(link) = documentation_link {
        if !message.ends_with('.') {
            message.push('.');
        }
        message.push_str(&format!(" For more details, see {link}"));
    }
    message
}

fn render_plain_message(phase: Phase, error_message: &str) -> String {
    format!("Error occurred in the phase: '{phase}'. Error message: {error_message}")
}
