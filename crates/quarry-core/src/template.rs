//! Import-query template rewriting around the `$CONDITIONS` placeholder.
//!
//! A user import query carries at most one `$CONDITIONS` token marking
//! where a generated range predicate goes. Schema discovery needs the
//! query *without* any predicate, so [`strip_conditions`] removes the
//! token together with its syntactic scaffolding; split execution needs a
//! concrete predicate, so [`bind_split`] substitutes one in.

use std::sync::LazyLock;

use regex::Regex;

use quarry_types::error::{SourceError, ValidationFailure};

/// Placeholder replaced with a generated range predicate per split.
/// The token itself is case-sensitive; the surrounding `AND`/`OR`/`WHERE`
/// are matched case-insensitively.
pub const CONDITIONS_TOKEN: &str = "$CONDITIONS";

// Rewrite order matters: the connective forms must be tried before the
// bare-WHERE form so `WHERE $CONDITIONS AND x` keeps its WHERE clause.
static CONDITIONS_THEN_CONNECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$CONDITIONS (?i:and|or)\s+").expect("valid conditions-connective regex")
});
static CONNECTIVE_THEN_CONDITIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+(?i:and|or) \$CONDITIONS").expect("valid connective-conditions regex")
});
static WHERE_CONDITIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+(?i:where) \$CONDITIONS").expect("valid where-conditions regex")
});

/// Whether a template contains the split token.
#[must_use]
pub fn contains_token(template: &str) -> bool {
    template.contains(CONDITIONS_TOKEN)
}

/// Remove the split token and its adjacent boolean connective, producing
/// a condition-free probe query for schema discovery.
///
/// Three ordered rewrites: token followed by a connective, connective
/// followed by the token, then a bare `WHERE` followed by the token
/// (which drops the whole `WHERE` clause). Idempotent.
#[must_use]
pub fn strip_conditions(template: &str) -> String {
    let query = CONDITIONS_THEN_CONNECTIVE.replace_all(template, "");
    let query = CONNECTIVE_THEN_CONDITIONS.replace_all(&query, "");
    WHERE_CONDITIONS.replace_all(&query, "").into_owned()
}

/// Substitute the split token with a concrete range predicate for one
/// worker's sub-query.
///
/// # Errors
///
/// Returns [`SourceError::Configuration`] when the template lacks the
/// token. Callers running a single unpartitioned split never bind a
/// predicate and take the [`strip_conditions`] path instead.
pub fn bind_split(template: &str, predicate: &str) -> Result<String, SourceError> {
    if !contains_token(template) {
        return Err(SourceError::Configuration(vec![ValidationFailure::new(
            format!("Import Query '{template}' must contain the string '{CONDITIONS_TOKEN}'."),
            Some("Add '$CONDITIONS' to the WHERE clause, or set numSplits to 1."),
        )]));
    }
    Ok(template.replace(CONDITIONS_TOKEN, predicate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_where_conditions() {
        assert_eq!(
            strip_conditions("SELECT * FROM t WHERE $CONDITIONS"),
            "SELECT * FROM t"
        );
    }

    #[test]
    fn strips_conditions_followed_by_connective() {
        assert_eq!(
            strip_conditions("SELECT * FROM t WHERE $CONDITIONS AND id > 3"),
            "SELECT * FROM t WHERE id > 3"
        );
        assert_eq!(
            strip_conditions("SELECT * FROM t WHERE $CONDITIONS OR id > 3"),
            "SELECT * FROM t WHERE id > 3"
        );
    }

    #[test]
    fn strips_connective_followed_by_conditions() {
        assert_eq!(
            strip_conditions("SELECT * FROM t WHERE id > 3 AND $CONDITIONS"),
            "SELECT * FROM t WHERE id > 3"
        );
    }

    #[test]
    fn strips_lowercase_connectives() {
        assert_eq!(
            strip_conditions("select * from t where $CONDITIONS and id > 3"),
            "select * from t where id > 3"
        );
        assert_eq!(
            strip_conditions("select * from t where $CONDITIONS"),
            "select * from t"
        );
    }

    #[test]
    fn strips_conditions_between_predicates() {
        assert_eq!(
            strip_conditions("SELECT * FROM t WHERE a = 1 AND $CONDITIONS AND b = 2"),
            "SELECT * FROM t WHERE a = 1 AND b = 2"
        );
    }

    #[test]
    fn leaves_templates_without_token_alone() {
        let query = "SELECT * FROM t WHERE id > 3";
        assert_eq!(strip_conditions(query), query);
    }

    #[test]
    fn strip_is_idempotent() {
        let once = strip_conditions("SELECT * FROM t WHERE $CONDITIONS AND id > 3");
        assert_eq!(strip_conditions(&once), once);
        let bare = strip_conditions("SELECT * FROM t WHERE $CONDITIONS");
        assert_eq!(strip_conditions(&bare), bare);
    }

    #[test]
    fn stripped_query_has_no_token_or_dangling_where() {
        for template in [
            "SELECT * FROM t WHERE $CONDITIONS",
            "SELECT * FROM t WHERE $CONDITIONS AND x = 1",
            "SELECT * FROM t WHERE x = 1 AND $CONDITIONS",
            "select * from t where $CONDITIONS or x = 1",
        ] {
            let stripped = strip_conditions(template);
            assert!(!stripped.contains(CONDITIONS_TOKEN), "token left in: {stripped}");
            assert!(
                !stripped.to_ascii_lowercase().trim_end().ends_with("where"),
                "dangling WHERE in: {stripped}"
            );
        }
    }

    #[test]
    fn bind_substitutes_predicate() {
        let bound = bind_split(
            "SELECT * FROM t WHERE $CONDITIONS",
            "( id >= 0 ) AND ( id < 25 )",
        )
        .unwrap();
        assert_eq!(bound, "SELECT * FROM t WHERE ( id >= 0 ) AND ( id < 25 )");
    }

    #[test]
    fn bind_without_token_is_a_configuration_error() {
        let err = bind_split("SELECT * FROM t", "id >= 0").unwrap_err();
        match err {
            SourceError::Configuration(failures) => {
                assert_eq!(failures.len(), 1);
                assert!(failures[0].message.contains("$CONDITIONS"));
            }
            other => panic!("expected configuration error, got: {other}"),
        }
    }
}
