use proptest::prelude::*;

use quarry_core::template::{strip_conditions, CONDITIONS_TOKEN};

/// Build an import query with the token placed per the strategy inputs.
fn query_with_token(connective: &str, token_first: bool, extra_predicate: &str) -> String {
    if extra_predicate.is_empty() {
        format!("SELECT * FROM t WHERE {CONDITIONS_TOKEN}")
    } else if token_first {
        format!("SELECT * FROM t WHERE {CONDITIONS_TOKEN} {connective} {extra_predicate}")
    } else {
        format!("SELECT * FROM t WHERE {extra_predicate} {connective} {CONDITIONS_TOKEN}")
    }
}

proptest! {
    #[test]
    fn stripped_queries_never_retain_the_token(
        connective in prop_oneof![
            Just("AND"), Just("and"), Just("And"),
            Just("OR"), Just("or"), Just("Or"),
        ],
        token_first in any::<bool>(),
        predicate in prop_oneof![Just(""), Just("id > 3"), Just("name = 'x'")],
    ) {
        let query = query_with_token(connective, token_first, predicate);
        let stripped = strip_conditions(&query);

        prop_assert!(!stripped.contains(CONDITIONS_TOKEN), "token left in: {stripped}");
        let lowered = stripped.to_ascii_lowercase();
        prop_assert!(
            !lowered.trim_end().ends_with("where"),
            "dangling WHERE in: {stripped}"
        );
        // The surviving predicate must still be there.
        if !predicate.is_empty() {
            prop_assert!(stripped.contains(predicate), "predicate lost from: {stripped}");
        }
    }

    #[test]
    fn strip_is_idempotent(
        connective in prop_oneof![Just("AND"), Just("or")],
        token_first in any::<bool>(),
        predicate in prop_oneof![Just(""), Just("id > 3")],
    ) {
        let query = query_with_token(connective, token_first, predicate);
        let once = strip_conditions(&query);
        prop_assert_eq!(strip_conditions(&once), once.clone());
    }

    #[test]
    fn queries_without_the_token_pass_through_unchanged(
        table in "[a-z]{1,12}",
        predicate in prop_oneof![Just(""), Just(" WHERE id > 3")],
    ) {
        let query = format!("SELECT * FROM {table}{predicate}");
        prop_assert_eq!(strip_conditions(&query), query.clone());
    }
}
