//! Declared-vs-discovered schema reconciliation.
//!
//! A user may override the output schema (for example when a driver
//! misreports nullability). The override takes precedence for output but
//! must be structurally compatible with what the database actually
//! returns. This check is a pure function: no I/O, deterministic, failure
//! order follows the declared schema's field order.

use quarry_types::error::FieldMismatch;
use quarry_types::schema::Schema;

/// Compare a declared override schema against the discovered schema.
///
/// Every declared field must exist in the discovered schema with the same
/// base type and logical type; nullability is deliberately ignored on
/// both sides. Fields present only in the discovered schema are fine —
/// the declared schema may be a subset.
///
/// Returns every mismatch found, empty when the schemas are compatible.
#[must_use]
pub fn reconcile(discovered: &Schema, declared: Option<&Schema>) -> Vec<FieldMismatch> {
    let Some(declared) = declared else {
        return vec![FieldMismatch::new(
            "schema",
            "Schema should not be null or empty.",
        )];
    };

    let mut mismatches = Vec::new();
    for field in declared.fields() {
        let Some(actual) = discovered.field(&field.name) else {
            mismatches.push(FieldMismatch::new(
                field.name.clone(),
                format!("Schema field '{}' is not present in actual record", field.name),
            ));
            continue;
        };

        if field.data_type != actual.data_type || field.logical_type != actual.logical_type {
            mismatches.push(FieldMismatch::new(
                field.name.clone(),
                format!(
                    "Schema field '{}' has type '{}' but found '{}'.",
                    field.name,
                    field.display_type(),
                    actual.display_type()
                ),
            ));
        }
    }
    mismatches
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_types::schema::{DataType, Field, LogicalType};

    fn discovered() -> Schema {
        Schema::new(vec![
            Field::new("id", DataType::Long, false),
            Field::new("name", DataType::String, true),
            Field::with_logical_type("created_at", DataType::Long, LogicalType::TimestampMicros, true),
        ])
    }

    #[test]
    fn missing_declared_schema_is_exactly_one_failure() {
        let failures = reconcile(&discovered(), None);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].message, "Schema should not be null or empty.");
    }

    #[test]
    fn identical_schema_has_no_failures() {
        let schema = discovered();
        assert!(reconcile(&schema, Some(&schema)).is_empty());
    }

    #[test]
    fn declared_subset_is_accepted() {
        let declared = Schema::new(vec![Field::new("id", DataType::Long, false)]);
        assert!(reconcile(&discovered(), Some(&declared)).is_empty());
    }

    #[test]
    fn nullability_difference_is_not_a_mismatch() {
        let declared = Schema::new(vec![Field::new("id", DataType::Long, true)]);
        assert!(reconcile(&discovered(), Some(&declared)).is_empty());
    }

    #[test]
    fn unknown_declared_field_is_reported() {
        let declared = Schema::new(vec![Field::new("missing", DataType::Int, false)]);
        let failures = reconcile(&discovered(), Some(&declared));
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, "missing");
        assert!(failures[0].message.contains("not present in actual record"));
    }

    #[test]
    fn base_type_mismatch_names_both_types() {
        let declared = Schema::new(vec![Field::new("id", DataType::Int, false)]);
        let failures = reconcile(&discovered(), Some(&declared));
        assert_eq!(failures.len(), 1);
        assert!(failures[0].message.contains("'int'"));
        assert!(failures[0].message.contains("'long'"));
    }

    #[test]
    fn logical_type_mismatch_is_reported() {
        let declared = Schema::new(vec![Field::new("created_at", DataType::Long, true)]);
        let failures = reconcile(&discovered(), Some(&declared));
        assert_eq!(failures.len(), 1);
        assert!(failures[0].message.contains("'timestamp-micros'"));
    }

    #[test]
    fn every_mismatch_is_collected_in_declared_order() {
        let declared = Schema::new(vec![
            Field::new("ghost", DataType::Int, false),
            Field::new("name", DataType::Boolean, true),
        ]);
        let failures = reconcile(&discovered(), Some(&declared));
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].field, "ghost");
        assert_eq!(failures[1].field, "name");
    }
}
