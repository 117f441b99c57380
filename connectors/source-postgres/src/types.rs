//! `PostgreSQL` type-name resolution into the portable schema model.

use quarry_types::schema::{DataType, LogicalType};

/// Map a `PostgreSQL` type name to a portable physical type and optional
/// logical annotation.
///
/// Unrecognized types fall back to `String`; the textual rendering is
/// always available from the wire protocol.
#[must_use]
pub fn resolve(pg_type: &str) -> (DataType, Option<LogicalType>) {
    match pg_type {
        "int2" | "smallint" | "int4" | "int" | "integer" | "serial" => (DataType::Int, None),
        "int8" | "bigint" | "bigserial" | "oid" => (DataType::Long, None),
        "float4" | "real" => (DataType::Float, None),
        "float8" | "double precision" => (DataType::Double, None),
        "bool" | "boolean" => (DataType::Boolean, None),
        "bytea" => (DataType::Bytes, None),
        "date" => (DataType::Int, Some(LogicalType::Date)),
        "time" | "timetz" | "time without time zone" | "time with time zone" => {
            (DataType::Long, Some(LogicalType::TimeMicros))
        }
        "timestamp" | "timestamptz" | "timestamp without time zone"
        | "timestamp with time zone" => (DataType::Long, Some(LogicalType::TimestampMicros)),
        "numeric" | "decimal" => (DataType::String, Some(LogicalType::Decimal)),
        // text, varchar, uuid, json, jsonb, inet, interval, and anything
        // else the server can render as text.
        _ => (DataType::String, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_widths_resolve_distinctly() {
        assert_eq!(resolve("int4"), (DataType::Int, None));
        assert_eq!(resolve("smallint"), (DataType::Int, None));
        assert_eq!(resolve("int8"), (DataType::Long, None));
        assert_eq!(resolve("bigserial"), (DataType::Long, None));
    }

    #[test]
    fn temporal_types_carry_logical_annotations() {
        assert_eq!(resolve("date"), (DataType::Int, Some(LogicalType::Date)));
        assert_eq!(
            resolve("timestamptz"),
            (DataType::Long, Some(LogicalType::TimestampMicros))
        );
        assert_eq!(
            resolve("time"),
            (DataType::Long, Some(LogicalType::TimeMicros))
        );
    }

    #[test]
    fn numeric_resolves_to_decimal_string() {
        assert_eq!(
            resolve("numeric"),
            (DataType::String, Some(LogicalType::Decimal))
        );
    }

    #[test]
    fn unknown_types_fall_back_to_string() {
        assert_eq!(resolve("uuid"), (DataType::String, None));
        assert_eq!(resolve("jsonb"), (DataType::String, None));
        assert_eq!(resolve("tsvector"), (DataType::String, None));
    }
}
