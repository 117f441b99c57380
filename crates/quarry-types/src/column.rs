//! Column-type descriptors for value marshaling.
//!
//! A [`ColumnType`] pairs an output field name with the JDBC-compatible
//! type code the execution collaborator uses to drive value extraction on
//! read and parameter binding on write. One per output field, ordering
//! matches field order.

use serde::{Deserialize, Serialize};

use crate::schema::{DataType, Field, LogicalType, Schema};

/// JDBC type-code constants (the `java.sql.Types` values the execution
/// collaborator understands).
pub mod type_codes {
    pub const BIGINT: i32 = -5;
    pub const VARBINARY: i32 = -3;
    pub const NUMERIC: i32 = 2;
    pub const INTEGER: i32 = 4;
    pub const REAL: i32 = 7;
    pub const DOUBLE: i32 = 8;
    pub const VARCHAR: i32 = 12;
    pub const BOOLEAN: i32 = 16;
    pub const DATE: i32 = 91;
    pub const TIME: i32 = 92;
    pub const TIMESTAMP: i32 = 93;
}

/// (name, JDBC type code) pair for one output field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnType {
    pub name: String,
    pub type_code: i32,
}

impl ColumnType {
    #[must_use]
    pub fn new(name: impl Into<String>, type_code: i32) -> Self {
        Self {
            name: name.into(),
            type_code,
        }
    }

    /// Derive the marshaling type code for a schema field.
    #[must_use]
    pub fn for_field(field: &Field) -> Self {
        let code = match field.logical_type {
            Some(LogicalType::Date) => type_codes::DATE,
            Some(LogicalType::TimeMicros) => type_codes::TIME,
            Some(LogicalType::TimestampMicros) => type_codes::TIMESTAMP,
            Some(LogicalType::Decimal) => type_codes::NUMERIC,
            None => match field.data_type {
                DataType::Boolean => type_codes::BOOLEAN,
                DataType::Int => type_codes::INTEGER,
                DataType::Long => type_codes::BIGINT,
                DataType::Float => type_codes::REAL,
                DataType::Double => type_codes::DOUBLE,
                DataType::String => type_codes::VARCHAR,
                DataType::Bytes => type_codes::VARBINARY,
            },
        };
        Self::new(field.name.clone(), code)
    }

    /// Whether the code denotes an integral column usable for range splits.
    #[must_use]
    pub fn is_integral(&self) -> bool {
        matches!(self.type_code, type_codes::INTEGER | type_codes::BIGINT)
    }
}

/// Column types for every field of a schema, in field order.
#[must_use]
pub fn column_types(schema: &Schema) -> Vec<ColumnType> {
    schema.fields().iter().map(ColumnType::for_field).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_type_wins_over_physical() {
        let field = Field::with_logical_type("ts", DataType::Long, LogicalType::TimestampMicros, true);
        assert_eq!(ColumnType::for_field(&field).type_code, type_codes::TIMESTAMP);
    }

    #[test]
    fn physical_types_map_to_jdbc_codes() {
        let field = Field::new("id", DataType::Long, false);
        let col = ColumnType::for_field(&field);
        assert_eq!(col.type_code, type_codes::BIGINT);
        assert!(col.is_integral());

        let name = ColumnType::for_field(&Field::new("name", DataType::String, true));
        assert_eq!(name.type_code, type_codes::VARCHAR);
        assert!(!name.is_integral());
    }

    #[test]
    fn ordering_matches_schema_fields() {
        let schema = Schema::new(vec![
            Field::new("a", DataType::Int, false),
            Field::new("b", DataType::Boolean, true),
        ]);
        let cols = column_types(&schema);
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].name, "a");
        assert_eq!(cols[1].name, "b");
    }
}
