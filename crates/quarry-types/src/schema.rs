//! Output schema model for database sources.
//!
//! A [`Schema`] is an ordered sequence of [`Field`]s describing the record
//! shape a source emits. A field carries a physical [`DataType`] and an
//! optional [`LogicalType`] refining its interpretation (a `Long` column
//! holding timestamp micros, an `Int` column holding a date, and so on).
//! Nullability is a flag on the field, not a wrapper type, so structural
//! comparison can ignore it explicitly.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Physical data type of an output field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Boolean,
    Int,
    Long,
    Float,
    Double,
    String,
    Bytes,
}

impl DataType {
    /// Returns the canonical string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::String => "string",
            Self::Bytes => "bytes",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical refinement of a physical [`DataType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "kebab-case")]
pub enum LogicalType {
    Date,
    TimeMicros,
    TimestampMicros,
    Decimal,
}

impl LogicalType {
    /// Returns the canonical string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::TimeMicros => "time-micros",
            Self::TimestampMicros => "timestamp-micros",
            Self::Decimal => "decimal",
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named field of an output schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name as reported by the query's result metadata.
    pub name: String,
    /// Physical type.
    #[serde(rename = "type")]
    pub data_type: DataType,
    /// Logical refinement, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_type: Option<LogicalType>,
    /// Whether the field permits null values.
    #[serde(default)]
    pub nullable: bool,
}

impl Field {
    /// Build a field without a logical type.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            logical_type: None,
            nullable,
        }
    }

    /// Build a field carrying a logical type.
    #[must_use]
    pub fn with_logical_type(
        name: impl Into<String>,
        data_type: DataType,
        logical_type: LogicalType,
        nullable: bool,
    ) -> Self {
        Self {
            name: name.into(),
            data_type,
            logical_type: Some(logical_type),
            nullable,
        }
    }

    /// Human-readable type name used in mismatch reports.
    ///
    /// The logical type wins when present (`timestamp-micros` reads better
    /// than `long` for a timestamp column).
    #[must_use]
    pub fn display_type(&self) -> &'static str {
        match self.logical_type {
            Some(logical) => logical.as_str(),
            None => self.data_type.as_str(),
        }
    }
}

/// Ordered record schema. Created once per run, read-only afterward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    #[must_use]
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Parse a schema from its JSON representation (an array of fields).
    ///
    /// # Errors
    ///
    /// Returns the underlying serde error when the JSON is malformed.
    pub fn parse_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in schema order, for lineage recording.
    #[must_use]
    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_json_roundtrip() {
        let field = Field::with_logical_type("created_at", DataType::Long, LogicalType::TimestampMicros, true);
        let json = serde_json::to_string(&field).unwrap();
        let back: Field = serde_json::from_str(&json).unwrap();
        assert_eq!(field, back);
    }

    #[test]
    fn schema_parses_field_array() {
        let schema = Schema::parse_json(
            r#"[
                {"name": "id", "type": "long", "nullable": false},
                {"name": "ts", "type": "long", "logical_type": "timestamp-micros", "nullable": true}
            ]"#,
        )
        .unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.field("id").unwrap().data_type, DataType::Long);
        assert_eq!(
            schema.field("ts").unwrap().logical_type,
            Some(LogicalType::TimestampMicros)
        );
    }

    #[test]
    fn nullable_defaults_to_false() {
        let schema = Schema::parse_json(r#"[{"name": "id", "type": "int"}]"#).unwrap();
        assert!(!schema.field("id").unwrap().nullable);
    }

    #[test]
    fn display_type_prefers_logical() {
        let plain = Field::new("id", DataType::Long, false);
        assert_eq!(plain.display_type(), "long");
        let logical = Field::with_logical_type("d", DataType::Int, LogicalType::Date, false);
        assert_eq!(logical.display_type(), "date");
    }

    #[test]
    fn field_lookup_misses_unknown_name() {
        let schema = Schema::new(vec![Field::new("id", DataType::Long, false)]);
        assert!(schema.field("missing").is_none());
    }
}
