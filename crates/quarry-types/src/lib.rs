//! Shared Quarry schema and error model types.
//!
//! This crate is dependency-boundary-safe for both the core planner and
//! dialect connectors: serde-serializable types only, no database client
//! dependencies.

pub mod column;
pub mod error;
pub mod schema;

pub use column::ColumnType;
pub use error::{
    ClassifiedError, ErrorCategory, ErrorType, FieldMismatch, InvalidArgument, InvalidState, Phase,
    SourceError, SqlFailure, ValidationFailure,
};
pub use schema::{DataType, Field, LogicalType, Schema};
