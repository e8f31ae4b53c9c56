use miette::Diagnostic;
use thiserror::Error;

use crate::core::types::DType;

/// Result alias used throughout the crate.
pub type Result<T, E = TableError> = std::result::Result<T, E>;

/// Errors raised by schema construction, type mapping and table access.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum TableError {
    #[error("Unsupported type descriptor: '{descriptor}'")]
    #[diagnostic(
        code(table::unsupported_type),
        help("supported descriptors are int, int8..int64, float, float16..float128, str, bool, bool_, bool8, datetime, datetime64, Timestamp and date")
    )]
    UnsupportedType { descriptor: String },

    #[error("Schema arity mismatch: {names} name(s) but {types} type(s)")]
    #[diagnostic(code(table::schema_arity))]
    SchemaArity { names: usize, types: usize },

    #[error("Table '{table}' has not been initialized")]
    #[diagnostic(
        code(table::uninitialized),
        help("call `Table::init` before accessing columns")
    )]
    UninitializedTable { table: String },

    #[error("Column already exists: {name}")]
    #[diagnostic(code(table::duplicate_column))]
    DuplicateColumn { name: String },

    #[error("Column not found: {0}")]
    #[diagnostic(code(table::column_not_found))]
    ColumnNotFound(String),

    #[error("Column index {index} out of bounds for {len} column(s)")]
    #[diagnostic(code(table::column_index))]
    ColumnIndexOutOfBounds { index: usize, len: usize },

    #[error("Row {index} out of bounds for {len} row(s)")]
    #[diagnostic(code(table::row_index))]
    RowOutOfBounds { index: usize, len: usize },

    #[error("Row has {found} value(s) but the schema has {expected} column(s)")]
    #[diagnostic(code(table::row_arity))]
    RowArity { expected: usize, found: usize },

    #[error("Type mismatch in column '{column}': expected {expected}, found {found}")]
    #[diagnostic(code(table::type_mismatch))]
    TypeMismatch {
        column: String,
        expected: DType,
        found: String,
    },

    #[error("Column '{column}' cannot be null")]
    #[diagnostic(code(table::null_violation))]
    NullViolation { column: String },

    #[error("Invalid date: {year:04}-{month:02}-{day:02}")]
    #[diagnostic(code(table::invalid_date))]
    InvalidDate { year: i32, month: u8, day: u8 },
}
