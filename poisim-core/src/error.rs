//! Error types raised while building datasets and comparing them.

use thiserror::Error;

/// Errors returned when a [`Dataset`](crate::Dataset) or
/// [`Schema`](crate::Schema) would violate its invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DatasetError {
    /// Two records share an identifier.
    #[error("record id {id:?} appears more than once")]
    DuplicateId {
        /// The repeated identifier.
        id: String,
    },
    /// A column name appears twice in a schema.
    #[error("column {column:?} appears more than once")]
    DuplicateColumn {
        /// The repeated column name.
        column: String,
    },
    /// A record does not carry one value per schema column.
    #[error("record {id:?} has {found} values but the schema has {expected} columns")]
    FieldCountMismatch {
        /// Identifier of the offending record.
        id: String,
        /// Number of schema columns.
        expected: usize,
        /// Number of values found on the record.
        found: usize,
    },
    /// A named column is absent from the schema.
    #[error("column {column:?} is not part of the schema")]
    UnknownColumn {
        /// The requested column name.
        column: String,
    },
    /// Two schemas do not hold the same set of columns.
    #[error("schemas differ: missing {missing:?}, unexpected {unexpected:?}")]
    SchemaMismatch {
        /// Columns of the reference schema absent from the other.
        missing: Vec<String>,
        /// Columns of the other schema absent from the reference.
        unexpected: Vec<String>,
    },
}

/// Errors returned by [`compare`](crate::compare).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompareError {
    /// Dataset validation failed.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    /// A configured field is absent from the datasets.
    #[error("{role} field {column:?} is not a column of the datasets")]
    UnknownField {
        /// Role of the field (`name`, `address` or `phone`).
        role: &'static str,
        /// Configured column name.
        column: String,
    },
    /// A penalty weight is not a finite number.
    #[error("weight {field} must be finite (got {value})")]
    InvalidWeight {
        /// Name of the offending weight.
        field: String,
        /// Value supplied.
        value: f64,
    },
    /// The driving dataset is empty so the score cannot be normalised.
    #[error("driving dataset is empty; the score cannot be normalised")]
    EmptyDriving,
}
