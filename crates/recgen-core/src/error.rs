//! # Error Types
//!
//! The validation layer has exactly one failure: a datum that does not
//! conform to its schema. The error carries both sides so callers can
//! report the declared type next to the rejected value.

use thiserror::Error;

use crate::datum::Datum;
use crate::schema::SchemaType;

/// A datum failed the validation contract for a schema.
///
/// Raised by single-field writes and by whole-record validation alike.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("The datum {datum} is not an example of the schema {schema}")]
pub struct TypeMismatch {
    /// The schema the datum was checked against.
    pub schema: SchemaType,
    /// The rejected datum.
    pub datum: Datum,
}

impl TypeMismatch {
    /// Build a mismatch for `datum` checked against `schema`.
    pub fn new(schema: SchemaType, datum: Datum) -> Self {
        Self { schema, datum }
    }
}
