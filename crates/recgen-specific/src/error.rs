//! # Record Errors
//!
//! A rejected value surfaces as [`TypeMismatch`], unchanged from the
//! validation layer. The other variants cover misuse of the generated
//! type itself: naming a field it does not declare, mixing instances of
//! different types, or building a type from a schema that is not a record.

use thiserror::Error;

use recgen_core::TypeMismatch;

/// Error from a generated record type or one of its instances.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    /// A value failed validation against its field's type.
    #[error(transparent)]
    TypeMismatch(#[from] TypeMismatch),

    /// The record type declares no field with this name.
    #[error("record {record} has no field named \"{field}\"")]
    UnknownField {
        /// Full name of the record type.
        record: String,
        /// The requested field name.
        field: String,
    },

    /// A record type was requested for a schema that is not a record.
    #[error("schema is not a record: {0}")]
    NotARecord(String),

    /// A datum used to populate an instance is not a map of field values.
    #[error("cannot populate record {record} from {datum}: expected a map")]
    InvalidDatum {
        /// Full name of the record type.
        record: String,
        /// The offending datum, rendered.
        datum: String,
    },

    /// An instance or accessor was used with a record type it does not belong to.
    #[error("instance of {found} used where {expected} was expected")]
    ForeignInstance {
        /// Full name of the record type that was expected.
        expected: String,
        /// Full name of the record type actually found.
        found: String,
    },
}

impl RecordError {
    /// The type mismatch, if this error is one.
    pub fn as_type_mismatch(&self) -> Option<&TypeMismatch> {
        match self {
            RecordError::TypeMismatch(m) => Some(m),
            _ => None,
        }
    }
}
