//! # Validation Contract
//!
//! Decides whether a [`Datum`] is an example of a [`SchemaType`].
//!
//! The predicate is pure and total: it never fails and never panics,
//! whatever the pair. Callers turn a `false` into a [`TypeMismatch`]
//! themselves, carrying the schema and datum that were checked.
//!
//! [`TypeMismatch`]: crate::TypeMismatch

use crate::datum::Datum;
use crate::schema::{RecordSchema, SchemaType};

/// Smallest value accepted by `int`.
pub const INT_MIN: i64 = i32::MIN as i64;
/// Largest value accepted by `int`.
pub const INT_MAX: i64 = i32::MAX as i64;

/// Whether `datum` conforms to `schema`.
///
/// | schema         | accepts                                              |
/// |----------------|------------------------------------------------------|
/// | null           | `Null`                                               |
/// | boolean        | `Boolean`                                            |
/// | string         | `String`                                             |
/// | bytes          | `Bytes`                                              |
/// | int            | `Int` within 32-bit range                            |
/// | long           | `Int`                                                |
/// | float, double  | `Int` or `Float`                                     |
/// | fixed          | `Bytes` of exactly the declared size                 |
/// | enum           | `String` equal to a symbol                           |
/// | array          | `Array` of valid items                               |
/// | map            | `Map` of valid values                                |
/// | union          | anything a branch accepts                            |
/// | record, error  | `Map` where each field validates; absent is `Null`   |
pub fn validate(schema: &SchemaType, datum: &Datum) -> bool {
    match (schema, datum) {
        (SchemaType::Null, Datum::Null) => true,
        (SchemaType::Boolean, Datum::Boolean(_)) => true,
        (SchemaType::String, Datum::String(_)) => true,
        (SchemaType::Bytes, Datum::Bytes(_)) => true,
        (SchemaType::Int, Datum::Int(n)) => (INT_MIN..=INT_MAX).contains(n),
        (SchemaType::Long, Datum::Int(_)) => true,
        (SchemaType::Float | SchemaType::Double, Datum::Int(_) | Datum::Float(_)) => true,
        (SchemaType::Fixed(fixed), Datum::Bytes(b)) => b.len() == fixed.size(),
        (SchemaType::Enum(e), Datum::String(s)) => e.symbols().iter().any(|sym| sym == s),
        (SchemaType::Array(items), Datum::Array(values)) => {
            values.iter().all(|v| validate(items, v))
        }
        (SchemaType::Map(values), Datum::Map(entries)) => {
            entries.values().all(|v| validate(values, v))
        }
        (SchemaType::Union(branches), _) => branches.iter().any(|b| validate(b, datum)),
        (SchemaType::Record(record), Datum::Map(_)) => validate_record(record, datum),
        (SchemaType::Recursive(link), Datum::Map(_)) => match link.resolve() {
            Some(record) => validate_record(&record, datum),
            None => false,
        },
        _ => false,
    }
}

static NULL: Datum = Datum::Null;

fn validate_record(record: &RecordSchema, datum: &Datum) -> bool {
    let Some(entries) = datum.as_map() else {
        return false;
    };
    record.fields().iter().all(|field| {
        let value = entries.get(field.name()).unwrap_or(&NULL);
        validate(field.field_type(), value)
    })
}

/// The seam through which generated record types validate writes.
///
/// Implementations must be pure and total, like [`validate`].
pub trait ValidationContract: Send + Sync {
    /// Whether `datum` conforms to `schema`.
    fn validate(&self, schema: &SchemaType, datum: &Datum) -> bool;
}

/// The standard Avro rules implemented by [`validate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AvroValidation;

impl ValidationContract for AvroValidation {
    fn validate(&self, schema: &SchemaType, datum: &Datum) -> bool {
        validate(schema, datum)
    }
}
