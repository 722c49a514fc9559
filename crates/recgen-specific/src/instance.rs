//! # Record Instances
//!
//! The runtime shape shared by every generated record type: one slot per
//! accessor, each either unwritten or holding a value that passed
//! validation when it was written.
//!
//! ## Field States
//!
//! ```text
//! unwritten ──set(v1) ok──▶ written(v1) ──set(v2) ok──▶ written(v2)
//!     │                          │
//!     └── set rejected: no change └── set rejected: no change
//! ```
//!
//! There is no transition back to unwritten, and nothing is defaulted.
//!
//! ## Equality
//!
//! Two instances are equal when they belong to the same record type and
//! hold equal values in the same fields. Instances of different types are
//! never equal, whatever they hold.

use std::collections::BTreeMap;
use std::fmt;

use recgen_core::{Datum, TypeMismatch};

use crate::accessor::FieldAccessor;
use crate::error::RecordError;
use crate::record_type::RecordType;

/// An instance of a generated record type.
#[derive(Clone)]
pub struct RecordInstance {
    record_type: RecordType,
    values: Vec<Option<Datum>>,
}

impl RecordInstance {
    pub(crate) fn new(record_type: RecordType) -> Self {
        let values = vec![None; record_type.accessors().len()];
        Self {
            record_type,
            values,
        }
    }

    /// The record type this instance belongs to.
    pub fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    /// Read the field named `key`. `None` if it was never written.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::UnknownField` if the type declares no such field.
    pub fn get(&self, key: &str) -> Result<Option<&Datum>, RecordError> {
        let accessor = self.record_type.require_accessor(key)?;
        Ok(accessor.read(&self.values))
    }

    /// Write the field named `key` through its validated setter.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::UnknownField` if the type declares no such
    /// field, or `RecordError::TypeMismatch` if the value is rejected. In
    /// both cases the instance is unchanged.
    pub fn set(&mut self, key: &str, value: impl Into<Datum>) -> Result<(), RecordError> {
        self.field_mut(key)?.set(value)
    }

    /// Names of the fields written so far, in slot order.
    pub fn keys(&self) -> Vec<&str> {
        self.record_type
            .accessors()
            .iter()
            .filter(|a| a.read(&self.values).is_some())
            .map(FieldAccessor::name)
            .collect()
    }

    /// Read-only handle on one field.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::UnknownField` if the type declares no such field.
    pub fn field(&self, name: &str) -> Result<FieldRef<'_>, RecordError> {
        let accessor = self.record_type.require_accessor(name)?;
        Ok(FieldRef {
            accessor,
            values: &self.values,
        })
    }

    /// Read-write handle on one field.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::UnknownField` if the type declares no such field.
    pub fn field_mut(&mut self, name: &str) -> Result<FieldMut<'_>, RecordError> {
        let Self {
            record_type,
            values,
        } = self;
        let record_type: &RecordType = record_type;
        let accessor = record_type.require_accessor(name)?;
        Ok(FieldMut {
            accessor,
            record_type,
            values,
        })
    }

    /// Check every field against the schema; see [`RecordType::validate_instance`].
    pub fn validate(&self) -> Result<(), RecordError> {
        self.record_type.validate_instance(self)
    }

    /// The written fields as a map datum, the form a record value takes
    /// when nested inside another record.
    pub fn to_datum(&self) -> Datum {
        let entries: BTreeMap<String, Datum> = self
            .record_type
            .accessors()
            .iter()
            .filter_map(|a| a.read(&self.values).map(|v| (a.name().to_string(), v.clone())))
            .collect();
        Datum::Map(entries)
    }

    pub(crate) fn values(&self) -> &[Option<Datum>] {
        &self.values
    }

    pub(crate) fn store(&mut self, accessor: &FieldAccessor, value: Datum) -> Result<(), TypeMismatch> {
        accessor.write(self.record_type.contract().as_ref(), &mut self.values, value)
    }
}

impl PartialEq for RecordInstance {
    fn eq(&self, other: &Self) -> bool {
        self.record_type.same_type(&other.record_type) && self.values == other.values
    }
}

impl fmt::Debug for RecordInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.record_type.name());
        for accessor in self.record_type.accessors() {
            if let Some(value) = accessor.read(&self.values) {
                s.field(accessor.name(), value);
            }
        }
        s.finish()
    }
}

impl From<&RecordInstance> for Datum {
    fn from(instance: &RecordInstance) -> Self {
        instance.to_datum()
    }
}

/// A field of an instance, bound for reading.
#[derive(Debug, Clone, Copy)]
pub struct FieldRef<'a> {
    accessor: &'a FieldAccessor,
    values: &'a [Option<Datum>],
}

impl<'a> FieldRef<'a> {
    /// The current value, `None` if never written.
    pub fn get(&self) -> Option<&'a Datum> {
        self.accessor.read(self.values)
    }

    pub fn accessor(&self) -> &'a FieldAccessor {
        self.accessor
    }
}

/// A field of an instance, bound for reading and writing.
#[derive(Debug)]
pub struct FieldMut<'a> {
    accessor: &'a FieldAccessor,
    record_type: &'a RecordType,
    values: &'a mut Vec<Option<Datum>>,
}

impl<'a> FieldMut<'a> {
    /// The current value, `None` if never written.
    pub fn get(&self) -> Option<&Datum> {
        self.accessor.read(self.values.as_slice())
    }

    /// Validate and store `value`; on rejection the field is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::TypeMismatch` carrying the field's type and
    /// the rejected value.
    pub fn set(&mut self, value: impl Into<Datum>) -> Result<(), RecordError> {
        self.accessor
            .write(self.record_type.contract().as_ref(), self.values.as_mut_slice(), value.into())?;
        Ok(())
    }

    pub fn accessor(&self) -> &'a FieldAccessor {
        self.accessor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record_type::specific_record;
    use recgen_core::{Field, Name, RecordSchema, SchemaType};
    use std::sync::Arc;

    fn foo_type() -> RecordType {
        specific_record(Arc::new(RecordSchema::new(
            Name::new("fooRecord", None),
            vec![
                Field::new("f1", SchemaType::Int),
                Field::new("f2", SchemaType::Long),
            ],
        )))
    }

    #[test]
    fn test_new_instance_is_empty() {
        let rec = foo_type().new_instance();
        assert!(rec.keys().is_empty());
        assert_eq!(rec.get("f1").unwrap(), None);
        assert_eq!(rec.get("f2").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let mut rec = foo_type().new_instance();
        rec.set("f1", 1).unwrap();
        assert_eq!(rec.get("f1").unwrap(), Some(&Datum::Int(1)));
        assert_eq!(rec.keys(), vec!["f1"]);
    }

    #[test]
    fn test_set_bad_value_is_type_mismatch() {
        let mut rec = foo_type().new_instance();
        let err = rec.set("f1", "bad").unwrap_err();
        assert_eq!(
            err,
            RecordError::TypeMismatch(TypeMismatch::new(SchemaType::Int, Datum::from("bad")))
        );
        assert_eq!(rec.get("f1").unwrap(), None);
    }

    #[test]
    fn test_unknown_field() {
        let mut rec = foo_type().new_instance();
        assert!(matches!(
            rec.get("nope"),
            Err(RecordError::UnknownField { ref field, .. }) if field == "nope"
        ));
        assert!(matches!(rec.set("nope", 1), Err(RecordError::UnknownField { .. })));
        assert!(rec.keys().is_empty());
    }

    #[test]
    fn test_keys_follow_write_history_not_schema() {
        let mut rec = foo_type().new_instance();
        rec.set("f2", 2).unwrap();
        assert_eq!(rec.keys(), vec!["f2"]);
        rec.set("f1", 1).unwrap();
        assert_eq!(rec.keys(), vec!["f1", "f2"]);
    }

    #[test]
    fn test_field_handles() {
        let mut rec = foo_type().new_instance();
        {
            let mut f2 = rec.field_mut("f2").unwrap();
            assert_eq!(f2.get(), None);
            f2.set(i64::MAX).unwrap();
            assert_eq!(f2.accessor().name(), "f2");
        }
        let f2 = rec.field("f2").unwrap();
        assert_eq!(f2.get(), Some(&Datum::Int(i64::MAX)));
        assert_eq!(f2.accessor().doc(), "Generated property for the f2 field");
    }

    #[test]
    fn test_accessor_applied_directly() {
        let ty = foo_type();
        let mut rec = ty.new_instance();
        let f1 = ty.accessor("f1").unwrap();
        f1.set(&mut rec, 7).unwrap();
        assert_eq!(f1.get(&rec).unwrap(), Some(&Datum::Int(7)));
    }

    #[test]
    fn test_accessor_rejects_foreign_instance() {
        let a = foo_type();
        let b = foo_type();
        let mut rec = b.new_instance();
        let err = a.accessor("f1").unwrap().set(&mut rec, 1).unwrap_err();
        assert!(matches!(err, RecordError::ForeignInstance { .. }), "got: {err}");
        assert!(rec.keys().is_empty());
    }

    #[test]
    fn test_equality() {
        let ty = foo_type();
        let mut a = ty.new_instance();
        let mut b = ty.new_instance();
        assert_eq!(a, b);
        a.set("f1", 1).unwrap();
        assert_ne!(a, b);
        b.set("f1", 1).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_equality_requires_same_type() {
        let mut a = foo_type().new_instance();
        let mut b = foo_type().new_instance();
        a.set("f1", 1).unwrap();
        b.set("f1", 1).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_to_datum_and_debug() {
        let mut rec = foo_type().new_instance();
        rec.set("f2", 5).unwrap();
        let datum = rec.to_datum();
        assert_eq!(datum.as_map().unwrap().len(), 1);
        assert_eq!(datum.as_map().unwrap()["f2"], Datum::Int(5));
        assert_eq!(format!("{rec:?}"), "fooRecord { f2: Int(5) }");
    }
}
