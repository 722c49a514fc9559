//! # Field Accessors
//!
//! One [`FieldAccessor`] is bound per schema field when a record type is
//! built. It owns a copy of the field's type and the slot the field's
//! value lives in, so reading is a slot lookup and writing is one call to
//! the validation contract followed by a slot store.
//!
//! Writes are all-or-nothing: a rejected value leaves the slot exactly as
//! it was, written or not.

use recgen_core::{Datum, Field, SchemaType, TypeMismatch, ValidationContract};

use crate::error::RecordError;
use crate::instance::RecordInstance;

/// The validated getter/setter pair for one field of a record type.
///
/// Accessors live inside their record type and are only handed out by
/// reference; an accessor used with an instance of another type is
/// rejected.
#[derive(Debug)]
pub struct FieldAccessor {
    record: String,
    name: String,
    field_type: SchemaType,
    slot: usize,
    doc: String,
    getter_doc: String,
    setter_doc: String,
}

/// Bind the accessor pair for `field` of record `record`, storing its
/// value in `slot`.
pub(crate) fn bind(record: &str, field: &Field, slot: usize) -> FieldAccessor {
    let name = field.name();
    let doc = match field.doc() {
        Some(doc) => doc.to_string(),
        None => format!("Generated property for the {name} field"),
    };
    FieldAccessor {
        record: record.to_string(),
        name: name.to_string(),
        field_type: field.field_type().clone(),
        slot,
        doc,
        getter_doc: format!("Getter for the {name} field"),
        setter_doc: format!("Setter for the {name} field"),
    }
}

impl FieldAccessor {
    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field's declared type.
    pub fn field_type(&self) -> &SchemaType {
        &self.field_type
    }

    /// Position of the field's value in an instance.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// The field's doc string, or a generated one naming the field.
    pub fn doc(&self) -> &str {
        &self.doc
    }

    pub fn getter_doc(&self) -> &str {
        &self.getter_doc
    }

    pub fn setter_doc(&self) -> &str {
        &self.setter_doc
    }

    /// Read this field from `instance`.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::ForeignInstance` if `instance` is not of the
    /// record type this accessor was bound for.
    pub fn get<'a>(&self, instance: &'a RecordInstance) -> Result<Option<&'a Datum>, RecordError> {
        self.check_owner(instance)?;
        Ok(self.read(instance.values()))
    }

    /// Write `value` to this field of `instance`.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::TypeMismatch` if the value does not conform to
    /// the field's type (the field is left unchanged), or
    /// `RecordError::ForeignInstance` if `instance` is of another type.
    pub fn set(&self, instance: &mut RecordInstance, value: impl Into<Datum>) -> Result<(), RecordError> {
        self.check_owner(instance)?;
        instance.store(self, value.into())?;
        Ok(())
    }

    pub(crate) fn read<'a>(&self, values: &'a [Option<Datum>]) -> Option<&'a Datum> {
        values.get(self.slot).and_then(Option::as_ref)
    }

    pub(crate) fn write(
        &self,
        contract: &dyn ValidationContract,
        values: &mut [Option<Datum>],
        value: Datum,
    ) -> Result<(), TypeMismatch> {
        if !contract.validate(&self.field_type, &value) {
            tracing::debug!(field = %self.name, datum = %value, "rejected write");
            return Err(TypeMismatch::new(self.field_type.clone(), value));
        }
        tracing::trace!(field = %self.name, "accepted write");
        // Instances are sized to their type's accessor table, and `slot`
        // indexes that table.
        values[self.slot] = Some(value);
        Ok(())
    }

    fn check_owner(&self, instance: &RecordInstance) -> Result<(), RecordError> {
        let ty = instance.record_type();
        let owned = ty
            .accessors()
            .get(self.slot)
            .is_some_and(|a| std::ptr::eq(a, self));
        if owned {
            Ok(())
        } else {
            Err(RecordError::ForeignInstance {
                expected: self.record.clone(),
                found: ty.fullname(),
            })
        }
    }
}
