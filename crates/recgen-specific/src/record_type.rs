//! # Record Type Factory
//!
//! Turns a [`RecordSchema`] into a [`RecordType`]: the schema, kept as
//! type-level metadata, plus a table of validated field accessors.
//!
//! ## Accessor Table
//!
//! Accessors are bound in declaration order, one per field. Field names
//! are not required to be unique; when a name repeats, the later field's
//! accessor replaces the earlier one in the earlier one's position, so a
//! name always reaches exactly one accessor.
//!
//! ## Recursive References
//!
//! A schema links back to an enclosing record only weakly. A type built
//! from a nested record holds every record reachable through such links,
//! so it accepts the same values after the enclosing schema is dropped.
//!
//! ## No Registry
//!
//! Building is pure. Nothing is cached and no type is ever replaced:
//! building twice from the same schema gives two distinct types whose
//! instances never compare equal.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use recgen_core::{AvroValidation, Datum, RecordSchema, SchemaType, TypeMismatch, ValidationContract};

use crate::accessor::{self, FieldAccessor};
use crate::error::RecordError;
use crate::instance::RecordInstance;

/// What an unwritten field is checked as by `validate_instance`.
static ABSENT: Datum = Datum::Null;

/// Builds record types, validating writes through one contract.
#[derive(Clone)]
pub struct RecordTypeFactory {
    contract: Arc<dyn ValidationContract>,
}

impl Default for RecordTypeFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RecordTypeFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordTypeFactory").finish_non_exhaustive()
    }
}

impl RecordTypeFactory {
    /// A factory using the standard Avro validation rules.
    pub fn new() -> Self {
        Self::with_contract(Arc::new(AvroValidation))
    }

    /// A factory whose types validate writes with `contract`.
    pub fn with_contract(contract: Arc<dyn ValidationContract>) -> Self {
        Self { contract }
    }

    /// Build a new record type from `schema`.
    pub fn build(&self, schema: Arc<RecordSchema>) -> RecordType {
        let fullname = schema.fullname();
        let mut accessors: Vec<FieldAccessor> = Vec::with_capacity(schema.fields().len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(schema.fields().len());

        for field in schema.fields() {
            match index.get(field.name()) {
                Some(&slot) => {
                    tracing::debug!(record = %fullname, field = field.name(), "field shadows an earlier declaration");
                    accessors[slot] = accessor::bind(&fullname, field, slot);
                }
                None => {
                    let slot = accessors.len();
                    accessors.push(accessor::bind(&fullname, field, slot));
                    index.insert(field.name().to_string(), slot);
                }
            }
        }

        let pinned = recursive_targets(&schema);
        tracing::debug!(
            record = %fullname,
            accessors = accessors.len(),
            pinned = pinned.len(),
            "built record type"
        );
        RecordType {
            inner: Arc::new(RecordTypeInner {
                schema,
                accessors,
                index,
                _pinned: pinned,
                contract: Arc::clone(&self.contract),
            }),
        }
    }

    /// Build a record type from any schema, which must describe a record.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::NotARecord` for every other kind of schema,
    /// and for a self-reference whose record no longer exists.
    pub fn build_from(&self, schema: &SchemaType) -> Result<RecordType, RecordError> {
        let record = match schema {
            SchemaType::Record(record) => Some(Arc::clone(record)),
            SchemaType::Recursive(link) => link.resolve(),
            _ => None,
        };
        match record {
            Some(record) => Ok(self.build(record)),
            None => Err(RecordError::NotARecord(schema.to_string())),
        }
    }
}

/// Build a record type from `schema` with the standard validation rules.
pub fn specific_record(schema: Arc<RecordSchema>) -> RecordType {
    RecordTypeFactory::new().build(schema)
}

/// Records reached from `root` only through recursive references.
///
/// Records nested by value are already owned by the schema tree; those
/// behind a `RecursiveRef` are not, and are returned here.
fn recursive_targets(root: &RecordSchema) -> Vec<Arc<RecordSchema>> {
    let mut seen = HashSet::from([root.fullname()]);
    let mut pinned = Vec::new();
    for field in root.fields() {
        collect_targets(field.field_type(), &mut seen, &mut pinned);
    }
    pinned
}

fn collect_targets(ty: &SchemaType, seen: &mut HashSet<String>, pinned: &mut Vec<Arc<RecordSchema>>) {
    match ty {
        SchemaType::Record(record) => {
            if seen.insert(record.fullname()) {
                for field in record.fields() {
                    collect_targets(field.field_type(), seen, pinned);
                }
            }
        }
        SchemaType::Recursive(link) => {
            let Some(record) = link.resolve() else {
                return;
            };
            if seen.insert(record.fullname()) {
                for field in record.fields() {
                    collect_targets(field.field_type(), seen, pinned);
                }
                pinned.push(record);
            }
        }
        SchemaType::Array(inner) | SchemaType::Map(inner) => collect_targets(inner, seen, pinned),
        SchemaType::Union(branches) => {
            for branch in branches {
                collect_targets(branch, seen, pinned);
            }
        }
        _ => {}
    }
}

struct RecordTypeInner {
    schema: Arc<RecordSchema>,
    accessors: Vec<FieldAccessor>,
    index: HashMap<String, usize>,
    /// Records the schema reaches only through weak recursive links.
    _pinned: Vec<Arc<RecordSchema>>,
    contract: Arc<dyn ValidationContract>,
}

/// A record type generated from a schema.
///
/// Cheap to clone; clones are the same type.
#[derive(Clone)]
pub struct RecordType {
    inner: Arc<RecordTypeInner>,
}

impl RecordType {
    /// The unqualified record name.
    pub fn name(&self) -> &str {
        self.inner.schema.name()
    }

    pub fn fullname(&self) -> String {
        self.inner.schema.fullname()
    }

    /// The schema this type was built from.
    pub fn schema(&self) -> &Arc<RecordSchema> {
        &self.inner.schema
    }

    pub fn doc(&self) -> Option<&str> {
        self.inner.schema.doc()
    }

    /// Every accessor, in slot order.
    pub fn accessors(&self) -> &[FieldAccessor] {
        &self.inner.accessors
    }

    /// The accessor reached by `name`, if the schema declares it.
    pub fn accessor(&self, name: &str) -> Option<&FieldAccessor> {
        self.inner
            .index
            .get(name)
            .map(|&slot| &self.inner.accessors[slot])
    }

    /// Like [`accessor`](Self::accessor), failing for undeclared names.
    pub(crate) fn require_accessor(&self, name: &str) -> Result<&FieldAccessor, RecordError> {
        self.accessor(name).ok_or_else(|| RecordError::UnknownField {
            record: self.fullname(),
            field: name.to_string(),
        })
    }

    pub(crate) fn contract(&self) -> &Arc<dyn ValidationContract> {
        &self.inner.contract
    }

    /// Whether `self` and `other` are the same type.
    pub fn same_type(&self, other: &RecordType) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// A new instance with no field written.
    pub fn new_instance(&self) -> RecordInstance {
        RecordInstance::new(self.clone())
    }

    /// A new instance populated from a map of field values.
    ///
    /// Each entry is written through its field's setter.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::InvalidDatum` if `datum` is not a map,
    /// `RecordError::UnknownField` for a key the schema does not declare,
    /// and `RecordError::TypeMismatch` for the first rejected value.
    pub fn instance_from_datum(&self, datum: Datum) -> Result<RecordInstance, RecordError> {
        let entries = match datum {
            Datum::Map(entries) => entries,
            other => {
                return Err(RecordError::InvalidDatum {
                    record: self.fullname(),
                    datum: other.to_string(),
                })
            }
        };
        let mut instance = self.new_instance();
        for (key, value) in entries {
            instance.set(&key, value)?;
        }
        Ok(instance)
    }

    /// Check every field of `instance` against the schema.
    ///
    /// Fields are checked in declaration order; an unwritten field is
    /// checked as `null`. Stops at the first field that fails.
    ///
    /// # Errors
    ///
    /// Returns `RecordError::TypeMismatch` naming the first offending
    /// field's type and value, or `RecordError::ForeignInstance` if
    /// `instance` belongs to another type.
    pub fn validate_instance(&self, instance: &RecordInstance) -> Result<(), RecordError> {
        if !self.same_type(instance.record_type()) {
            return Err(RecordError::ForeignInstance {
                expected: self.fullname(),
                found: instance.record_type().fullname(),
            });
        }
        for field in self.inner.schema.fields() {
            let value = self
                .accessor(field.name())
                .and_then(|a| a.read(instance.values()))
                .unwrap_or(&ABSENT);
            if !self.inner.contract.validate(field.field_type(), value) {
                return Err(TypeMismatch::new(field.field_type().clone(), value.clone()).into());
            }
        }
        Ok(())
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.same_type(other)
    }
}

impl Eq for RecordType {}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.accessors().iter().map(FieldAccessor::name).collect();
        f.debug_struct("RecordType")
            .field("fullname", &self.fullname())
            .field("fields", &fields)
            .finish()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fullname())
    }
}
