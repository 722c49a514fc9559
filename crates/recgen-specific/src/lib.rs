//! # recgen-specific: Specific Record Types
//!
//! Builds, from a record schema, a record type whose field accessors
//! enforce the schema on every write. Instead of hand-writing one struct
//! per schema, callers pass a [`RecordSchema`] to a [`RecordTypeFactory`]
//! and get back a ready-made [`RecordType`].
//!
//! ```
//! use std::sync::Arc;
//! use recgen_core::{Datum, Field, Name, RecordSchema, SchemaType};
//! use recgen_specific::specific_record;
//!
//! let schema = Arc::new(RecordSchema::new(
//!     Name::new("fooRecord", None),
//!     vec![Field::new("f1", SchemaType::Int), Field::new("f2", SchemaType::Long)],
//! ));
//! let foo = specific_record(schema);
//!
//! let mut record = foo.new_instance();
//! record.set("f1", 1).unwrap();
//! assert_eq!(record.get("f1").unwrap(), Some(&Datum::Int(1)));
//! assert!(record.set("f1", "bad").is_err());
//! ```
//!
//! ## Pieces
//!
//! - [`RecordTypeFactory`] binds one [`FieldAccessor`] per schema field and
//!   keeps the schema as immutable type-level metadata.
//! - [`FieldAccessor`] is the validated getter/setter pair for one field.
//!   It holds the field's type, so a write needs one table lookup and one
//!   call to the validation contract.
//! - [`RecordInstance`] is the runtime shape every generated type shares:
//!   a slot per field, empty until written.
//!
//! ## Type Identity
//!
//! A `RecordType` is a handle. Clones of a handle are the same type; two
//! builds are two types, even from the same schema. No registry is kept.
//!
//! ## Missing Values
//!
//! A declared field that was never written reads as `None` through every
//! read path. Naming a field the schema does not declare is an error.

pub mod accessor;
pub mod error;
pub mod instance;
pub mod record_type;

pub use accessor::FieldAccessor;
pub use error::RecordError;
pub use instance::{FieldMut, FieldRef, RecordInstance};
pub use record_type::{specific_record, RecordType, RecordTypeFactory};

// Re-export the schema model so callers need only this crate.
pub use recgen_core::{Datum, RecordSchema, SchemaType, TypeMismatch};
