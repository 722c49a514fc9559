//! # recgen-core: Schema and Value Model
//!
//! This crate is the leaf of the recgen workspace. It defines the schema
//! descriptor that record types are generated from, the dynamic runtime
//! value (`Datum`) stored in generated records, and the validation
//! contract deciding whether a value conforms to a schema.
//!
//! ## Key Design Principles
//!
//! 1. **Schemas are immutable and shared.** Named types (`record`, `enum`,
//!    `fixed`) live behind `Arc` so a generated record type can reference
//!    its originating schema for as long as any instance exists.
//!
//! 2. **One validation predicate.** [`validate`] is pure and total over any
//!    `(schema, datum)` pair. The [`ValidationContract`] trait is the seam
//!    for callers that need to substitute their own rules.
//!
//! 3. **One error kind.** [`TypeMismatch`] carries the offending schema and
//!    datum and is the only error this crate produces.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `recgen-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod datum;
pub mod error;
pub mod schema;
pub mod validate;

// Re-export primary types for ergonomic imports.
pub use datum::Datum;
pub use error::TypeMismatch;
pub use schema::{
    EnumSchema, Field, FixedSchema, Name, RecordSchema, RecursiveRef, SchemaType,
};
pub use validate::{validate, AvroValidation, ValidationContract, INT_MAX, INT_MIN};
