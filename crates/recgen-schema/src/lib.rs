//! # recgen-schema: Schema Compiler
//!
//! Turns Avro schema documents into [`recgen_core::SchemaType`] trees.
//!
//! ## Compilation (`compiler`)
//!
//! [`SchemaCompiler`] walks a JSON value and builds the descriptor:
//!
//! - a JSON string names a primitive or a previously defined named type;
//! - a JSON object with a `"type"` key defines a type;
//! - a JSON array is a union of its members.
//!
//! Named types are kept in a symbol table keyed by full name. A record is
//! entered before its fields are compiled, so a field may refer to the
//! enclosing record; that reference becomes [`recgen_core::SchemaType::Recursive`].
//!
//! ## Files (`loader`)
//!
//! [`load_schema_file`] reads `.json`/`.avsc` and `.yaml`/`.yml` schema
//! files. YAML is converted to JSON before compilation.

pub mod compiler;
pub mod error;
pub mod loader;

pub use compiler::{
    compile_json_schema, compile_json_schema_from_reader, compile_json_schema_from_str,
    SchemaCompiler,
};
pub use error::SchemaError;
pub use loader::{load_schema_file, yaml_to_json_value};
