//! # Schema Compilation Errors
//!
//! Every error names the offending JSON fragment so a malformed schema can
//! be located without a line number.

use thiserror::Error;

/// Error while compiling or loading a schema document.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A required key is missing from a JSON object.
    #[error("Missing Json field \"{field}\": {json}")]
    MissingField {
        /// The missing key.
        field: String,
        /// The object it was expected in.
        json: String,
    },

    /// A key is present but holds the wrong kind of JSON value.
    #[error("Json field \"{field}\" is not a {expected}: {json}")]
    WrongFieldType {
        /// The offending key.
        field: String,
        /// The JSON kind that was expected.
        expected: &'static str,
        /// The object containing the key.
        json: String,
    },

    /// A type name is neither a primitive nor a defined named type.
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// A `"type"` value that no rule knows how to compile.
    #[error("Unknown type definition: {0}")]
    UnknownTypeDefinition(String),

    /// A primitive in object form carries keys besides `"type"`.
    #[error("Unknown additional Json fields: {0}")]
    UnknownAdditionalFields(String),

    /// An enum symbol is not a JSON string.
    #[error("Enum symbol not a string: {0}")]
    InvalidEnumSymbol(String),

    /// A fixed type declares a size of zero or less.
    #[error("Size for fixed is not positive: {0}")]
    NonPositiveFixedSize(String),

    /// A record field entry is not a JSON object.
    #[error("Record field is not a Json object: {0}")]
    InvalidField(String),

    /// A JSON value that cannot describe a type (number, boolean, null).
    #[error("Invalid Avro type: {0}")]
    InvalidType(String),

    /// A named type is defined twice under the same full name.
    #[error("The name {0} is already in use")]
    DuplicateName(String),

    /// The document is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is not valid YAML.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A YAML document holds something JSON cannot express.
    #[error("YAML at {location} has no JSON form: {reason}")]
    YamlNotJson {
        /// Where in the document, as `$.fields[0].type`.
        location: String,
        /// What could not be converted.
        reason: String,
    },

    /// The schema file could not be read.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoad {
        /// Path of the schema file.
        path: String,
        /// Why it could not be loaded.
        reason: String,
    },

    /// IO error reading a schema stream.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
