//! # Schema Files
//!
//! Loads schema documents from disk. The file extension picks the parser:
//! `.yaml`/`.yml` are read as YAML and converted to JSON, anything else is
//! read as JSON (`.avsc` being the conventional Avro extension).

use std::path::Path;

use serde_json::Value;

use recgen_core::SchemaType;

use crate::compiler::compile_json_schema;
use crate::error::SchemaError;

/// Read and compile the schema file at `path`.
///
/// # Errors
///
/// Returns `SchemaError::DocumentLoad` if the file cannot be read,
/// `SchemaError::Json`/`Yaml` if it does not parse,
/// `SchemaError::YamlNotJson` for YAML that JSON cannot express, and any
/// compilation error otherwise.
pub fn load_schema_file(path: impl AsRef<Path>) -> Result<SchemaType, SchemaError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::DocumentLoad {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let json: Value = if is_yaml {
        yaml_to_json_value(serde_yaml::from_str(&content)?)?
    } else {
        serde_json::from_str(&content)?
    };

    tracing::debug!(path = %path.display(), yaml = is_yaml, "compiling schema file");
    compile_json_schema(&json)
}

/// Convert a parsed YAML document into the JSON value the compiler reads.
///
/// Mapping keys must be strings and numbers must be finite. Tags are
/// ignored; the tagged value is kept.
///
/// # Errors
///
/// Returns `SchemaError::YamlNotJson` naming the location of the first
/// value with no JSON form.
pub fn yaml_to_json_value(yaml: serde_yaml::Value) -> Result<Value, SchemaError> {
    convert(yaml, "$")
}

fn convert(yaml: serde_yaml::Value, at: &str) -> Result<Value, SchemaError> {
    use serde_yaml::Value as Yaml;

    let json = match yaml {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::String(s) => Value::String(s),
        Yaml::Number(n) => n
            .as_i64()
            .map(Value::from)
            .or_else(|| n.as_u64().map(Value::from))
            .or_else(|| n.as_f64().and_then(serde_json::Number::from_f64).map(Value::Number))
            .ok_or_else(|| not_json(at, format!("number {n} is not finite")))?,
        Yaml::Sequence(items) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| convert(item, &format!("{at}[{i}]")))
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(entries) => {
            let mut object = serde_json::Map::with_capacity(entries.len());
            for (key, value) in entries {
                let key = match key {
                    Yaml::String(key) => key,
                    other => {
                        return Err(not_json(at, format!("mapping key {other:?} is not a string")))
                    }
                };
                let value = convert(value, &format!("{at}.{key}"))?;
                object.insert(key, value);
            }
            Value::Object(object)
        }
        Yaml::Tagged(tagged) => convert(tagged.value, at)?,
    };
    Ok(json)
}

fn not_json(at: &str, reason: String) -> SchemaError {
    SchemaError::YamlNotJson {
        location: at.to_string(),
        reason,
    }
}
