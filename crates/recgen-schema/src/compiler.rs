//! # Schema Compilation
//!
//! Builds a [`SchemaType`] from the JSON form of an Avro schema.
//!
//! ## Symbol Table
//!
//! Named types are registered under their full name as soon as they are
//! defined. Records are registered *before* their fields are compiled, as
//! a pending [`RecursiveRef`]; any field that names the record while it is
//! still being built receives that reference, and the reference is bound
//! to the finished record afterwards.
//!
//! A compiler may be reused across documents: types defined by an earlier
//! document can be referred to by name in a later one.
//!
//! ## Namespaces
//!
//! A named type without a `namespace` inherits the namespace of the named
//! type it is nested in. References are resolved first against the
//! enclosing namespace, then as written.

use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use serde_json::{Map, Value};

use recgen_core::{EnumSchema, Field, FixedSchema, Name, RecordSchema, RecursiveRef, SchemaType};

use crate::error::SchemaError;

/// An entry in the symbol table.
#[derive(Debug, Clone)]
enum Symbol {
    /// A complete named type.
    Defined(SchemaType),
    /// A record whose fields are still being compiled.
    Pending(RecursiveRef),
}

/// Compiles schema documents, remembering the named types it has seen.
#[derive(Debug, Default)]
pub struct SchemaCompiler {
    symbols: HashMap<String, Symbol>,
}

impl SchemaCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile one schema document.
    ///
    /// # Errors
    ///
    /// Returns the first structural problem found, naming the JSON fragment
    /// it was found in. Named types registered before the failure remain
    /// available; a record that failed part-way is not.
    pub fn compile(&mut self, json: &Value) -> Result<SchemaType, SchemaError> {
        self.make_node(json, None)
    }

    /// Look up a named type defined so far, by full name.
    pub fn named_type(&self, fullname: &str) -> Option<&SchemaType> {
        match self.symbols.get(fullname) {
            Some(Symbol::Defined(ty)) => Some(ty),
            _ => None,
        }
    }

    /// Full names of every named type defined so far, sorted.
    pub fn named_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .symbols
            .iter()
            .filter(|(_, sym)| matches!(sym, Symbol::Defined(_)))
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort();
        names
    }

    fn make_node(&mut self, json: &Value, namespace: Option<&str>) -> Result<SchemaType, SchemaError> {
        match json {
            Value::String(name) => self.resolve_name(name, namespace),
            Value::Object(map) => self.make_object_node(json, map, namespace),
            Value::Array(members) => {
                let branches = members
                    .iter()
                    .map(|m| self.make_node(m, namespace))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(SchemaType::Union(branches))
            }
            other => Err(SchemaError::InvalidType(other.to_string())),
        }
    }

    fn resolve_name(&self, name: &str, namespace: Option<&str>) -> Result<SchemaType, SchemaError> {
        if let Some(primitive) = SchemaType::primitive(name) {
            return Ok(primitive);
        }

        let qualified = Name::new(name, namespace).fullname();
        let symbol = self
            .symbols
            .get(&qualified)
            .or_else(|| self.symbols.get(name));

        match symbol {
            Some(Symbol::Defined(ty)) => Ok(ty.clone()),
            Some(Symbol::Pending(link)) => Ok(SchemaType::Recursive(link.clone())),
            None => Err(SchemaError::UnknownType(name.to_string())),
        }
    }

    fn make_object_node(
        &mut self,
        json: &Value,
        map: &Map<String, Value>,
        namespace: Option<&str>,
    ) -> Result<SchemaType, SchemaError> {
        let type_name = get_str(json, map, "type")?;

        if let Some(primitive) = SchemaType::primitive(type_name) {
            if map.len() > 1 {
                return Err(SchemaError::UnknownAdditionalFields(json.to_string()));
            }
            return Ok(primitive);
        }

        match type_name {
            "record" | "error" | "enum" | "fixed" => {
                let short = get_str(json, map, "name")?;
                let own_namespace = opt_str(json, map, "namespace")?;
                let name = Name::new(short, own_namespace.or(namespace));
                let fullname = name.fullname();
                if self.symbols.contains_key(&fullname) {
                    return Err(SchemaError::DuplicateName(fullname));
                }
                let doc = opt_str(json, map, "doc")?;

                let ty = match type_name {
                    "enum" => self.make_enum_node(json, map, name, doc)?,
                    "fixed" => make_fixed_node(json, map, name)?,
                    _ => self.make_record_node(json, map, name, doc, type_name == "error")?,
                };
                tracing::trace!(%fullname, kind = type_name, "registered named type");
                self.symbols.insert(fullname, Symbol::Defined(ty.clone()));
                Ok(ty)
            }
            "array" => {
                let items = find_field(json, map, "items")?;
                Ok(SchemaType::Array(Box::new(self.make_node(items, namespace)?)))
            }
            "map" => {
                let values = find_field(json, map, "values")?;
                Ok(SchemaType::Map(Box::new(self.make_node(values, namespace)?)))
            }
            _ => Err(SchemaError::UnknownTypeDefinition(json.to_string())),
        }
    }

    fn make_record_node(
        &mut self,
        json: &Value,
        map: &Map<String, Value>,
        name: Name,
        doc: Option<&str>,
        is_error: bool,
    ) -> Result<SchemaType, SchemaError> {
        let fullname = name.fullname();
        let link = RecursiveRef::pending(fullname.clone());
        self.symbols.insert(fullname.clone(), Symbol::Pending(link.clone()));

        let fields = match self.make_fields(json, map, name.namespace()) {
            Ok(fields) => fields,
            Err(e) => {
                self.symbols.remove(&fullname);
                return Err(e);
            }
        };

        let mut record = RecordSchema::new(name, fields);
        if let Some(doc) = doc {
            record = record.with_doc(doc);
        }
        if is_error {
            record = record.into_error();
        }
        let record = Arc::new(record);
        link.bind(&record);
        Ok(SchemaType::Record(record))
    }

    fn make_fields(
        &mut self,
        json: &Value,
        map: &Map<String, Value>,
        namespace: Option<&str>,
    ) -> Result<Vec<Field>, SchemaError> {
        let entries = get_array(json, map, "fields")?;
        let mut fields = Vec::with_capacity(entries.len());
        for entry in entries {
            let Value::Object(field_map) = entry else {
                return Err(SchemaError::InvalidField(entry.to_string()));
            };
            let field_name = get_str(entry, field_map, "name")?;
            let field_type = self.make_node(find_field(entry, field_map, "type")?, namespace)?;
            let mut field = Field::new(field_name, field_type);
            if let Some(doc) = opt_str(entry, field_map, "doc")? {
                field = field.with_doc(doc);
            }
            fields.push(field);
        }
        Ok(fields)
    }

    fn make_enum_node(
        &self,
        json: &Value,
        map: &Map<String, Value>,
        name: Name,
        doc: Option<&str>,
    ) -> Result<SchemaType, SchemaError> {
        let symbols = get_array(json, map, "symbols")?
            .iter()
            .map(|s| match s {
                Value::String(s) => Ok(s.clone()),
                other => Err(SchemaError::InvalidEnumSymbol(other.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mut schema = EnumSchema::new(name, symbols);
        if let Some(doc) = doc {
            schema = schema.with_doc(doc);
        }
        Ok(SchemaType::Enum(Arc::new(schema)))
    }
}

fn make_fixed_node(json: &Value, map: &Map<String, Value>, name: Name) -> Result<SchemaType, SchemaError> {
    let size = find_field(json, map, "size")?
        .as_i64()
        .ok_or_else(|| wrong_type(json, "size", "integer"))?;
    if size <= 0 {
        return Err(SchemaError::NonPositiveFixedSize(json.to_string()));
    }
    let size = usize::try_from(size).map_err(|_| wrong_type(json, "size", "integer"))?;
    Ok(SchemaType::Fixed(Arc::new(FixedSchema::new(name, size))))
}

fn find_field<'a>(json: &Value, map: &'a Map<String, Value>, field: &str) -> Result<&'a Value, SchemaError> {
    map.get(field).ok_or_else(|| SchemaError::MissingField {
        field: field.to_string(),
        json: json.to_string(),
    })
}

fn get_str<'a>(json: &Value, map: &'a Map<String, Value>, field: &str) -> Result<&'a str, SchemaError> {
    find_field(json, map, field)?
        .as_str()
        .ok_or_else(|| wrong_type(json, field, "string"))
}

fn get_array<'a>(json: &Value, map: &'a Map<String, Value>, field: &str) -> Result<&'a Vec<Value>, SchemaError> {
    find_field(json, map, field)?
        .as_array()
        .ok_or_else(|| wrong_type(json, field, "array"))
}

fn opt_str<'a>(json: &Value, map: &'a Map<String, Value>, field: &str) -> Result<Option<&'a str>, SchemaError> {
    match map.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(wrong_type(json, field, "string")),
    }
}

fn wrong_type(json: &Value, field: &str, expected: &'static str) -> SchemaError {
    SchemaError::WrongFieldType {
        field: field.to_string(),
        expected,
        json: json.to_string(),
    }
}

/// Compile a schema from a parsed JSON value.
pub fn compile_json_schema(json: &Value) -> Result<SchemaType, SchemaError> {
    SchemaCompiler::new().compile(json)
}

/// Compile a schema from JSON text.
pub fn compile_json_schema_from_str(input: &str) -> Result<SchemaType, SchemaError> {
    let json: Value = serde_json::from_str(input)?;
    compile_json_schema(&json)
}

/// Compile a schema from a stream of JSON text.
pub fn compile_json_schema_from_reader(mut reader: impl Read) -> Result<SchemaType, SchemaError> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    compile_json_schema_from_str(&input)
}
