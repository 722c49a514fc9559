//! # Schema Descriptor
//!
//! Read-only description of Avro-style types: primitives, named types
//! (`record`, `enum`, `fixed`), and the composites built over them
//! (`array`, `map`, `union`).
//!
//! ## Ownership
//!
//! Named types sit behind `Arc` and are shared, never copied, by every
//! `SchemaType` that refers to them. A record that refers to itself (a
//! linked list node, a tree) cannot own itself, so the reference inside
//! is a [`RecursiveRef`]: the referenced full name plus a weak, set-once
//! link that the schema compiler binds after the record is complete.
//!
//! ## Names
//!
//! A [`Name`] is a short name plus optional namespace. A name containing
//! a dot is already fully qualified and carries its own namespace.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

/// A possibly namespaced type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Name {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
}

impl Name {
    /// Build a name in an optional namespace.
    ///
    /// When `name` contains a dot, everything before the last dot is the
    /// namespace and the `namespace` argument is ignored. An empty
    /// namespace is the same as none.
    pub fn new(name: &str, namespace: Option<&str>) -> Self {
        match name.rsplit_once('.') {
            Some((ns, short)) => Self {
                name: short.to_string(),
                namespace: (!ns.is_empty()).then(|| ns.to_string()),
            },
            None => Self {
                name: name.to_string(),
                namespace: namespace.filter(|ns| !ns.is_empty()).map(str::to_string),
            },
        }
    }

    /// The unqualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The namespace, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// The fully qualified name: `namespace.name`, or `name` alone.
    pub fn fullname(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{ns}.{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// One field of a record schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    name: String,
    #[serde(rename = "type")]
    ty: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    doc: Option<String>,
}

impl Field {
    /// A field without documentation.
    pub fn new(name: impl Into<String>, ty: SchemaType) -> Self {
        Self {
            name: name.into(),
            ty,
            doc: None,
        }
    }

    /// Attach a doc string.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &SchemaType {
        &self.ty
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }
}

/// A `record` (or `error`) type: a name plus an ordered field list.
///
/// Field names are not checked for uniqueness here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    name: Name,
    doc: Option<String>,
    fields: Vec<Field>,
    is_error: bool,
}

impl RecordSchema {
    pub fn new(name: Name, fields: Vec<Field>) -> Self {
        Self {
            name,
            doc: None,
            fields,
            is_error: false,
        }
    }

    /// Attach a doc string.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Mark this record as an Avro `error` type.
    pub fn into_error(mut self) -> Self {
        self.is_error = true;
        self
    }

    /// The unqualified record name.
    pub fn name(&self) -> &str {
        self.name.name()
    }

    pub fn qualified_name(&self) -> &Name {
        &self.name
    }

    pub fn fullname(&self) -> String {
        self.name.fullname()
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }
}

/// An `enum` type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSchema {
    name: Name,
    doc: Option<String>,
    symbols: Vec<String>,
}

impl EnumSchema {
    pub fn new(name: Name, symbols: Vec<String>) -> Self {
        Self {
            name,
            doc: None,
            symbols,
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn qualified_name(&self) -> &Name {
        &self.name
    }

    pub fn fullname(&self) -> String {
        self.name.fullname()
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }
}

/// A `fixed` type: a named byte string of exact length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedSchema {
    name: Name,
    size: usize,
}

impl FixedSchema {
    pub fn new(name: Name, size: usize) -> Self {
        Self { name, size }
    }

    pub fn qualified_name(&self) -> &Name {
        &self.name
    }

    pub fn fullname(&self) -> String {
        self.name.fullname()
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

/// A reference to a record from inside its own definition.
///
/// Clones share the same link, so binding one binds them all. Equality
/// and `Debug` use the full name only.
#[derive(Clone)]
pub struct RecursiveRef {
    fullname: String,
    target: Arc<OnceLock<Weak<RecordSchema>>>,
}

impl RecursiveRef {
    /// An unbound reference to the record called `fullname`.
    pub fn pending(fullname: impl Into<String>) -> Self {
        Self {
            fullname: fullname.into(),
            target: Arc::new(OnceLock::new()),
        }
    }

    /// Link this reference (and all its clones) to `record`.
    ///
    /// Returns false if the reference was already bound.
    pub fn bind(&self, record: &Arc<RecordSchema>) -> bool {
        self.target.set(Arc::downgrade(record)).is_ok()
    }

    /// The referenced record, or `None` if unbound or already dropped.
    pub fn resolve(&self) -> Option<Arc<RecordSchema>> {
        self.target.get().and_then(Weak::upgrade)
    }

    pub fn fullname(&self) -> &str {
        &self.fullname
    }
}

impl PartialEq for RecursiveRef {
    fn eq(&self, other: &Self) -> bool {
        self.fullname == other.fullname
    }
}

impl Eq for RecursiveRef {}

impl fmt::Debug for RecursiveRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecursiveRef").field(&self.fullname).finish()
    }
}

/// Any schema type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaType {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    Record(Arc<RecordSchema>),
    Enum(Arc<EnumSchema>),
    Fixed(Arc<FixedSchema>),
    Array(Box<SchemaType>),
    Map(Box<SchemaType>),
    Union(Vec<SchemaType>),
    /// A record referenced from within its own definition.
    Recursive(RecursiveRef),
}

impl SchemaType {
    /// The primitive type for an Avro primitive type name.
    pub fn primitive(name: &str) -> Option<Self> {
        let ty = match name {
            "null" => SchemaType::Null,
            "boolean" => SchemaType::Boolean,
            "int" => SchemaType::Int,
            "long" => SchemaType::Long,
            "float" => SchemaType::Float,
            "double" => SchemaType::Double,
            "bytes" => SchemaType::Bytes,
            "string" => SchemaType::String,
            _ => return None,
        };
        Some(ty)
    }

    /// The Avro type keyword (`"int"`, `"record"`, `"union"`, ...).
    pub fn type_name(&self) -> &'static str {
        match self {
            SchemaType::Null => "null",
            SchemaType::Boolean => "boolean",
            SchemaType::Int => "int",
            SchemaType::Long => "long",
            SchemaType::Float => "float",
            SchemaType::Double => "double",
            SchemaType::Bytes => "bytes",
            SchemaType::String => "string",
            SchemaType::Record(r) if r.is_error() => "error",
            SchemaType::Record(_) | SchemaType::Recursive(_) => "record",
            SchemaType::Enum(_) => "enum",
            SchemaType::Fixed(_) => "fixed",
            SchemaType::Array(_) => "array",
            SchemaType::Map(_) => "map",
            SchemaType::Union(_) => "union",
        }
    }

    /// The full name of a named type, `None` for anonymous types.
    pub fn fullname(&self) -> Option<String> {
        match self {
            SchemaType::Record(r) => Some(r.fullname()),
            SchemaType::Enum(e) => Some(e.fullname()),
            SchemaType::Fixed(x) => Some(x.fullname()),
            SchemaType::Recursive(r) => Some(r.fullname().to_string()),
            _ => None,
        }
    }

    /// The record schema, if this is a record.
    pub fn as_record(&self) -> Option<&Arc<RecordSchema>> {
        match self {
            SchemaType::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Render the Avro JSON form of this schema.
    ///
    /// Each named type is written in full at its first occurrence and by
    /// full name after that.
    pub fn to_json(&self) -> Value {
        let mut seen = HashSet::new();
        self.to_json_with(&mut seen)
    }

    fn to_json_with(&self, seen: &mut HashSet<String>) -> Value {
        match self {
            SchemaType::Record(r) => {
                if !seen.insert(r.fullname()) {
                    return Value::String(r.fullname());
                }
                let mut obj = named_json(self.type_name(), r.qualified_name());
                if let Some(doc) = r.doc() {
                    obj.insert("doc".into(), Value::String(doc.to_string()));
                }
                let fields = r
                    .fields()
                    .iter()
                    .map(|f| {
                        let mut fo = Map::new();
                        fo.insert("name".into(), Value::String(f.name().to_string()));
                        fo.insert("type".into(), f.field_type().to_json_with(seen));
                        if let Some(doc) = f.doc() {
                            fo.insert("doc".into(), Value::String(doc.to_string()));
                        }
                        Value::Object(fo)
                    })
                    .collect();
                obj.insert("fields".into(), Value::Array(fields));
                Value::Object(obj)
            }
            SchemaType::Enum(e) => {
                if !seen.insert(e.fullname()) {
                    return Value::String(e.fullname());
                }
                let mut obj = named_json("enum", e.qualified_name());
                if let Some(doc) = e.doc() {
                    obj.insert("doc".into(), Value::String(doc.to_string()));
                }
                obj.insert("symbols".into(), json!(e.symbols()));
                Value::Object(obj)
            }
            SchemaType::Fixed(x) => {
                if !seen.insert(x.fullname()) {
                    return Value::String(x.fullname());
                }
                let mut obj = named_json("fixed", x.qualified_name());
                obj.insert("size".into(), json!(x.size()));
                Value::Object(obj)
            }
            SchemaType::Recursive(r) => Value::String(r.fullname().to_string()),
            SchemaType::Array(items) => json!({
                "type": "array",
                "items": items.to_json_with(seen),
            }),
            SchemaType::Map(values) => json!({
                "type": "map",
                "values": values.to_json_with(seen),
            }),
            SchemaType::Union(branches) => {
                Value::Array(branches.iter().map(|b| b.to_json_with(seen)).collect())
            }
            primitive => Value::String(primitive.type_name().to_string()),
        }
    }
}

fn named_json(type_name: &str, name: &Name) -> Map<String, Value> {
    let mut obj = Map::new();
    obj.insert("type".into(), Value::String(type_name.to_string()));
    obj.insert("name".into(), Value::String(name.name().to_string()));
    if let Some(ns) = name.namespace() {
        obj.insert("namespace".into(), Value::String(ns.to_string()));
    }
    obj
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Serialize for SchemaType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
