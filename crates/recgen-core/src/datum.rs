//! # Runtime Values
//!
//! `Datum` is the dynamic value stored in generated record instances and
//! checked by the validation contract. It is deliberately loosely typed:
//! a single integer kind serves both `int` and `long`, and the schema, not
//! the value, decides which range applies.
//!
//! Record values are represented as [`Datum::Map`] keyed by field name, so
//! a nested record can be written into a record-typed field without the
//! core crate knowing about generated types.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

/// A dynamically typed runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    /// The null value.
    Null,
    /// A boolean.
    Boolean(bool),
    /// An integer. Range checks against `int`/`long` happen at validation time.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A UTF-8 string. Also the representation of enum symbols.
    String(String),
    /// Raw bytes. Also the representation of `fixed` values.
    Bytes(Vec<u8>),
    /// A sequence of values.
    Array(Vec<Datum>),
    /// String-keyed values. Also the representation of record values.
    Map(BTreeMap<String, Datum>),
}

impl Datum {
    /// Short name of the value's kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Datum::Null => "null",
            Datum::Boolean(_) => "boolean",
            Datum::Int(_) => "integer",
            Datum::Float(_) => "float",
            Datum::String(_) => "string",
            Datum::Bytes(_) => "bytes",
            Datum::Array(_) => "array",
            Datum::Map(_) => "map",
        }
    }

    /// Returns true for [`Datum::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    /// Borrow the inner string, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Datum::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the inner map, if this is a map.
    pub fn as_map(&self) -> Option<&BTreeMap<String, Datum>> {
        match self {
            Datum::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Convert to a JSON value.
    ///
    /// Bytes become a string with one character per byte (code points
    /// 0-255), which is how Avro's JSON encoding carries binary data.
    /// Non-finite floats have no JSON form and become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            Datum::Null => Value::Null,
            Datum::Boolean(b) => Value::Bool(*b),
            Datum::Int(n) => Value::from(*n),
            Datum::Float(x) => serde_json::Number::from_f64(*x)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Datum::String(s) => Value::String(s.clone()),
            Datum::Bytes(b) => Value::String(b.iter().map(|&c| char::from(c)).collect()),
            Datum::Array(items) => Value::Array(items.iter().map(Datum::to_json).collect()),
            Datum::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for Datum {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Datum::Null,
            Value::Bool(b) => Datum::Boolean(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Datum::Int(i),
                // u64 beyond i64::MAX or a true float.
                None => Datum::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Datum::String(s),
            Value::Array(items) => Datum::Array(items.into_iter().map(Datum::from).collect()),
            Value::Object(map) => {
                Datum::Map(map.into_iter().map(|(k, v)| (k, Datum::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Datum {
    fn from(b: bool) -> Self {
        Datum::Boolean(b)
    }
}

impl From<i32> for Datum {
    fn from(n: i32) -> Self {
        Datum::Int(i64::from(n))
    }
}

impl From<i64> for Datum {
    fn from(n: i64) -> Self {
        Datum::Int(n)
    }
}

impl From<f64> for Datum {
    fn from(x: f64) -> Self {
        Datum::Float(x)
    }
}

impl From<&str> for Datum {
    fn from(s: &str) -> Self {
        Datum::String(s.to_string())
    }
}

impl From<String> for Datum {
    fn from(s: String) -> Self {
        Datum::String(s)
    }
}

impl From<Vec<u8>> for Datum {
    fn from(b: Vec<u8>) -> Self {
        Datum::Bytes(b)
    }
}

impl From<Vec<Datum>> for Datum {
    fn from(items: Vec<Datum>) -> Self {
        Datum::Array(items)
    }
}

impl From<BTreeMap<String, Datum>> for Datum {
    fn from(entries: BTreeMap<String, Datum>) -> Self {
        Datum::Map(entries)
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Null => write!(f, "null"),
            Datum::Boolean(b) => write!(f, "{b}"),
            Datum::Int(n) => write!(f, "{n}"),
            Datum::Float(x) => write!(f, "{x:?}"),
            Datum::String(s) => write!(f, "{}", Value::String(s.clone())),
            Datum::Bytes(b) => write!(f, "b\"{}\"", b.escape_ascii()),
            Datum::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Datum::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {v}", Value::String(k.clone()))?;
                }
                write!(f, "}}")
            }
        }
    }
}
