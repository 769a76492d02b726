//! Dynamic configuration values and the secret wrapper.
//!
//! `Value` is the common currency of the crate: collectors report raw values
//! (usually `Str`, but native TOML values stay typed), the converter produces
//! typed values, and provenance records carry the pre-conversion raw value.

use std::fmt;
use std::path::PathBuf;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Fixed mask token used everywhere a secret's textual form could leak.
pub const MASK: &str = "***";

/// A dynamically-typed configuration value.
///
/// Maps are represented as ordered key/value pairs rather than a hash map so
/// that converted keys may be of any shape and source order is preserved.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value, produced by optional fields given null or empty input.
    Null,
    /// Text.
    Str(String),
    /// Signed integer.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Filesystem path.
    Path(PathBuf),
    /// Homogeneous sequence.
    List(Vec<Value>),
    /// Ordered key/value pairs.
    Map(Vec<(Value, Value)>),
    /// Secret-wrapped value; textual form is always the mask token.
    Secret(Secret),
}

impl Value {
    /// Ingest a native TOML value without string round-tripping.
    pub fn from_toml(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Value::Str(s),
            toml::Value::Integer(i) => Value::Int(i),
            toml::Value::Float(x) => Value::Float(x),
            toml::Value::Boolean(b) => Value::Bool(b),
            toml::Value::Datetime(dt) => Value::Str(dt.to_string()),
            toml::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_toml).collect())
            }
            toml::Value::Table(table) => Value::Map(
                table
                    .into_iter()
                    .map(|(k, v)| (Value::Str(k), Value::from_toml(v)))
                    .collect(),
            ),
        }
    }

    /// Ingest a parsed JSON value.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Value::Int)
                .or_else(|| n.as_f64().map(Value::Float))
                .unwrap_or_else(|| Value::Str(n.to_string())),
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (Value::Str(k), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Returns true for `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the inner text, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Inner integer, if this is an `Int`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Inner float; integers widen.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Inner boolean, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Inner path, if this is a `Path`.
    pub fn as_path(&self) -> Option<&std::path::Path> {
        match self {
            Value::Path(p) => Some(p),
            _ => None,
        }
    }

    /// Inner elements, if this is a `List`.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Inner entries, if this is a `Map`.
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Inner secret wrapper, if this is a `Secret`.
    pub fn as_secret(&self) -> Option<&Secret> {
        match self {
            Value::Secret(secret) => Some(secret),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// The string form used by the converter. Secrets always render as the
    /// mask token; null renders as the empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Str(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Path(p) => write!(f, "{}", p.display()),
            Value::Secret(_) => f.write_str(MASK),
            Value::List(_) | Value::Map(_) => match serde_json::to_string(self) {
                Ok(rendered) => f.write_str(&rendered),
                Err(_) => f.write_str("<opaque>"),
            },
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Path(p) => serializer.serialize_str(&p.display().to_string()),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (key, value) in pairs {
                    let key = match key {
                        Value::Str(s) => s.clone(),
                        other => other.to_string(),
                    };
                    map.serialize_entry(&key, value)?;
                }
                map.end()
            }
            // Secrets never serialize their inner value.
            Value::Secret(_) => serializer.serialize_str(MASK),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<PathBuf> for Value {
    fn from(p: PathBuf) -> Self {
        Value::Path(p)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// Opaque holder masking a value's textual representation.
///
/// Equality compares inner values; the real value is only reachable through
/// [`Secret::reveal`].
#[derive(Clone)]
pub struct Secret {
    inner: Box<Value>,
}

impl Secret {
    /// Wrap a value.
    pub fn new(value: Value) -> Self {
        Self {
            inner: Box::new(value),
        }
    }

    /// Explicit accessor for the unmasked inner value.
    pub fn reveal(&self) -> &Value {
        &self.inner
    }

    /// Consume the wrapper, returning the inner value.
    pub fn into_inner(self) -> Value {
        *self.inner
    }
}

impl PartialEq for Secret {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({MASK})")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK)
    }
}
