//! Schema description: field specs, type shapes, decoders, and defaults.
//!
//! Responsibilities:
//! - Describe a configuration record as an ordered set of named fields.
//! - Represent declared types as an explicit tagged [`Shape`] interpreted by
//!   the converter, instead of ad hoc runtime type inspection.
//! - Carry per-field defaults (value or factory) and decoder metadata.
//!
//! Does NOT handle:
//! - Conversion of raw values (see `convert.rs`).
//! - Source collection or merging (see `sources/` and `loader/`).
//!
//! Invariants:
//! - A built `Schema` is immutable and has at least one field.
//! - Field names are unique and non-empty (validated by `SchemaBuilder::build`).

use std::fmt;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::value::Value;

/// Declared type of a schema field.
///
/// Closed set of variants built once at schema-description time and
/// interpreted by the converter with a single match per recursion step.
#[derive(Debug, Clone)]
pub enum Shape {
    /// Text; non-text raw values are rendered via their string form.
    Str,
    /// Signed integer parsed from the raw value's string form.
    Int,
    /// Floating-point number; integers widen.
    Float,
    /// Flexible boolean (`1/true/yes/on` and `0/false/no/off`).
    Bool,
    /// Filesystem path built from text.
    Path,
    /// Untyped; raw values pass through unchanged.
    Any,
    /// `Optional[inner]`: null or empty-string raw resolves to null.
    Optional(Box<Shape>),
    /// Union of more than one non-null member; always rejected at
    /// conversion time with a label listing the members in declared order.
    Union(Vec<Shape>),
    /// Enumeration matched by member name (case-insensitive) then value.
    Enum(EnumShape),
    /// Secret-wrapped inner shape; the resolved value masks its text form.
    Secret(Box<Shape>),
    /// Decoder metadata applied to the raw value before conversion to
    /// `inner`.
    Decoded {
        /// Decoders applied in declared order.
        decoders: Vec<Decoder>,
        /// Shape the decoded value converts into.
        inner: Box<Shape>,
    },
    /// Homogeneous sequence of `inner` elements.
    List(Box<Shape>),
    /// Homogeneous mapping of key shape to value shape.
    Map(Box<Shape>, Box<Shape>),
}

impl Shape {
    /// `Optional[inner]`.
    pub fn optional(inner: Shape) -> Shape {
        Shape::Optional(Box::new(inner))
    }

    /// `Secret[inner]`.
    pub fn secret(inner: Shape) -> Shape {
        Shape::Secret(Box::new(inner))
    }

    /// `Secret[str]`, the unparameterized secret form.
    pub fn secret_str() -> Shape {
        Shape::secret(Shape::Str)
    }

    /// `list[inner]`.
    pub fn list(inner: Shape) -> Shape {
        Shape::List(Box::new(inner))
    }

    /// `list[str]`, the default element shape.
    pub fn list_str() -> Shape {
        Shape::list(Shape::Str)
    }

    /// `map[key, value]`.
    pub fn map(key: Shape, value: Shape) -> Shape {
        Shape::Map(Box::new(key), Box::new(value))
    }

    /// `map[str, Any]`, the default mapping shapes.
    pub fn map_str_any() -> Shape {
        Shape::map(Shape::Str, Shape::Any)
    }

    /// Enumeration from `(member name, member value)` pairs, in declaration
    /// order.
    pub fn enumeration<N, V>(
        name: impl Into<String>,
        members: impl IntoIterator<Item = (N, V)>,
    ) -> Shape
    where
        N: Into<String>,
        V: Into<String>,
    {
        Shape::Enum(EnumShape {
            name: name.into(),
            members: members
                .into_iter()
                .map(|(n, v)| EnumMember {
                    name: n.into(),
                    value: v.into(),
                })
                .collect(),
        })
    }

    /// A shape pre-processed by a single decoder.
    pub fn decoded(inner: Shape, decoder: Decoder) -> Shape {
        Shape::Decoded {
            decoders: vec![decoder],
            inner: Box::new(inner),
        }
    }

    /// A shape pre-processed by several decoders, applied in order.
    pub fn decoded_many(inner: Shape, decoders: Vec<Decoder>) -> Shape {
        Shape::Decoded {
            decoders,
            inner: Box::new(inner),
        }
    }

    /// Human-readable label used in conversion error messages.
    pub fn label(&self) -> String {
        match self {
            Shape::Str => "str".to_string(),
            Shape::Int => "int".to_string(),
            Shape::Float => "float".to_string(),
            Shape::Bool => "bool".to_string(),
            Shape::Path => "Path".to_string(),
            Shape::Any => "Any".to_string(),
            Shape::Optional(inner) => format!("Optional[{}]", inner.label()),
            Shape::Union(members) => {
                let labels: Vec<String> = members.iter().map(Shape::label).collect();
                format!("Union[{}]", labels.join(", "))
            }
            Shape::Enum(e) => e.name.clone(),
            Shape::Secret(inner) => format!("Secret[{}]", inner.label()),
            Shape::Decoded { inner, .. } => inner.label(),
            Shape::List(inner) => format!("list[{}]", inner.label()),
            Shape::Map(key, value) => format!("map[{}, {}]", key.label(), value.label()),
        }
    }

    /// Whether the declared type is secret-wrapped, looking through optional
    /// and decoder wrappers. Drives provenance masking.
    pub fn is_secret(&self) -> bool {
        match self {
            Shape::Secret(_) => true,
            Shape::Optional(inner) | Shape::Decoded { inner, .. } => inner.is_secret(),
            _ => false,
        }
    }
}

/// An enumeration shape: type name plus members in declaration order.
#[derive(Debug, Clone)]
pub struct EnumShape {
    /// Type name used as the expected-type label in errors.
    pub name: String,
    /// Members in declaration order; first match wins.
    pub members: Vec<EnumMember>,
}

/// One enumeration member.
#[derive(Debug, Clone)]
pub struct EnumMember {
    /// Canonical member name; conversion resolves to this.
    pub name: String,
    /// String form of the member's value.
    pub value: String,
}

type DecoderFn = dyn Fn(&Value) -> Result<Value, String> + Send + Sync;

/// A named pre-processing function applied to a raw value before standard
/// conversion.
#[derive(Clone)]
pub struct Decoder {
    name: String,
    func: Arc<DecoderFn>,
}

impl Decoder {
    /// Register a decoder under a diagnostic name.
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// The decoder's registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Apply the decoder to a raw value.
    pub fn apply(&self, raw: &Value) -> Result<Value, String> {
        (self.func)(raw)
    }
}

impl fmt::Debug for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decoder({})", self.name)
    }
}

/// A field default: either a fixed value or a factory invoked per load.
#[derive(Clone)]
pub enum DefaultValue {
    /// Fixed default value.
    Value(Value),
    /// Factory producing a fresh default per `load` call.
    Factory(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultValue {
    /// Produce the default value.
    pub fn produce(&self) -> Value {
        match self {
            DefaultValue::Value(value) => value.clone(),
            DefaultValue::Factory(factory) => factory(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Value(value) => write!(f, "DefaultValue::Value({value:?})"),
            DefaultValue::Factory(_) => f.write_str("DefaultValue::Factory(..)"),
        }
    }
}

/// One declared field: name, shape, and optional default.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Field name, unique within the schema.
    pub name: String,
    /// Declared type shape.
    pub shape: Shape,
    /// Default used when no collector reports the field.
    pub default: Option<DefaultValue>,
}

/// An ordered, immutable set of named fields.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Start describing a schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder { fields: Vec::new() }
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }
}

/// Builder collecting field declarations in order.
#[derive(Debug)]
pub struct SchemaBuilder {
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    /// Declare a required field.
    pub fn field(mut self, name: impl Into<String>, shape: Shape) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            shape,
            default: None,
        });
        self
    }

    /// Declare a field with a fixed default value.
    pub fn field_with_default(
        mut self,
        name: impl Into<String>,
        shape: Shape,
        default: impl Into<Value>,
    ) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            shape,
            default: Some(DefaultValue::Value(default.into())),
        });
        self
    }

    /// Declare a field with a default factory, invoked once per load.
    pub fn field_with_factory(
        mut self,
        name: impl Into<String>,
        shape: Shape,
        factory: impl Fn() -> Value + Send + Sync + 'static,
    ) -> Self {
        self.fields.push(FieldSpec {
            name: name.into(),
            shape,
            default: Some(DefaultValue::Factory(Arc::new(factory))),
        });
        self
    }

    /// Validate and freeze the schema.
    ///
    /// Duplicate or empty field names are programmer errors and surface as
    /// the generic [`ConfigError::Schema`] kind.
    pub fn build(self) -> Result<Schema, ConfigError> {
        if self.fields.is_empty() {
            return Err(ConfigError::Schema("schema declares no fields".to_string()));
        }
        let mut seen: Vec<&str> = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            if field.name.is_empty() {
                return Err(ConfigError::Schema("field name is empty".to_string()));
            }
            if seen.contains(&field.name.as_str()) {
                return Err(ConfigError::Schema(format!(
                    "duplicate field name '{}'",
                    field.name
                )));
            }
            seen.push(&field.name);
        }
        Ok(Schema {
            fields: self.fields,
        })
    }
}
