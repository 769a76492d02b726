//! The type conversion engine.
//!
//! Responsibilities:
//! - Convert a raw value (usually text from CLI/env/dotenv, or a native TOML
//!   value) into a field's declared [`Shape`], recursing through wrapper
//!   shapes in a fixed order: decoder metadata, optional, enum, secret,
//!   scalars, collections.
//!
//! Does NOT handle:
//! - Source merging or defaults (see `loader/`).
//! - Provenance masking (the loader masks secret provenance).
//!
//! Invariants:
//! - Conversion is idempotent on already-correctly-typed values: a native
//!   TOML bool, an already-wrapped secret, or a canonical enum member name
//!   passes through without string round-tripping.
//! - Failures carry the field name, the expected-type label, the raw value,
//!   and a human-readable reason.

use crate::error::ConfigError;
use crate::schema::{EnumShape, Shape};
use crate::value::{Secret, Value};

const BOOL_TOKENS: &str = "accepted: true/false/1/0/yes/no/on/off";

/// Convert `raw` to `shape` for `field`.
pub fn convert(raw: Value, shape: &Shape, field: &str) -> Result<Value, ConfigError> {
    match shape {
        // Decoders run before any other interpretation of the raw value.
        Shape::Decoded { decoders, inner } => {
            let mut current = raw;
            for decoder in decoders {
                match decoder.apply(&current) {
                    Ok(next) => current = next,
                    Err(reason) => {
                        return Err(ConfigError::Conversion {
                            field: field.to_string(),
                            expected: inner.label(),
                            raw: current,
                            reason: format!("decoder '{}' failed: {reason}", decoder.name()),
                        });
                    }
                }
            }
            convert(current, inner, field)
        }

        Shape::Optional(inner) => {
            if raw.is_null() || matches!(&raw, Value::Str(s) if s.is_empty()) {
                Ok(Value::Null)
            } else {
                convert(raw, inner, field)
            }
        }

        Shape::Union(_) => Err(ConfigError::Conversion {
            field: field.to_string(),
            expected: shape.label(),
            raw,
            reason: "unsupported union form".to_string(),
        }),

        Shape::Enum(members) => convert_enum(raw, members, field),

        Shape::Secret(inner) => match raw {
            Value::Secret(_) => Ok(raw),
            other => Ok(Value::Secret(Secret::new(convert(other, inner, field)?))),
        },

        Shape::Str => match raw {
            Value::Str(_) => Ok(raw),
            other => Ok(Value::Str(other.to_string())),
        },

        Shape::Any => Ok(raw),

        Shape::Int => match raw {
            Value::Int(_) => Ok(raw),
            other => match other.to_string().trim().parse::<i64>() {
                Ok(parsed) => Ok(Value::Int(parsed)),
                Err(e) => Err(ConfigError::Conversion {
                    field: field.to_string(),
                    expected: "int".to_string(),
                    raw: other,
                    reason: e.to_string(),
                }),
            },
        },

        Shape::Float => match raw {
            Value::Float(_) => Ok(raw),
            Value::Int(i) => Ok(Value::Float(i as f64)),
            other => match other.to_string().trim().parse::<f64>() {
                Ok(parsed) => Ok(Value::Float(parsed)),
                Err(e) => Err(ConfigError::Conversion {
                    field: field.to_string(),
                    expected: "float".to_string(),
                    raw: other,
                    reason: e.to_string(),
                }),
            },
        },

        Shape::Bool => match raw {
            Value::Bool(_) => Ok(raw),
            other => {
                let token = other.to_string().trim().to_lowercase();
                match token.as_str() {
                    "1" | "true" | "yes" | "on" => Ok(Value::Bool(true)),
                    "0" | "false" | "no" | "off" => Ok(Value::Bool(false)),
                    _ => Err(ConfigError::Conversion {
                        field: field.to_string(),
                        expected: "bool".to_string(),
                        raw: other,
                        reason: BOOL_TOKENS.to_string(),
                    }),
                }
            }
        },

        Shape::Path => match raw {
            Value::Path(_) => Ok(raw),
            Value::Str(s) => Ok(Value::Path(std::path::PathBuf::from(s))),
            other => Err(ConfigError::Conversion {
                field: field.to_string(),
                expected: "Path".to_string(),
                raw: other,
                reason: "expected a text value".to_string(),
            }),
        },

        Shape::List(inner) => convert_list(raw, inner, shape, field),

        Shape::Map(key, value) => convert_map(raw, key, value, shape, field),
    }
}

fn convert_enum(raw: Value, shape: &EnumShape, field: &str) -> Result<Value, ConfigError> {
    let text = raw.to_string();
    // Member names first, case-insensitively, in declaration order.
    for member in &shape.members {
        if member.name.eq_ignore_ascii_case(&text) {
            return Ok(Value::Str(member.name.clone()));
        }
    }
    // Then the string form of member values.
    for member in &shape.members {
        if member.value == text {
            return Ok(Value::Str(member.name.clone()));
        }
    }
    Err(ConfigError::Conversion {
        field: field.to_string(),
        expected: shape.name.clone(),
        raw,
        reason: "no matching enum member".to_string(),
    })
}

fn convert_list(
    raw: Value,
    inner: &Shape,
    list_shape: &Shape,
    field: &str,
) -> Result<Value, ConfigError> {
    match raw {
        Value::List(items) => items
            .into_iter()
            .map(|item| convert(item, inner, field))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        Value::Str(text) => {
            let trimmed = text.trim();
            if trimmed.starts_with('[') && trimmed.ends_with(']') {
                let parsed: serde_json::Value =
                    serde_json::from_str(trimmed).map_err(|e| ConfigError::Conversion {
                        field: field.to_string(),
                        expected: list_shape.label(),
                        raw: Value::Str(text.clone()),
                        reason: e.to_string(),
                    })?;
                match parsed {
                    serde_json::Value::Array(items) => items
                        .into_iter()
                        .map(|item| convert(Value::from_json(item), inner, field))
                        .collect::<Result<Vec<_>, _>>()
                        .map(Value::List),
                    _ => Err(ConfigError::Conversion {
                        field: field.to_string(),
                        expected: list_shape.label(),
                        raw: Value::Str(text),
                        reason: "expected a JSON array".to_string(),
                    }),
                }
            } else {
                // Single-row CSV fallback; quoting keeps the delimiter usable
                // inside elements.
                split_csv_row(&text)
                    .into_iter()
                    .map(|cell| convert(Value::Str(cell), inner, field))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List)
            }
        }
        other => Err(ConfigError::Conversion {
            field: field.to_string(),
            expected: list_shape.label(),
            raw: other,
            reason: "cannot convert to a list".to_string(),
        }),
    }
}

fn convert_map(
    raw: Value,
    key_shape: &Shape,
    value_shape: &Shape,
    map_shape: &Shape,
    field: &str,
) -> Result<Value, ConfigError> {
    match raw {
        Value::Map(pairs) => pairs
            .into_iter()
            .map(|(k, v)| {
                Ok((
                    convert(k, key_shape, field)?,
                    convert(v, value_shape, field)?,
                ))
            })
            .collect::<Result<Vec<_>, ConfigError>>()
            .map(Value::Map),
        Value::Str(text) => {
            let trimmed = text.trim();
            if trimmed.starts_with('{') && trimmed.ends_with('}') {
                let parsed: serde_json::Value =
                    serde_json::from_str(trimmed).map_err(|e| ConfigError::Conversion {
                        field: field.to_string(),
                        expected: map_shape.label(),
                        raw: Value::Str(text.clone()),
                        reason: e.to_string(),
                    })?;
                match parsed {
                    serde_json::Value::Object(entries) => entries
                        .into_iter()
                        .map(|(k, v)| {
                            Ok((
                                convert(Value::Str(k), key_shape, field)?,
                                convert(Value::from_json(v), value_shape, field)?,
                            ))
                        })
                        .collect::<Result<Vec<_>, ConfigError>>()
                        .map(Value::Map),
                    _ => Err(ConfigError::Conversion {
                        field: field.to_string(),
                        expected: map_shape.label(),
                        raw: Value::Str(text),
                        reason: "expected a JSON object".to_string(),
                    }),
                }
            } else {
                let mut pairs = Vec::new();
                for cell in split_csv_row(&text) {
                    let split = cell.split_once('=').or_else(|| cell.split_once(':'));
                    match split {
                        Some((k, v)) => pairs.push((
                            convert(Value::Str(k.trim().to_string()), key_shape, field)?,
                            convert(Value::Str(v.trim().to_string()), value_shape, field)?,
                        )),
                        None => {
                            tracing::warn!(
                                field,
                                token = %cell,
                                "dropping map token without '=' or ':'"
                            );
                        }
                    }
                }
                Ok(Value::Map(pairs))
            }
        }
        other => Err(ConfigError::Conversion {
            field: field.to_string(),
            expected: map_shape.label(),
            raw: other,
            reason: "cannot convert to a map".to_string(),
        }),
    }
}

/// Parse one CSV row, honoring double-quoted cells.
fn split_csv_row(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    match reader.records().next() {
        Some(Ok(record)) => record.iter().map(str::to_string).collect(),
        _ => Vec::new(),
    }
}
