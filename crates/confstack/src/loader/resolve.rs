//! Resolution algorithm: merge collectors, convert, apply defaults.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use super::resolved::Resolved;
use crate::convert::convert;
use crate::error::ConfigError;
use crate::provenance::{Provenance, SourceKind};
use crate::schema::Schema;
use crate::sources::{Collector, ConfigFile, DotenvFile, EnvVars};
use crate::value::{MASK, Secret, Value};

/// Builder-style resolver over an ordered list of sources.
///
/// Sources are consulted in the order they are added; the first source
/// reporting a field wins. An empty source list resolves every field from
/// its default or fails with a missing-value error.
pub struct Loader<'a> {
    schema: &'a Schema,
    sources: Vec<Box<dyn Collector>>,
}

impl<'a> Loader<'a> {
    /// Start resolving `schema` with no sources.
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            sources: Vec::new(),
        }
    }

    /// Append a source; earlier sources take precedence.
    pub fn with_source(mut self, source: impl Collector + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Append an already-boxed source.
    pub fn with_boxed_source(mut self, source: Box<dyn Collector>) -> Self {
        self.sources.push(source);
        self
    }

    /// Resolve the schema against the configured sources.
    pub fn load(self) -> Result<Resolved, ConfigError> {
        resolve(self.schema, self.sources)
    }
}

/// Resolve `schema` against an explicit ordered source list.
pub fn load(schema: &Schema, sources: Vec<Box<dyn Collector>>) -> Result<Resolved, ConfigError> {
    resolve(schema, sources)
}

/// Resolve `schema` against the default source ordering: process
/// environment, then a `.env` dotenv file, then a `config.toml` file.
pub fn load_default(schema: &Schema) -> Result<Resolved, ConfigError> {
    resolve(
        schema,
        vec![
            Box::new(EnvVars::from_process()),
            Box::new(DotenvFile::new(".env")),
            Box::new(ConfigFile::new("config.toml")),
        ],
    )
}

fn resolve(schema: &Schema, sources: Vec<Box<dyn Collector>>) -> Result<Resolved, ConfigError> {
    if schema.fields().is_empty() {
        return Err(ConfigError::Schema("schema declares no fields".to_string()));
    }

    // Merge phase: each collector runs exactly once, first reporter of a
    // field wins.
    let mut merged: BTreeMap<String, (Value, Provenance)> = BTreeMap::new();
    let mut checked: Vec<String> = Vec::with_capacity(sources.len());
    for source in &sources {
        checked.push(source.kind().to_string());
        let candidates = source.collect(schema.fields())?;
        for (name, candidate) in candidates {
            match merged.entry(name) {
                Entry::Vacant(slot) => {
                    slot.insert(candidate);
                }
                Entry::Occupied(slot) => {
                    tracing::debug!(
                        field = %slot.key(),
                        kind = %source.kind(),
                        "ignoring candidate shadowed by an earlier source"
                    );
                }
            }
        }
    }
    tracing::debug!(
        candidates = merged.len(),
        sources = checked.len(),
        "merged source candidates"
    );

    let mut values: BTreeMap<String, Value> = BTreeMap::new();
    let mut provenance: BTreeMap<String, Provenance> = BTreeMap::new();
    for field in schema.fields() {
        match merged.remove(&field.name) {
            Some((raw, info)) => {
                let is_secret = field.shape.is_secret();
                let info = masked(info, is_secret);
                match convert(raw, &field.shape, &field.name) {
                    Ok(value) => {
                        values.insert(field.name.clone(), value);
                        provenance.insert(field.name.clone(), info);
                    }
                    Err(err) => {
                        // Record provenance for diagnostics before the load
                        // aborts.
                        tracing::debug!(
                            field = %field.name,
                            kind = %info.kind,
                            path = info.path.as_deref().unwrap_or(""),
                            "conversion failed, aborting load"
                        );
                        provenance.insert(field.name.clone(), info);
                        return Err(masked_error(err, is_secret));
                    }
                }
            }
            None => match &field.default {
                Some(default) => {
                    let mut value = default.produce();
                    // A plain default for a secret-shaped field gets wrapped,
                    // so its textual form is the mask token like any other
                    // resolved secret. Null stays null for optional secrets.
                    if field.shape.is_secret() && !matches!(value, Value::Secret(_) | Value::Null) {
                        value = Value::Secret(Secret::new(value));
                    }
                    let raw_value = if field.shape.is_secret() {
                        Value::Str(MASK.to_string())
                    } else {
                        value.clone()
                    };
                    provenance.insert(
                        field.name.clone(),
                        Provenance::new(SourceKind::Default, None, raw_value),
                    );
                    values.insert(field.name.clone(), value);
                }
                None => {
                    return Err(ConfigError::MissingValue {
                        field: field.name.clone(),
                        checked,
                    });
                }
            },
        }
    }

    Ok(Resolved::new(values, provenance))
}

/// Replace the provenance raw value with the mask token for secret-shaped
/// fields; the real secret must never be reachable through provenance.
fn masked(mut info: Provenance, is_secret: bool) -> Provenance {
    if is_secret {
        info.raw_value = Value::Str(MASK.to_string());
    }
    info
}

/// Mask the raw value carried by a conversion error for secret-shaped
/// fields; error messages must never leak the real secret either.
fn masked_error(err: ConfigError, is_secret: bool) -> ConfigError {
    match err {
        ConfigError::Conversion {
            field,
            expected,
            reason,
            ..
        } if is_secret => ConfigError::Conversion {
            field,
            expected,
            raw: Value::Str(MASK.to_string()),
            reason,
        },
        other => other,
    }
}
