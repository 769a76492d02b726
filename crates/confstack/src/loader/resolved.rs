//! The resolved configuration instance and its provenance map.

use std::collections::BTreeMap;

use crate::provenance::Provenance;
use crate::value::Value;

/// A fully resolved configuration: every schema field populated, each with
/// exactly one provenance entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    values: BTreeMap<String, Value>,
    provenance: BTreeMap<String, Provenance>,
}

impl Resolved {
    pub(crate) fn new(
        values: BTreeMap<String, Value>,
        provenance: BTreeMap<String, Provenance>,
    ) -> Self {
        Self { values, provenance }
    }

    /// The typed value of a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Text value of a field.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Integer value of a field.
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(Value::as_i64)
    }

    /// Float value of a field; integers widen.
    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(Value::as_f64)
    }

    /// Boolean value of a field.
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(Value::as_bool)
    }

    /// Path value of a field.
    pub fn get_path(&self, field: &str) -> Option<&std::path::Path> {
        self.get(field).and_then(Value::as_path)
    }

    /// List elements of a field.
    pub fn get_list(&self, field: &str) -> Option<&[Value]> {
        self.get(field).and_then(Value::as_list)
    }

    /// Unmasked inner value of a secret-wrapped field.
    pub fn reveal(&self, field: &str) -> Option<&Value> {
        self.get(field)
            .and_then(Value::as_secret)
            .map(|secret| secret.reveal())
    }

    /// Provenance of one field.
    pub fn provenance(&self, field: &str) -> Option<&Provenance> {
        self.provenance.get(field)
    }

    /// The whole provenance map, keyed by field name.
    pub fn provenance_map(&self) -> &BTreeMap<String, Provenance> {
        &self.provenance
    }

    /// Iterate resolved fields.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// JSON report of resolved values and provenance for debugging.
    ///
    /// Secrets appear as the mask token in both halves of the report.
    pub fn dump(&self) -> serde_json::Value {
        let mut root = serde_json::Map::new();
        root.insert(
            "values".to_string(),
            serde_json::to_value(&self.values).unwrap_or(serde_json::Value::Null),
        );
        root.insert(
            "provenance".to_string(),
            serde_json::to_value(&self.provenance).unwrap_or(serde_json::Value::Null),
        );
        serde_json::Value::Object(root)
    }
}
