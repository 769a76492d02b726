//! Environment variable collector.
//!
//! Operates on an explicit point-in-time snapshot of key/value pairs rather
//! than the process-global environment store, which keeps the core free of
//! global state and tests deterministic. `from_process` captures the real
//! environment once at construction.

use std::collections::BTreeMap;

use super::{Candidates, Collector};
use crate::error::ConfigError;
use crate::provenance::{Provenance, SourceKind};
use crate::schema::FieldSpec;
use crate::value::Value;

/// Collector over an environment snapshot, with an optional name prefix.
pub struct EnvVars {
    prefix: String,
    snapshot: BTreeMap<String, String>,
}

impl EnvVars {
    /// Snapshot the process environment at this moment.
    pub fn from_process() -> Self {
        Self {
            prefix: String::new(),
            snapshot: std::env::vars().collect(),
        }
    }

    /// Build from an explicit key/value snapshot.
    pub fn from_snapshot<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            prefix: String::new(),
            snapshot: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Require a prefix before uppercased field names, e.g. `APP_`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

impl Collector for EnvVars {
    fn kind(&self) -> SourceKind {
        SourceKind::Env
    }

    fn collect(&self, fields: &[FieldSpec]) -> Result<Candidates, ConfigError> {
        let mut out = Candidates::new();
        for field in fields {
            let env_name = format!("{}{}", self.prefix, field.name.to_uppercase());
            if let Some(raw) = self.snapshot.get(&env_name) {
                out.insert(
                    field.name.clone(),
                    (
                        Value::Str(raw.clone()),
                        Provenance::new(
                            SourceKind::Env,
                            Some(env_name),
                            Value::Str(raw.clone()),
                        ),
                    ),
                );
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Schema, Shape};
    use serial_test::serial;

    fn fields() -> Vec<FieldSpec> {
        Schema::builder()
            .field("workers", Shape::Int)
            .field("optional_name", Shape::optional(Shape::Str))
            .build()
            .unwrap()
            .fields()
            .to_vec()
    }

    #[test]
    fn test_snapshot_lookup_uses_uppercased_names() {
        let source = EnvVars::from_snapshot([("WORKERS", "10")]);
        let collected = source.collect(&fields()).unwrap();
        let (raw, prov) = &collected["workers"];
        assert_eq!(raw, &Value::Str("10".to_string()));
        assert_eq!(prov.kind, SourceKind::Env);
        assert_eq!(prov.path.as_deref(), Some("WORKERS"));
        assert!(!collected.contains_key("optional_name"));
    }

    #[test]
    fn test_prefix_is_prepended() {
        let source = EnvVars::from_snapshot([("APP_WORKERS", "9"), ("WORKERS", "1")])
            .with_prefix("APP_");
        let collected = source.collect(&fields()).unwrap();
        assert_eq!(collected["workers"].0, Value::Str("9".to_string()));
        assert_eq!(collected["workers"].1.path.as_deref(), Some("APP_WORKERS"));
    }

    #[test]
    fn test_present_but_empty_variable_still_reports_a_candidate() {
        let source = EnvVars::from_snapshot([("OPTIONAL_NAME", "")]);
        let collected = source.collect(&fields()).unwrap();
        assert_eq!(collected["optional_name"].0, Value::Str(String::new()));
    }

    #[test]
    #[serial]
    fn test_from_process_captures_a_snapshot() {
        temp_env::with_vars([("WORKERS", Some("6"))], || {
            let source = EnvVars::from_process();
            let collected = source.collect(&fields()).unwrap();
            assert_eq!(collected["workers"].0, Value::Str("6".to_string()));
        });
    }
}
