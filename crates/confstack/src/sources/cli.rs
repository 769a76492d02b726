//! CLI override collector.
//!
//! Token forms: `--key=value`, `key=value`, `key:value`. Dotted names keep
//! the last segment (`section.key=value` reports `key`). The first
//! occurrence of a key wins within this collector.

use std::collections::BTreeMap;

use super::{Candidates, Collector};
use crate::error::ConfigError;
use crate::provenance::{Provenance, SourceKind};
use crate::schema::FieldSpec;
use crate::value::Value;

/// Collector over a captured list of CLI tokens.
pub struct CliArgs {
    parsed: BTreeMap<String, String>,
}

impl CliArgs {
    /// Capture and parse tokens once, for deterministic behavior.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = BTreeMap::new();
        for arg in args {
            let arg: String = arg.into();
            let stripped = arg.strip_prefix("--").unwrap_or(&arg);
            let (name, value) = if let Some(pair) = stripped.split_once('=') {
                pair
            } else if let Some(pair) = stripped.split_once(':') {
                pair
            } else {
                continue;
            };
            // section.key -> key
            let key = name.rsplit('.').next().unwrap_or(name).trim();
            if !key.is_empty() && !parsed.contains_key(key) {
                parsed.insert(key.to_string(), value.to_string());
            }
        }
        Self { parsed }
    }

    /// Capture the current process arguments (skipping the program name).
    pub fn from_process() -> Self {
        Self::new(std::env::args().skip(1))
    }
}

impl Collector for CliArgs {
    fn kind(&self) -> SourceKind {
        SourceKind::Cli
    }

    fn collect(&self, fields: &[FieldSpec]) -> Result<Candidates, ConfigError> {
        let mut out = Candidates::new();
        for field in fields {
            // Match case-insensitively via the exact, lower, and upper forms.
            for candidate in [
                field.name.clone(),
                field.name.to_lowercase(),
                field.name.to_uppercase(),
            ] {
                if let Some(raw) = self.parsed.get(&candidate) {
                    out.insert(
                        field.name.clone(),
                        (
                            Value::Str(raw.clone()),
                            Provenance::new(
                                SourceKind::Cli,
                                Some(format!("--{candidate}")),
                                Value::Str(raw.clone()),
                            ),
                        ),
                    );
                    break;
                }
            }
        }
        Ok(out)
    }
}
