//! Structured config file collector (TOML).
//!
//! Matches only top-level keys equal to schema field names. Native TOML
//! values are ingested without string round-tripping, so a TOML boolean or
//! integer reaches the converter already typed.

use std::path::PathBuf;

use super::{Candidates, Collector};
use crate::error::ConfigError;
use crate::provenance::{Provenance, SourceKind};
use crate::schema::FieldSpec;
use crate::value::Value;

/// Collector over a TOML document.
pub struct ConfigFile {
    path: PathBuf,
}

impl ConfigFile {
    /// Point at a TOML file; the file is read per `collect` call.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Collector for ConfigFile {
    fn kind(&self) -> SourceKind {
        SourceKind::File
    }

    fn collect(&self, fields: &[FieldSpec]) -> Result<Candidates, ConfigError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "config file absent, no candidates");
            return Ok(Candidates::new());
        }
        let text = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::Source {
            path: self.path.clone(),
            message: format!("failed to read TOML file: {e}"),
        })?;
        let table: toml::Table = text.parse().map_err(|e| ConfigError::Source {
            path: self.path.clone(),
            message: format!("failed to parse TOML: {e}"),
        })?;

        let mut out = Candidates::new();
        for field in fields {
            if let Some(raw) = table.get(&field.name) {
                let value = Value::from_toml(raw.clone());
                out.insert(
                    field.name.clone(),
                    (
                        value.clone(),
                        Provenance::new(
                            SourceKind::File,
                            Some(self.path.display().to_string()),
                            value,
                        ),
                    ),
                );
            }
        }
        Ok(out)
    }
}
