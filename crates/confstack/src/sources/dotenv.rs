//! Dotenv file collector.
//!
//! Responsibilities:
//! - Parse `key=value` lines: blank lines and `#` comment lines are skipped,
//!   a leading `export ` token is stripped, inline `#` comments are cut off,
//!   matching single or double quotes around values are removed, and lines
//!   without `=` are ignored. A later duplicate key wins within the file.
//! - Match schema fields against the prefixed-uppercase, bare-uppercase,
//!   exact-case, and lowercase name variants, in that order.
//!
//! Invariants:
//! - A missing file contributes no candidates; an unreadable existing file
//!   is a `ConfigError::Source`.
//! - Provenance paths take the form `<file>:<matched-key>`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::{Candidates, Collector};
use crate::error::ConfigError;
use crate::provenance::{Provenance, SourceKind};
use crate::schema::FieldSpec;
use crate::value::Value;

/// Collector over a dotenv-style file, with an optional name prefix.
pub struct DotenvFile {
    path: PathBuf,
    prefix: String,
}

impl DotenvFile {
    /// Point at a dotenv file; the file is read per `collect` call.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            prefix: String::new(),
        }
    }

    /// Search a prefixed variant alongside the bare name forms.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

impl Collector for DotenvFile {
    fn kind(&self) -> SourceKind {
        SourceKind::Dotenv
    }

    fn collect(&self, fields: &[FieldSpec]) -> Result<Candidates, ConfigError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "dotenv file absent, no candidates");
            return Ok(Candidates::new());
        }
        let text = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::Source {
            path: self.path.clone(),
            message: format!("failed to read dotenv file: {e}"),
        })?;
        let entries = parse_dotenv(&text);

        let mut out = Candidates::new();
        for field in fields {
            let mut names = Vec::with_capacity(4);
            if !self.prefix.is_empty() {
                names.push(format!("{}{}", self.prefix, field.name.to_uppercase()));
            }
            names.push(field.name.to_uppercase());
            names.push(field.name.clone());
            names.push(field.name.to_lowercase());

            for name in names {
                if let Some(raw) = entries.get(&name) {
                    out.insert(
                        field.name.clone(),
                        (
                            Value::Str(raw.clone()),
                            Provenance::new(
                                SourceKind::Dotenv,
                                Some(format!("{}:{}", self.path.display(), name)),
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

/// Parse dotenv text into key/value entries; later duplicates win.
fn parse_dotenv(text: &str) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();
    for line in text.lines() {
        let mut line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(rest) = line.strip_prefix("export ") {
            line = rest;
        }
        // Inline comments are cut at the first '#', even inside quotes.
        let line = match line.split_once('#') {
            Some((before, _)) => before.trim(),
            None => line,
        };
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = strip_matching_quotes(value.trim());
        if !key.is_empty() {
            entries.insert(key.to_string(), value.to_string());
        }
    }
    entries
}

fn strip_matching_quotes(value: &str) -> &str {
    if value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
