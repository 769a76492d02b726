//! Provenance records: where a resolved value came from.

use std::fmt;

use serde::Serialize;

use crate::value::Value;

/// Identifier of a source type.
///
/// The layer numbers are informational precedence hints; actual precedence is
/// purely the collector call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Command-line tokens.
    Cli,
    /// Process environment snapshot.
    Env,
    /// Dotenv file.
    Dotenv,
    /// Structured (TOML) config file.
    File,
    /// Schema default.
    Default,
}

impl SourceKind {
    /// Informational precedence hint.
    pub const fn layer(self) -> u8 {
        match self {
            SourceKind::Cli => 0,
            SourceKind::Env => 10,
            SourceKind::Dotenv => 20,
            SourceKind::File => 30,
            SourceKind::Default => 99,
        }
    }

    /// Stable identifier string.
    pub const fn as_str(self) -> &'static str {
        match self {
            SourceKind::Cli => "cli",
            SourceKind::Env => "env",
            SourceKind::Dotenv => "dotenv",
            SourceKind::File => "file",
            SourceKind::Default => "default",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record of where a field's winning value came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Provenance {
    /// Source type that produced the value.
    pub kind: SourceKind,
    /// Informational layer hint, derived from `kind`.
    pub layer: u8,
    /// Human-readable locator (env var name, CLI flag, "file:key"); `None`
    /// for defaults.
    pub path: Option<String>,
    /// The pre-conversion value; the fixed mask token for secret-shaped
    /// fields.
    pub raw_value: Value,
}

impl Provenance {
    /// Build a record for `kind`, deriving the layer hint.
    pub fn new(kind: SourceKind, path: Option<String>, raw_value: Value) -> Self {
        Self {
            kind,
            layer: kind.layer(),
            path,
            raw_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_match_documented_hints() {
        assert_eq!(SourceKind::Cli.layer(), 0);
        assert_eq!(SourceKind::Env.layer(), 10);
        assert_eq!(SourceKind::Dotenv.layer(), 20);
        assert_eq!(SourceKind::File.layer(), 30);
        assert_eq!(SourceKind::Default.layer(), 99);
    }

    #[test]
    fn test_serializes_kind_as_lowercase_identifier() {
        let prov = Provenance::new(
            SourceKind::Env,
            Some("APP_WORKERS".to_string()),
            Value::Str("9".to_string()),
        );
        let json = serde_json::to_value(&prov).unwrap();
        assert_eq!(json["kind"], "env");
        assert_eq!(json["layer"], 10);
        assert_eq!(json["path"], "APP_WORKERS");
        assert_eq!(json["raw_value"], "9");
    }
}
