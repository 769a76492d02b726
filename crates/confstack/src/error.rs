//! Error types for configuration resolution.
//!
//! Responsibilities:
//! - Define the four error kinds of the crate: programmer misuse, missing
//!   required values, type conversion failures, and source read/parse
//!   failures.
//!
//! Does NOT handle:
//! - Retry or partial results; every error aborts the whole load.
//!
//! Invariants:
//! - All variants carry enough context to act on (field names, expected
//!   labels, raw values, source paths).
//! - Raw values for secret-shaped fields are masked before they can reach an
//!   error, so messages never leak secrets.

use std::path::PathBuf;
use thiserror::Error;

use crate::value::Value;

/// Errors that can occur while describing a schema or resolving it.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Programmer misuse, e.g. a schema with duplicate or no fields.
    #[error("invalid schema: {0}")]
    Schema(String),

    /// A required field (no default) had no candidate from any collector.
    #[error("Missing required value for field '{field}' (checked: {})", format_chain(.checked))]
    MissingValue {
        /// Field that could not be resolved.
        field: String,
        /// Collector kinds consulted, in call order.
        checked: Vec<String>,
    },

    /// A raw value could not be converted to the field's declared shape.
    #[error("Type conversion error for field '{field}': expected {expected}, got {raw} ({reason})")]
    Conversion {
        /// Field being converted.
        field: String,
        /// Expected-type label.
        expected: String,
        /// The offending raw value (masked for secret-shaped fields).
        raw: Value,
        /// Human-readable reason, e.g. a parser error or the accepted
        /// boolean token set.
        reason: String,
    },

    /// A collector could not read or parse its backing source.
    #[error("Source error at {}: {message}", .path.display())]
    Source {
        /// Path of the backing file.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },
}

/// Render the consulted-collector chain for the missing-value message.
fn format_chain(checked: &[String]) -> String {
    if checked.is_empty() {
        "defaults".to_string()
    } else {
        checked.join(" > ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_value_message_renders_source_chain() {
        let err = ConfigError::MissingValue {
            field: "workers".to_string(),
            checked: vec!["cli".to_string(), "env".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required value for field 'workers' (checked: cli > env)"
        );
    }

    #[test]
    fn test_missing_value_message_with_empty_chain() {
        let err = ConfigError::MissingValue {
            field: "workers".to_string(),
            checked: Vec::new(),
        };
        assert!(err.to_string().contains("checked: defaults"));
    }

    #[test]
    fn test_conversion_message_contains_expected_and_raw() {
        let err = ConfigError::Conversion {
            field: "debug".to_string(),
            expected: "bool".to_string(),
            raw: Value::Str("maybe".to_string()),
            reason: "accepted: true/false/1/0/yes/no/on/off".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("bool"));
        assert!(message.contains("maybe"));
    }
}
