//! Source collectors: pluggable adapters reporting raw candidate values.
//!
//! Responsibilities:
//! - Define the [`Collector`] contract the loader consumes.
//! - Provide the four built-in collectors: CLI tokens, environment snapshot,
//!   dotenv file, and TOML config file.
//!
//! Does NOT handle:
//! - Precedence or merging; collectors only report candidates, the loader
//!   merges them by call order.
//!
//! Invariants:
//! - A missing backing file is not an error and contributes no candidates.
//! - An unreadable or unparsable existing file is a `ConfigError::Source`.
//! - Reported keys are schema field names, each paired with the raw value
//!   and its provenance.

mod cli;
mod dotenv;
mod env;
mod file;

pub use cli::CliArgs;
pub use dotenv::DotenvFile;
pub use env::EnvVars;
pub use file::ConfigFile;

use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::provenance::{Provenance, SourceKind};
use crate::schema::FieldSpec;
use crate::value::Value;

/// Candidates reported by one collector: field name to raw value plus
/// provenance.
pub type Candidates = BTreeMap<String, (Value, Provenance)>;

/// A pluggable source adapter.
pub trait Collector {
    /// Identifier of this source type, used in provenance and missing-value
    /// diagnostics.
    fn kind(&self) -> SourceKind;

    /// Report raw candidate values for the given fields.
    fn collect(&self, fields: &[FieldSpec]) -> Result<Candidates, ConfigError>;
}
