//! Layered, strongly-typed configuration resolution with provenance
//! tracking.
//!
//! A [`Schema`] describes named fields with declared [`Shape`]s and optional
//! defaults. A [`Loader`] consults an ordered list of [`Collector`] sources
//! (CLI tokens, environment snapshot, dotenv file, TOML file) with
//! first-source-wins precedence, converts raw values into the declared
//! shapes, and records per-field [`Provenance`] on the resulting
//! [`Resolved`] instance.
//!
//! ```
//! use confstack::{EnvVars, Loader, Schema, Shape};
//!
//! let schema = Schema::builder()
//!     .field("host", Shape::Str)
//!     .field_with_default("workers", Shape::Int, 4i64)
//!     .build()?;
//!
//! let resolved = Loader::new(&schema)
//!     .with_source(EnvVars::from_snapshot([("HOST", "db.internal")]))
//!     .load()?;
//!
//! assert_eq!(resolved.get_str("host"), Some("db.internal"));
//! assert_eq!(resolved.get_i64("workers"), Some(4));
//! # Ok::<(), confstack::ConfigError>(())
//! ```

mod convert;
mod error;
mod loader;
pub mod provenance;
pub mod schema;
pub mod sources;
pub mod value;

pub use convert::convert;
pub use error::ConfigError;
pub use loader::{Loader, Resolved, load, load_default};
pub use provenance::{Provenance, SourceKind};
pub use schema::{
    Decoder, DefaultValue, EnumMember, EnumShape, FieldSpec, Schema, SchemaBuilder, Shape,
};
pub use sources::{Candidates, CliArgs, Collector, ConfigFile, DotenvFile, EnvVars};
pub use value::{MASK, Secret, Value};
