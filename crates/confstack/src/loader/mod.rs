//! Configuration resolver: source merging, conversion, and provenance.
//!
//! Responsibilities:
//! - Invoke collectors once each, in caller order, merging candidates with
//!   first-source-wins semantics.
//! - Convert merged raw values via the type converter, fall back to schema
//!   defaults, and fail on missing required fields.
//! - Attach per-field provenance to the resolved instance, masking raw
//!   values of secret-shaped fields.
//!
//! Does NOT handle:
//! - Source parsing (see `sources/`).
//! - Value conversion rules (see `convert.rs`).
//!
//! Invariants / Assumptions:
//! - Precedence is encoded purely by source position in the supplied list.
//! - Resolution is all-or-nothing: the first failing field aborts the load.
//! - Every resolved field has exactly one provenance entry.

mod resolve;
mod resolved;

#[cfg(test)]
mod tests;

pub use resolve::{Loader, load, load_default};
pub use resolved::Resolved;
