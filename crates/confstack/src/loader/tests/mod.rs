//! Tests for the resolver.
//!
//! Responsibilities:
//! - Test merge precedence across source orderings.
//! - Test default fallback, missing-value failures, and error propagation.
//! - Test secret masking through values and provenance.
//!
//! Does NOT handle:
//! - Collector parsing details (tested inline in `sources/`).
//! - Conversion rules (tested inline in `convert.rs`).
//!
//! Invariants:
//! - Tests prefer explicit environment snapshots over process-global state;
//!   the few process-env tests are serialized.

pub mod precedence_tests;
pub mod secret_tests;
