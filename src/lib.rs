//! Weighted unique trait-combination generation and duplicate detection for
//! layered generative image collections
//!
//! The generate pass draws pairwise-distinct trait assignments by weighted
//! rejection sampling, composites one image per assignment and writes a
//! metadata table. The detect pass reads such a table back and groups the
//! records whose trait assignments are identical.

#![forbid(unsafe_code)]

/// Combination generation, weighted sampling and duplicate detection
pub mod algorithm;
/// Input/output operations, command-line handling and error types
pub mod io;
/// Trait schema, assignment, record and table types
pub mod model;

pub use io::error::{CollectionError, Result};
