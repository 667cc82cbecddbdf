//! Collection data model
//!
//! This module contains the types shared by both passes:
//! - Trait definitions and the ordered trait schema
//! - Trait assignments and the records generated from them
//! - The metadata table exchanged between generation and duplicate detection

/// Generated records, trait assignments and the metadata table
pub mod record;
/// Trait definitions and schema validation
pub mod traits;

pub use record::{MetadataTable, Record, TraitAssignment};
pub use traits::{TraitDefinition, TraitSchema};
