//! Trait schema loading from JSON documents

use crate::io::error::{CollectionError, Result, WithContext};
use crate::model::{TraitDefinition, TraitSchema};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// On-disk schema layout: traits listed bottom layer first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    /// Trait definitions in layer order
    pub traits: Vec<TraitDefinition>,
}

impl SchemaDocument {
    /// Validate the document into a schema
    ///
    /// # Errors
    ///
    /// Returns a schema error if any structural invariant is violated
    pub fn into_schema(self) -> Result<TraitSchema> {
        TraitSchema::new(self.traits)
    }
}

impl From<&TraitSchema> for SchemaDocument {
    fn from(schema: &TraitSchema) -> Self {
        Self {
            traits: schema.traits().to_vec(),
        }
    }
}

/// Parse and validate a schema from JSON text
///
/// # Errors
///
/// Returns `SchemaParse` for malformed JSON (including negative weights) and
/// `InvalidSchema` if the decoded schema is invalid
pub fn parse_schema(json: &str, origin: &Path) -> Result<TraitSchema> {
    let document: SchemaDocument =
        serde_json::from_str(json).map_err(|source| CollectionError::SchemaParse {
            path: origin.to_path_buf(),
            source,
        })?;
    document.into_schema()
}

/// Load and validate a schema file
///
/// # Errors
///
/// Returns a file system error if the file cannot be opened, otherwise the
/// errors of [`parse_schema`]
pub fn load_schema(path: &Path) -> Result<TraitSchema> {
    let file = File::open(path).with_path(path, "open schema")?;
    let document: SchemaDocument = serde_json::from_reader(BufReader::new(file)).map_err(
        |source| CollectionError::SchemaParse {
            path: path.to_path_buf(),
            source,
        },
    )?;

    let schema = document.into_schema()?;
    log::debug!(
        "Loaded schema '{}' with {} traits ({} combinations)",
        path.display(),
        schema.len(),
        schema.capacity()
    );
    Ok(schema)
}

/// Write a schema as pretty-printed JSON
///
/// # Errors
///
/// Returns a file system error if the file cannot be created, or a parse
/// error if serialization fails
pub fn save_schema(schema: &TraitSchema, path: &Path) -> Result<()> {
    let file = File::create(path).with_path(path, "create schema")?;
    serde_json::to_writer_pretty(file, &SchemaDocument::from(schema)).map_err(|source| {
        CollectionError::SchemaParse {
            path: path.to_path_buf(),
            source,
        }
    })
}
