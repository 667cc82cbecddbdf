use crate::io::configuration::{FILE_COLUMN, IMAGE_EXTENSION};
use crate::model::traits::TraitSchema;

/// One chosen variant per trait, stored in schema order
///
/// Equality and hashing compare every variant value, which is exactly the
/// equivalence used for uniqueness checks and duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TraitAssignment {
    values: Vec<String>,
}

impl TraitAssignment {
    /// Create an assignment from variant values in schema order
    pub const fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    /// Variant values in schema order
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Number of traits covered
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no trait is assigned
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Variant chosen for the trait at `index`
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// Variant chosen for a named trait of `schema`
    pub fn variant_for(&self, schema: &TraitSchema, trait_name: &str) -> Option<&str> {
        schema.index_of(trait_name).and_then(|index| self.get(index))
    }
}

impl<S: Into<String>> FromIterator<S> for TraitAssignment {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Identifier of the record emitted at 0-based `position`
///
/// Identifiers are 1-based and carry the fixed image extension, e.g. `3.png`.
pub fn file_identifier(position: usize) -> String {
    format!("{}.{IMAGE_EXTENSION}", position + 1)
}

/// A trait assignment labelled with its positional identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Positional identifier, also the image file name
    pub file: String,
    /// Chosen variants, compared for uniqueness
    pub assignment: TraitAssignment,
}

impl Record {
    /// Create a record with an explicit identifier
    pub fn new(file: impl Into<String>, assignment: TraitAssignment) -> Self {
        Self {
            file: file.into(),
            assignment,
        }
    }

    /// Create the record emitted at 0-based `position`
    pub fn at_position(position: usize, assignment: TraitAssignment) -> Self {
        Self::new(file_identifier(position), assignment)
    }

    /// Row fields in table order: identifier first, then variants
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.file.as_str()).chain(self.assignment.values.iter().map(String::as_str))
    }
}

/// Ordered records together with their explicit trait column order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataTable {
    trait_names: Vec<String>,
    records: Vec<Record>,
}

impl MetadataTable {
    /// Create a table from trait column names and records
    pub const fn new(trait_names: Vec<String>, records: Vec<Record>) -> Self {
        Self {
            trait_names,
            records,
        }
    }

    /// Create a table whose columns follow `schema`
    pub fn from_schema(schema: &TraitSchema, records: Vec<Record>) -> Self {
        Self::new(schema.trait_names(), records)
    }

    /// Header row: the identifier column followed by trait names
    pub fn header(&self) -> Vec<&str> {
        std::iter::once(FILE_COLUMN)
            .chain(self.trait_names.iter().map(String::as_str))
            .collect()
    }

    /// Trait column names in order
    pub fn trait_names(&self) -> &[String] {
        &self.trait_names
    }

    /// Records in generation order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Take ownership of the records
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}
