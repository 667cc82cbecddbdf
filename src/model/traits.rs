use crate::io::configuration::FILE_COLUMN;
use crate::io::error::{Result, invalid_schema};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One layered attribute category and its weighted variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitDefinition {
    /// Trait name, also used as the metadata column name
    pub name: String,
    /// Concrete options for this trait, in declaration order
    pub variants: Vec<String>,
    /// Relative sampling frequency of each variant
    pub weights: Vec<u32>,
}

impl TraitDefinition {
    /// Create a trait definition without validating it
    pub fn new(
        name: impl Into<String>,
        variants: impl IntoIterator<Item = impl Into<String>>,
        weights: impl IntoIterator<Item = u32>,
    ) -> Self {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
            weights: weights.into_iter().collect(),
        }
    }

    /// Number of distinct variant values this trait can produce
    pub fn distinct_variants(&self) -> usize {
        self.variants.iter().collect::<HashSet<_>>().len()
    }

    /// Check the per-trait invariants
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or reserved, there are no variants,
    /// the weight count differs from the variant count, or a weight is zero
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(invalid_schema(None, &"trait name must not be empty"));
        }
        if self.name == FILE_COLUMN {
            return Err(invalid_schema(
                Some(self.name.as_str()),
                &format!("'{FILE_COLUMN}' is reserved for the identifier column"),
            ));
        }
        if self.variants.is_empty() {
            return Err(invalid_schema(
                Some(self.name.as_str()),
                &"at least one variant is required",
            ));
        }
        if self.variants.len() != self.weights.len() {
            return Err(invalid_schema(
                Some(self.name.as_str()),
                &format!(
                    "{} variants but {} weights",
                    self.variants.len(),
                    self.weights.len()
                ),
            ));
        }
        if let Some(position) = self.weights.iter().position(|&w| w == 0) {
            let variant = self.variants.get(position).map_or("", String::as_str);
            return Err(invalid_schema(
                Some(self.name.as_str()),
                &format!("variant '{variant}' has a zero weight"),
            ));
        }
        Ok(())
    }
}

/// Ordered, validated sequence of trait definitions
///
/// Order is both the metadata column order and the compositing layer order,
/// with the first trait as the bottom layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitSchema {
    traits: Vec<TraitDefinition>,
}

impl TraitSchema {
    /// Build a schema, validating every trait and the set of trait names
    ///
    /// # Errors
    ///
    /// Returns a schema error if there are no traits, any trait is invalid,
    /// or two traits share a name
    pub fn new(traits: Vec<TraitDefinition>) -> Result<Self> {
        if traits.is_empty() {
            return Err(invalid_schema(None, &"schema must define at least one trait"));
        }

        let mut seen = HashSet::with_capacity(traits.len());
        for definition in &traits {
            definition.validate()?;
            if !seen.insert(definition.name.as_str()) {
                return Err(invalid_schema(
                    Some(definition.name.as_str()),
                    &"trait names must be unique",
                ));
            }
        }

        Ok(Self { traits })
    }

    /// Trait definitions in schema order
    pub fn traits(&self) -> &[TraitDefinition] {
        &self.traits
    }

    /// Number of traits in the schema
    pub const fn len(&self) -> usize {
        self.traits.len()
    }

    /// Always false for a validated schema
    pub const fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }

    /// Trait names in schema order
    pub fn trait_names(&self) -> Vec<String> {
        self.traits.iter().map(|t| t.name.clone()).collect()
    }

    /// Position of a trait within the schema
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.traits.iter().position(|t| t.name == name)
    }

    /// Number of distinct trait assignments the schema can produce
    ///
    /// Saturates at `u128::MAX` for very large schemas.
    pub fn capacity(&self) -> u128 {
        self.traits.iter().fold(1u128, |acc, t| {
            acc.saturating_mul(t.distinct_variants() as u128)
        })
    }
}
