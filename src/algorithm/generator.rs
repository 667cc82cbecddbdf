use crate::algorithm::sampling::WeightedSelector;
use crate::io::configuration::DEFAULT_MAX_ATTEMPTS;
use crate::io::error::{CollectionError, Result};
use crate::model::{Record, TraitAssignment, TraitSchema};
use log::{debug, trace};
use rand::Rng;
use std::collections::HashSet;

/// Counters describing the rejection sampling work of one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Candidate assignments drawn, accepted or not
    pub draws: usize,
    /// Candidates rejected because they matched an accepted assignment
    pub rejections: usize,
}

/// Weighted rejection sampler producing pairwise-distinct trait assignments
///
/// The set of accepted assignments belongs to the instance, so one generator
/// corresponds to one collection. Identifiers continue from the number of
/// records already emitted by this instance.
pub struct CombinationGenerator<'a, R> {
    schema: &'a TraitSchema,
    selectors: Vec<WeightedSelector>,
    rng: R,
    accepted: HashSet<TraitAssignment>,
    max_attempts: usize,
    /// Sampling counters for the records emitted so far
    pub stats: GenerationStats,
}

impl<'a, R: Rng> CombinationGenerator<'a, R> {
    /// Create a generator for `schema` drawing from `rng`
    pub fn new(schema: &'a TraitSchema, rng: R) -> Self {
        let selectors = schema
            .traits()
            .iter()
            .map(WeightedSelector::for_trait)
            .collect();

        Self {
            schema,
            selectors,
            rng,
            accepted: HashSet::new(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            stats: GenerationStats::default(),
        }
    }

    /// Set the number of draws allowed per record before giving up
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Number of records emitted so far
    pub fn emitted(&self) -> usize {
        self.accepted.len()
    }

    /// Draw one candidate assignment, ignoring uniqueness
    pub fn draw_candidate(&mut self) -> TraitAssignment {
        self.stats.draws += 1;
        self.schema
            .traits()
            .iter()
            .zip(&self.selectors)
            .map(|(definition, selector)| {
                let index = selector.choose(&mut self.rng);
                definition.variants.get(index).cloned().unwrap_or_default()
            })
            .collect()
    }

    /// Draw until an assignment not yet accepted is found, then emit it
    ///
    /// # Errors
    ///
    /// Returns `GenerationStalled` if no unique candidate appears within the
    /// configured number of attempts
    pub fn next_record(&mut self) -> Result<Record> {
        let position = self.accepted.len();

        for attempt in 1..=self.max_attempts {
            let candidate = self.draw_candidate();
            if self.accepted.contains(&candidate) {
                self.stats.rejections += 1;
                trace!("Image {} draw {attempt} collided, resampling", position + 1);
                continue;
            }

            self.accepted.insert(candidate.clone());
            return Ok(Record::at_position(position, candidate));
        }

        Err(CollectionError::GenerationStalled {
            record: position + 1,
            attempts: self.max_attempts,
        })
    }

    /// Emit `count` further records, calling `on_record` after each one
    ///
    /// # Errors
    ///
    /// Returns `CapacityExhausted` before drawing anything if the schema cannot
    /// hold that many distinct assignments, or `GenerationStalled` if the retry
    /// ceiling is hit
    pub fn generate_with<F>(&mut self, count: usize, mut on_record: F) -> Result<Vec<Record>>
    where
        F: FnMut(&Record),
    {
        let capacity = self.schema.capacity();
        let requested = self.accepted.len().saturating_add(count);
        if requested as u128 > capacity {
            return Err(CollectionError::CapacityExhausted {
                requested,
                capacity,
            });
        }

        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            let record = self.next_record()?;
            on_record(&record);
            records.push(record);
        }

        debug!(
            "Generated {count} unique combinations in {} draws ({} rejected)",
            self.stats.draws, self.stats.rejections
        );
        Ok(records)
    }

    /// Emit `count` further records
    ///
    /// # Errors
    ///
    /// See [`CombinationGenerator::generate_with`]
    pub fn generate(&mut self, count: usize) -> Result<Vec<Record>> {
        self.generate_with(count, |_| {})
    }
}

/// Generate `count` records with pairwise-distinct assignments
///
/// Uses the default retry ceiling; build a [`CombinationGenerator`] to change it.
///
/// # Errors
///
/// Returns `CapacityExhausted` or `GenerationStalled` as described on
/// [`CombinationGenerator::generate_with`]
pub fn generate<R: Rng>(schema: &TraitSchema, count: usize, rng: &mut R) -> Result<Vec<Record>> {
    CombinationGenerator::new(schema, rng).generate(count)
}

/// True when no two records share an assignment
pub fn all_unique(records: &[Record]) -> bool {
    let mut seen = HashSet::with_capacity(records.len());
    records.iter().all(|record| seen.insert(&record.assignment))
}
