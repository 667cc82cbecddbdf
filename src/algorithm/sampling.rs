use crate::model::TraitDefinition;
use rand::Rng;

/// Cumulative integer distribution over the variants of one trait
///
/// Weights are unnormalized relative frequencies; the distribution normalizes
/// by drawing uniformly from `0..total` and walking the cumulative sums.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedSelector {
    cumulative: Vec<u64>,
}

impl WeightedSelector {
    /// Build a selector from relative weights
    pub fn new(weights: &[u32]) -> Self {
        let cumulative = weights
            .iter()
            .scan(0u64, |running, &w| {
                *running += u64::from(w);
                Some(*running)
            })
            .collect();
        Self { cumulative }
    }

    /// Build a selector for the variants of a trait
    pub fn for_trait(definition: &TraitDefinition) -> Self {
        Self::new(&definition.weights)
    }

    /// Sum of all weights
    pub fn total(&self) -> u64 {
        self.cumulative.last().copied().unwrap_or(0)
    }

    /// Normalized probability of each index
    pub fn probabilities(&self) -> Vec<f64> {
        let total = self.total();
        if total == 0 {
            return vec![0.0; self.cumulative.len()];
        }
        let mut previous = 0;
        self.cumulative
            .iter()
            .map(|&c| {
                let weight = c - previous;
                previous = c;
                weight as f64 / total as f64
            })
            .collect()
    }

    /// Draw an index with probability proportional to its weight
    ///
    /// Returns 0 when every weight is zero or the selector is empty.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let total = self.total();
        if total == 0 {
            return 0;
        }

        let target = rng.random_range(0..total);
        // First cumulative sum strictly above the target owns it
        self.cumulative.partition_point(|&c| c <= target)
    }
}
