//! Weighted random choice over a fixed table of outcomes.

use rand::Rng;
use rand_distr::{Distribution, WeightedError, WeightedIndex};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SamplingError {
    #[error("Weight table has no outcomes")]
    Empty,
    #[error("Weight {0} is not a finite number")]
    NonFiniteWeight(f64),
    #[error("Invalid weights: {0}")]
    Weights(#[from] WeightedError),
}

/// A table of `(outcome, weight)` pairs sampled proportionally to weight.
///
/// Weights are relative and need not sum to one.
#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    outcomes: Vec<T>,
    index: WeightedIndex<f64>,
}

impl<T> WeightedTable<T> {
    /// Builds a table, rejecting empty tables, negative or non-finite weights,
    /// and tables whose weights are all zero.
    pub fn new(entries: impl IntoIterator<Item = (T, f64)>) -> Result<Self, SamplingError> {
        let (outcomes, weights): (Vec<T>, Vec<f64>) = entries.into_iter().unzip();

        if outcomes.is_empty() {
            return Err(SamplingError::Empty);
        }
        if let Some(&bad) = weights.iter().find(|w| !w.is_finite()) {
            return Err(SamplingError::NonFiniteWeight(bad));
        }

        let index = WeightedIndex::new(&weights)?;
        Ok(Self { outcomes, index })
    }

    /// Draws one outcome.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        &self.outcomes[self.index.sample(rng)]
    }

    pub fn outcomes(&self) -> &[T] {
        &self.outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_rejects_bad_tables() {
        assert!(matches!(
            WeightedTable::<u8>::new(Vec::new()),
            Err(SamplingError::Empty)
        ));
        assert!(matches!(
            WeightedTable::new([(1, 0.0), (2, 0.0)]),
            Err(SamplingError::Weights(WeightedError::AllWeightsZero))
        ));
        assert!(matches!(
            WeightedTable::new([(1, -1.0), (2, 3.0)]),
            Err(SamplingError::Weights(WeightedError::InvalidWeight))
        ));
        assert!(matches!(
            WeightedTable::new([(1, f64::INFINITY)]),
            Err(SamplingError::NonFiniteWeight(_))
        ));
        assert!(matches!(
            WeightedTable::new([(1, f64::NAN)]),
            Err(SamplingError::NonFiniteWeight(_))
        ));
    }

    #[test]
    fn test_zero_weight_never_drawn() {
        let table = WeightedTable::new([("never", 0.0), ("always", 1.0)]).unwrap();
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            assert_eq!(*table.sample(&mut rng), "always");
        }
    }

    #[test]
    fn test_proportions() {
        let table = WeightedTable::new([(3, 0.2), (4, 0.3), (5, 0.5)]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let n = 20_000;
        let mut counts = [0usize; 3];
        for _ in 0..n {
            counts[(*table.sample(&mut rng) - 3) as usize] += 1;
        }

        let freq: Vec<f64> = counts.iter().map(|&c| c as f64 / n as f64).collect();
        assert!((freq[0] - 0.2).abs() < 0.02, "freq of 3: {}", freq[0]);
        assert!((freq[1] - 0.3).abs() < 0.02, "freq of 4: {}", freq[1]);
        assert!((freq[2] - 0.5).abs() < 0.02, "freq of 5: {}", freq[2]);
    }

    #[test]
    fn test_relative_weights() {
        // Weights need not be normalized
        let table = WeightedTable::new([('a', 1.0), ('b', 3.0)]).unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        let b_count = (0..10_000).filter(|_| *table.sample(&mut rng) == 'b').count();
        assert!((7_200..7_800).contains(&b_count), "b drawn {b_count} times");
        assert_eq!(table.outcomes(), &['a', 'b']);
    }
}
