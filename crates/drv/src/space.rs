//! Finite probability spaces.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A probability space over the positions {0, 1, ..., n-1}.
///
/// Invariants:
/// - There is at least one position
/// - All weights are finite and non-negative
/// - Weights sum to 1 (within tolerance)
///
/// The cumulative sums are computed once at construction and never change,
/// so a space can be shared between threads without locking.
///
/// # Example
///
/// ```rust
/// use drv::ProbabilitySpace;
///
/// // Unnormalized weights are rescaled to sum to 1
/// let space = ProbabilitySpace::new(vec![1.0, 2.0, 1.0]).unwrap();
/// assert_eq!(space.weights(), &[0.25, 0.5, 0.25]);
/// assert_eq!(space.cumulative(), &[0.25, 0.75, 1.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct ProbabilitySpace {
    weights: Vec<f64>,
    cumulative: Vec<f64>,
}

impl ProbabilitySpace {
    /// Create a space from raw, possibly unnormalized, weights.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The vector is empty
    /// - Any weight is NaN, infinite or negative
    /// - The weights sum to zero
    pub fn new(weights: Vec<f64>) -> Result<Self, ValidationError> {
        if weights.is_empty() {
            return Err(ValidationError::Empty);
        }

        for (index, &value) in weights.iter().enumerate() {
            check_weight(index, value)?;
        }

        let sum: f64 = weights.iter().sum();
        if sum <= 0.0 {
            return Err(ValidationError::ZeroWeights);
        }

        let weights: Vec<f64> = weights.iter().map(|w| w / sum).collect();
        let cumulative = prefix_sums(&weights);
        debug!("probability space over {} outcomes (raw sum {sum})", weights.len());

        Ok(Self {
            weights,
            cumulative,
        })
    }

    /// Create a uniform space over n positions.
    ///
    /// ```rust
    /// use drv::ProbabilitySpace;
    ///
    /// let space = ProbabilitySpace::uniform(4).unwrap();
    /// assert_eq!(space.weight(3), Some(0.25));
    /// ```
    pub fn uniform(n: usize) -> Result<Self, ValidationError> {
        Self::new(vec![1.0; n])
    }

    /// The normalized weights, in position order.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// The weight at position i.
    pub fn weight(&self, i: usize) -> Option<f64> {
        self.weights.get(i).copied()
    }

    /// Prefix sums of the weights: `cumulative[i]` = Σ_{j ≤ i} `weights[j]`.
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Total weight of positions 0..=i.
    pub fn cumulative_at(&self, i: usize) -> Option<f64> {
        self.cumulative.get(i).copied()
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always false for a constructed space.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Smallest position whose cumulative weight reaches q.
    ///
    /// Binary search over the prefix sums, O(log n). If rounding leaves no
    /// such position, the last one is returned. The caller is responsible for
    /// checking that q lies in (0, 1].
    pub fn quantile_index(&self, q: f64) -> usize {
        let i = self.cumulative.partition_point(|&c| c < q);
        i.min(self.cumulative.len() - 1)
    }
}

/// A single raw weight must be finite and non-negative.
pub(crate) fn check_weight(index: usize, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteWeight { index, value });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeWeight { index, value });
    }
    Ok(())
}

/// Running sums of `weights`; the final entry is pinned to exactly 1.
fn prefix_sums(weights: &[f64]) -> Vec<f64> {
    let mut cumulative: Vec<f64> = weights
        .iter()
        .scan(0.0, |acc, &w| {
            *acc += w;
            Some(*acc)
        })
        .collect();
    if let Some(last) = cumulative.last_mut() {
        *last = 1.0;
    }
    cumulative
}

impl TryFrom<Vec<f64>> for ProbabilitySpace {
    type Error = ValidationError;

    fn try_from(weights: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(weights)
    }
}

impl From<ProbabilitySpace> for Vec<f64> {
    fn from(space: ProbabilitySpace) -> Self {
        space.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PROB_TOLERANCE;

    #[test]
    fn test_space_normalizes() {
        let space = ProbabilitySpace::new(vec![1.0, 2.0, 1.0]).unwrap();
        assert_eq!(space.weights(), &[0.25, 0.5, 0.25]);
        let sum: f64 = space.weights().iter().sum();
        assert!((sum - 1.0).abs() < PROB_TOLERANCE);
    }

    #[test]
    fn test_space_already_normalized() {
        let space = ProbabilitySpace::new(vec![0.3, 0.7]).unwrap();
        assert!((space.weights()[0] - 0.3).abs() < 1e-12);
        assert!((space.weights()[1] - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_space_empty() {
        assert_eq!(ProbabilitySpace::new(vec![]), Err(ValidationError::Empty));
        assert_eq!(ProbabilitySpace::uniform(0), Err(ValidationError::Empty));
    }

    #[test]
    fn test_space_negative() {
        let result = ProbabilitySpace::new(vec![0.5, -0.5, 1.0]);
        assert!(matches!(
            result,
            Err(ValidationError::NegativeWeight { index: 1, .. })
        ));
    }

    #[test]
    fn test_space_zero_sum() {
        let result = ProbabilitySpace::new(vec![0.0, 0.0]);
        assert_eq!(result, Err(ValidationError::ZeroWeights));
    }

    #[test]
    fn test_space_non_finite() {
        let result = ProbabilitySpace::new(vec![1.0, f64::NAN]);
        assert!(matches!(
            result,
            Err(ValidationError::NonFiniteWeight { index: 1, .. })
        ));
        let result = ProbabilitySpace::new(vec![f64::INFINITY]);
        assert!(matches!(
            result,
            Err(ValidationError::NonFiniteWeight { index: 0, .. })
        ));
    }

    #[test]
    fn test_zero_weights_allowed_alongside_positive() {
        let space = ProbabilitySpace::new(vec![0.0, 3.0, 0.0]).unwrap();
        assert_eq!(space.weights(), &[0.0, 1.0, 0.0]);
        assert_eq!(space.cumulative(), &[0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_cumulative_ends_at_one() {
        let space = ProbabilitySpace::new(vec![0.1; 10]).unwrap();
        assert_eq!(space.cumulative_at(9), Some(1.0));
        assert_eq!(space.cumulative_at(10), None);
        assert!((space.cumulative_at(4).unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_index() {
        let space = ProbabilitySpace::new(vec![0.2, 0.3, 0.5]).unwrap();
        assert_eq!(space.quantile_index(0.1), 0);
        assert_eq!(space.quantile_index(0.2), 0);
        assert_eq!(space.quantile_index(0.21), 1);
        assert_eq!(space.quantile_index(0.5), 1);
        assert_eq!(space.quantile_index(0.51), 2);
        assert_eq!(space.quantile_index(1.0), 2);
    }

    #[test]
    fn test_quantile_index_just_above_prefix_sum() {
        let space = ProbabilitySpace::new(vec![1.0, 1.0]).unwrap();
        assert_eq!(space.quantile_index(0.5), 0);
        assert_eq!(space.quantile_index(0.5 + 5e-10), 1);
        assert_eq!(space.quantile_index(0.5 + f64::EPSILON), 1);
    }

    #[test]
    fn test_quantile_index_fair_die_median() {
        for raw in [vec![1.0 / 6.0; 6], vec![1.0; 6]] {
            let space = ProbabilitySpace::new(raw).unwrap();
            assert_eq!(space.quantile_index(0.5), 2);
        }
    }

    #[test]
    fn test_quantile_index_skips_zero_weight_prefix() {
        let space = ProbabilitySpace::new(vec![0.0, 0.0, 1.0]).unwrap();
        assert_eq!(space.quantile_index(0.5), 2);
    }

    #[test]
    fn test_quantile_index_falls_back_to_last() {
        let space = ProbabilitySpace::new(vec![0.5, 0.5]).unwrap();
        assert_eq!(space.quantile_index(2.0), 1);
    }

    #[test]
    fn test_uniform() {
        let space = ProbabilitySpace::uniform(5).unwrap();
        for &w in space.weights() {
            assert!((w - 0.2).abs() < 1e-12);
        }
    }
}
