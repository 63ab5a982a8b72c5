//! Error types for random variable construction and queries.

use thiserror::Error;

/// Malformed construction input: the weights or categories can't form a
/// finite random variable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// No weights (or no categories) were given.
    #[error("Probability space cannot be empty")]
    Empty,

    /// A weight is NaN or infinite.
    #[error("Weight {index} is not finite: {value}")]
    NonFiniteWeight { index: usize, value: f64 },

    /// A weight is negative.
    #[error("Negative weight {value} at index {index}")]
    NegativeWeight { index: usize, value: f64 },

    /// All weights are zero (can't normalize).
    #[error("Cannot normalize: all weights are zero")]
    ZeroWeights,

    /// Categories and weights have different lengths.
    #[error("Length mismatch: {categories} categories, {weights} weights")]
    LengthMismatch { categories: usize, weights: usize },

    /// The same category appears twice.
    #[error("Duplicate category at positions {first} and {second}")]
    DuplicateCategory { first: usize, second: usize },
}

/// A query argument outside the domain of the queried function.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// The category is not an outcome of the variable.
    #[error("Category '{category}' is not supported")]
    UnknownCategory { category: String },

    /// Quantile not in (0, 1].
    #[error("Quantile {q} is outside (0, 1]")]
    QuantileOutOfRange { q: f64 },
}

/// Either kind of error, for callers that build and query in one `?` chain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DrvError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}
