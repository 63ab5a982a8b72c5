//! # Capabilities of discrete random variables
//!
//! A discrete random variable is a probability space paired with a function
//! into an outcome set. Not every variable can answer every question: a
//! variable with infinite support has a pmf but no enumerable support, and
//! its cdf needs an ordering the outcome set may lack.
//!
//! Instead of one base type whose methods fail at runtime for variants that
//! can't implement them, each question is its own trait:
//!
//! - [`SupportsPmf`]: probability of a single outcome
//! - [`SupportsCdf`]: cumulative probability in a canonical order, and its inverse
//! - [`SupportsMode`]: most likely outcome and the positive-mass outcomes
//!
//! [`FiniteVariable`](crate::FiniteVariable) implements all three. Code that
//! only needs a pmf can be written against `SupportsPmf` and will keep
//! working for future variants.

use crate::error::DomainError;

/// A variable with a probability mass function.
pub trait SupportsPmf {
    /// The outcome type.
    type Outcome;

    /// Probability of outcome `k`. Zero for values outside the support.
    fn pmf(&self, k: &Self::Outcome) -> f64;

    /// Natural log of the pmf; `-inf` where the pmf is zero.
    fn logpmf(&self, k: &Self::Outcome) -> f64 {
        self.pmf(k).ln()
    }
}

/// A variable whose outcomes carry a canonical order.
pub trait SupportsCdf: SupportsPmf {
    /// Probability of `k` or any outcome ordered before it.
    fn cdf(&self, k: &Self::Outcome) -> Result<f64, DomainError>;

    /// Inverse of the cdf: the first outcome whose cdf reaches `q`.
    fn ppf(&self, q: f64) -> Result<&Self::Outcome, DomainError>;
}

/// A variable whose support can be enumerated.
pub trait SupportsMode: SupportsPmf {
    /// An outcome of maximal probability. Not unique in general.
    fn mode(&self) -> &Self::Outcome;

    /// Outcomes with strictly positive probability.
    fn support(&self) -> Vec<&Self::Outcome>;
}

/// Total probability of `outcomes` under any pmf-capable variable.
///
/// ```rust
/// use drv::{FiniteVariable, total_mass};
///
/// let die = FiniteVariable::uniform("die", vec![1, 2, 3, 4, 5, 6]).unwrap();
/// let even = total_mass(&die, &[2, 4, 6]);
/// assert!((even - 0.5).abs() < 1e-9);
/// ```
pub fn total_mass<V>(variable: &V, outcomes: &[V::Outcome]) -> f64
where
    V: SupportsPmf + ?Sized,
{
    outcomes.iter().map(|k| variable.pmf(k)).sum()
}
