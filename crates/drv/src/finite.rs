//! Finite categorical random variables.

use std::any::Any;
use std::fmt;
use std::hash::Hash;

use log::{debug, trace};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::capability::{SupportsCdf, SupportsMode, SupportsPmf};
use crate::error::{DomainError, ValidationError};
use crate::ops;
use crate::space::ProbabilitySpace;

/// A discrete random variable over a finite list of categories.
///
/// The category at position `i` has probability `space.weight(i)`. The order
/// of the categories is the variable's canonical order: it is what "at or
/// before" means for [`cdf`](Self::cdf) and [`ppf`](Self::ppf), whether or
/// not the outcomes themselves are ordered.
///
/// Invariants:
/// - `categories.len() == space.len()`
/// - No category appears twice
///
/// # Example
///
/// ```rust
/// use drv::FiniteVariable;
///
/// let coin = FiniteVariable::new("coin", vec!["H", "T"], vec![0.9, 0.1]).unwrap();
/// assert!((coin.pmf(&"H") - 0.9).abs() < 1e-9);
/// assert_eq!(coin.cdf(&"T").unwrap(), 1.0);
/// assert_eq!(coin.ppf(0.95).unwrap(), &"T");
/// assert_eq!(coin.pmf(&"edge"), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FiniteVariable<T> {
    name: String,
    categories: Vec<T>,
    space: ProbabilitySpace,
}

impl<T: PartialEq> FiniteVariable<T> {
    /// Create a variable from categories and raw weights.
    ///
    /// The weights are normalized to sum to 1.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `categories` and `weights` have different lengths
    /// - A category is repeated
    /// - The weights don't form a probability space (empty, negative,
    ///   non-finite or all zero)
    pub fn new(
        name: impl Into<String>,
        categories: Vec<T>,
        weights: Vec<f64>,
    ) -> Result<Self, ValidationError> {
        if categories.len() != weights.len() {
            return Err(ValidationError::LengthMismatch {
                categories: categories.len(),
                weights: weights.len(),
            });
        }
        if let Some((first, second)) = ops::find_duplicate(&categories) {
            return Err(ValidationError::DuplicateCategory { first, second });
        }
        Self::from_distinct(name, categories, weights)
    }

    /// Build from categories already known to be distinct and aligned with
    /// `weights`.
    fn from_distinct(
        name: impl Into<String>,
        categories: Vec<T>,
        weights: Vec<f64>,
    ) -> Result<Self, ValidationError> {
        let space = ProbabilitySpace::new(weights)?;
        let name = name.into();
        debug!("finite variable '{}' over {} categories", name, categories.len());

        Ok(Self {
            name,
            categories,
            space,
        })
    }

    /// Create a variable giving every category the same probability.
    ///
    /// ```rust
    /// use drv::FiniteVariable;
    ///
    /// let die = FiniteVariable::uniform("d6", vec![1, 2, 3, 4, 5, 6]).unwrap();
    /// assert!((die.pmf(&3) - 1.0 / 6.0).abs() < 1e-9);
    /// ```
    pub fn uniform(name: impl Into<String>, categories: Vec<T>) -> Result<Self, ValidationError> {
        let weights = vec![1.0; categories.len()];
        Self::new(name, categories, weights)
    }

    /// Create a variable from weighted outcomes, summing the weights of
    /// equal outcomes.
    ///
    /// Outcomes keep the order in which they first appear. A negative or
    /// non-finite weight is reported at its position in `pairs`.
    ///
    /// ```rust
    /// use drv::FiniteVariable;
    ///
    /// let v = FiniteVariable::from_pairs("v", vec![('a', 1.0), ('b', 1.0), ('a', 2.0)]).unwrap();
    /// assert_eq!(v.categories(), &['a', 'b']);
    /// assert!((v.pmf(&'a') - 0.75).abs() < 1e-9);
    /// ```
    pub fn from_pairs<I>(name: impl Into<String>, pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (T, f64)>,
    {
        let (categories, weights) = ops::coalesce(pairs)?;
        Self::from_distinct(name, categories, weights)
    }

    /// Position of `k` in the canonical order.
    pub fn index_of(&self, k: &T) -> Option<usize> {
        self.categories.iter().position(|x| x == k)
    }

    /// Probability mass function at `k`.
    ///
    /// A value that is not a category has probability 0; this is not an error.
    pub fn pmf(&self, k: &T) -> f64 {
        self.index_of(k)
            .and_then(|i| self.space.weight(i))
            .unwrap_or(0.0)
    }

    /// Natural log of the pmf at `k`. `-inf` where the pmf is zero.
    pub fn logpmf(&self, k: &T) -> f64 {
        SupportsPmf::logpmf(self, k)
    }

    /// Cumulative distribution function at `k`: total probability of `k`
    /// and every category stored before it.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownCategory`] if `k` is not a category.
    pub fn cdf(&self, k: &T) -> Result<f64, DomainError>
    where
        T: fmt::Debug,
    {
        self.index_of(k)
            .and_then(|i| self.space.cumulative_at(i))
            .ok_or_else(|| DomainError::UnknownCategory {
                category: format!("{:?}", k),
            })
    }

    /// Pushforward of the variable through `function`.
    ///
    /// Each category `x` becomes `function(x)` with the same probability.
    /// With `flatten`, categories that collide are merged and their
    /// probabilities summed (first occurrence sets the position). Without it,
    /// a collision is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateCategory`] if `flatten` is false
    /// and two categories map to the same value.
    ///
    /// ```rust
    /// use drv::FiniteVariable;
    ///
    /// let die = FiniteVariable::uniform("d6", vec![1, 2, 3, 4, 5, 6]).unwrap();
    /// let parity = die.map(|x| x % 2, "parity", true).unwrap();
    /// assert_eq!(parity.categories(), &[1, 0]);
    /// assert!((parity.pmf(&0) - 0.5).abs() < 1e-9);
    ///
    /// assert!(die.map(|x| x % 2, "parity", false).is_err());
    /// ```
    pub fn map<U, F>(
        &self,
        function: F,
        name: impl Into<String>,
        flatten: bool,
    ) -> Result<FiniteVariable<U>, ValidationError>
    where
        U: PartialEq,
        F: Fn(&T) -> U,
    {
        let name = name.into();
        let pairs = self.items().map(|(x, p)| (function(x), p));
        if flatten {
            let mapped = FiniteVariable::from_pairs(name, pairs)?;
            debug!(
                "flattened '{}' from {} to {} categories",
                mapped.name,
                self.len(),
                mapped.len()
            );
            Ok(mapped)
        } else {
            let (categories, weights): (Vec<U>, Vec<f64>) = pairs.unzip();
            FiniteVariable::new(name, categories, weights)
        }
    }

    /// Combine with an independent variable under a binary operator.
    ///
    /// The joint outcomes are all pairs `(x, y)` of categories with
    /// probability `pmf(x) * other.pmf(y)`. Each pair becomes
    /// `operator(x, y)`, and equal results are merged. Results are ordered by
    /// first occurrence, visiting `self`'s categories in the outer loop.
    ///
    /// ```rust
    /// use drv::FiniteVariable;
    ///
    /// let d6 = FiniteVariable::uniform("d6", vec![1, 2, 3, 4, 5, 6]).unwrap();
    /// let two_d6 = d6.binop(&d6, |a, b| a + b, "2d6").unwrap();
    /// assert_eq!(two_d6.len(), 11);
    /// assert!((two_d6.pmf(&7) - 6.0 / 36.0).abs() < 1e-9);
    /// ```
    pub fn binop<U, V, F>(
        &self,
        other: &FiniteVariable<U>,
        operator: F,
        name: impl Into<String>,
    ) -> Result<FiniteVariable<V>, ValidationError>
    where
        V: PartialEq,
        F: Fn(&T, &U) -> V,
    {
        let joint = ops::independent_product(
            (self.categories.as_slice(), self.space.weights()),
            (other.categories.as_slice(), other.space.weights()),
            operator,
        );
        let joint_len = joint.len();
        let combined = FiniteVariable::from_pairs(name, joint)?;
        debug!(
            "combined '{}' and '{}' into '{}': {} joint outcomes, {} categories",
            self.name,
            other.name,
            combined.name,
            joint_len,
            combined.len()
        );
        Ok(combined)
    }

    /// [`binop`](Self::binop) with a dynamically typed operand.
    ///
    /// Returns `Ok(None)` when `other` is not a `FiniteVariable<U>`: the
    /// operation is not supported for that operand, and the caller may try
    /// another combination.
    ///
    /// ```rust
    /// use drv::FiniteVariable;
    ///
    /// let coin = FiniteVariable::uniform("coin", vec![0_i32, 1]).unwrap();
    /// let not_a_variable = 3_i32;
    /// let result = coin
    ///     .binop_any::<i32, i32, _>(&not_a_variable, |a, b| a + b, "sum")
    ///     .unwrap();
    /// assert!(result.is_none());
    /// ```
    pub fn binop_any<U, V, F>(
        &self,
        other: &dyn Any,
        operator: F,
        name: impl Into<String>,
    ) -> Result<Option<FiniteVariable<V>>, ValidationError>
    where
        U: 'static,
        V: PartialEq,
        F: Fn(&T, &U) -> V,
    {
        match other.downcast_ref::<FiniteVariable<U>>() {
            Some(other) => self.binop(other, operator, name).map(Some),
            None => {
                trace!("binop on '{}': operand type not supported", self.name);
                Ok(None)
            }
        }
    }
}

impl<T: Eq + Hash> FiniteVariable<T> {
    /// [`new`](Self::new) with the duplicate check done through a hash
    /// index, in expected linear time instead of quadratic.
    ///
    /// ```rust
    /// use drv::FiniteVariable;
    ///
    /// let wide = FiniteVariable::new_hashed("wide", (0..100_000).collect(), vec![1.0; 100_000]).unwrap();
    /// assert_eq!(wide.ppf(1.0).unwrap(), &99_999);
    /// ```
    pub fn new_hashed(
        name: impl Into<String>,
        categories: Vec<T>,
        weights: Vec<f64>,
    ) -> Result<Self, ValidationError> {
        if categories.len() != weights.len() {
            return Err(ValidationError::LengthMismatch {
                categories: categories.len(),
                weights: weights.len(),
            });
        }
        if let Some((first, second)) = ops::find_duplicate_hashed(&categories) {
            return Err(ValidationError::DuplicateCategory { first, second });
        }
        Self::from_distinct(name, categories, weights)
    }

    /// [`from_pairs`](Self::from_pairs) with outcomes grouped through a hash
    /// index.
    pub fn from_pairs_hashed<I>(name: impl Into<String>, pairs: I) -> Result<Self, ValidationError>
    where
        T: Clone,
        I: IntoIterator<Item = (T, f64)>,
    {
        let (categories, weights) = ops::coalesce_hashed(pairs)?;
        Self::from_distinct(name, categories, weights)
    }
}

impl<T> FiniteVariable<T> {
    /// The variable's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The categories in canonical order.
    pub fn categories(&self) -> &[T] {
        &self.categories
    }

    /// The category at position `i`.
    pub fn category(&self, i: usize) -> Option<&T> {
        self.categories.get(i)
    }

    /// Normalized probabilities, aligned with [`categories`](Self::categories).
    pub fn weights(&self) -> &[f64] {
        self.space.weights()
    }

    /// The underlying probability space.
    pub fn space(&self) -> &ProbabilitySpace {
        &self.space
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Always false for a constructed variable.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// `(category, probability)` pairs in canonical order.
    pub fn items(&self) -> impl Iterator<Item = (&T, f64)> + '_ {
        self.categories
            .iter()
            .zip(self.space.weights().iter().copied())
    }

    /// A category of maximal probability.
    ///
    /// The mode is not unique in general; on ties the earliest category wins.
    pub fn mode(&self) -> &T {
        let mut best = 0;
        for (i, &p) in self.space.weights().iter().enumerate() {
            if p > self.space.weights()[best] {
                best = i;
            }
        }
        &self.categories[best]
    }

    /// Categories with strictly positive probability, in canonical order.
    pub fn support(&self) -> Vec<&T> {
        self.items()
            .filter(|&(_, p)| p > 0.0)
            .map(|(x, _)| x)
            .collect()
    }

    /// Percent point function (inverse cdf) at `q`: the first category
    /// whose cdf is at least `q`.
    ///
    /// Binary search over the precomputed cumulative sums, O(log n).
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::QuantileOutOfRange`] unless `0 < q <= 1`.
    pub fn ppf(&self, q: f64) -> Result<&T, DomainError> {
        if !(q > 0.0 && q <= 1.0) {
            return Err(DomainError::QuantileOutOfRange { q });
        }
        let i = self.space.quantile_index(q);
        trace!("ppf({q}) of '{}' at position {i}", self.name);
        Ok(&self.categories[i])
    }
}

impl<T> fmt::Display for FiniteVariable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl<T: PartialEq> SupportsPmf for FiniteVariable<T> {
    type Outcome = T;

    fn pmf(&self, k: &T) -> f64 {
        FiniteVariable::pmf(self, k)
    }
}

impl<T: PartialEq + fmt::Debug> SupportsCdf for FiniteVariable<T> {
    fn cdf(&self, k: &T) -> Result<f64, DomainError> {
        FiniteVariable::cdf(self, k)
    }

    fn ppf(&self, q: f64) -> Result<&T, DomainError> {
        FiniteVariable::ppf(self, q)
    }
}

impl<T: PartialEq> SupportsMode for FiniteVariable<T> {
    fn mode(&self) -> &T {
        FiniteVariable::mode(self)
    }

    fn support(&self) -> Vec<&T> {
        FiniteVariable::support(self)
    }
}

/// Wire form: `{"name": .., "categories": [..], "weights": [..]}`.
#[derive(Serialize)]
struct VariableRef<'a, T> {
    name: &'a str,
    categories: &'a [T],
    weights: &'a [f64],
}

#[derive(Deserialize)]
struct VariableDoc<T> {
    name: String,
    categories: Vec<T>,
    weights: Vec<f64>,
}

impl<T: Serialize> Serialize for FiniteVariable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        VariableRef {
            name: &self.name,
            categories: &self.categories,
            weights: self.space.weights(),
        }
        .serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for FiniteVariable<T>
where
    T: Deserialize<'de> + PartialEq,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let doc = VariableDoc::<T>::deserialize(deserializer)?;
        FiniteVariable::new(doc.name, doc.categories, doc.weights).map_err(serde::de::Error::custom)
    }
}
