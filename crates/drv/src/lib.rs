//! # DRV - Finite Discrete Random Variables
//!
//! A discrete random variable is a probability space paired with a function
//! from that space into an outcome set. This crate implements the finite,
//! categorical case: a list of outcomes, each bound by position to a weight.
//!
//! ## Core Concepts
//!
//! - **Probability spaces are normalized once**: raw weights are validated and
//!   rescaled to sum to 1 at construction, with prefix sums cached
//! - **Order is part of the variable**: the cdf sums weights in the stored
//!   order of the categories, not in any order of the outcome values
//! - **Pushforward is composition**: `map` transports probability along a
//!   function, merging outcomes that collide
//! - **Independent combination**: `binop` builds the product space of two
//!   variables and pushes it forward through a binary operator
//! - **Capabilities, not stubs**: pmf, cdf and mode are separate traits, so
//!   future variants implement only what they can answer
//!
//! ## Example: Two Dice
//!
//! ```rust
//! use drv::FiniteVariable;
//!
//! let d6 = FiniteVariable::uniform("d6", vec![1, 2, 3, 4, 5, 6]).unwrap();
//!
//! // Fair die
//! assert!((d6.pmf(&3) - 1.0 / 6.0).abs() < 1e-9);
//! assert!((d6.cdf(&3).unwrap() - 0.5).abs() < 1e-9);
//! assert_eq!(d6.ppf(0.5).unwrap(), &3);
//!
//! // Sum of two independent dice
//! let total = d6.binop(&d6, |a, b| a + b, "2d6").unwrap();
//! assert_eq!(total.mode(), &7);
//!
//! // Is the total even?
//! let even = total.map(|t| t % 2 == 0, "even", true).unwrap();
//! assert!((even.pmf(&true) - 0.5).abs() < 1e-9);
//! ```

mod capability;
mod error;
mod finite;
mod ops;
mod space;

pub use capability::{total_mass, SupportsCdf, SupportsMode, SupportsPmf};
pub use error::{DomainError, DrvError, ValidationError};
pub use finite::FiniteVariable;
pub use space::ProbabilitySpace;

/// Tolerance for probability comparisons.
pub const PROB_TOLERANCE: f64 = 1e-9;
