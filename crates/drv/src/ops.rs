//! Pushforward helpers: coalescing equal outcomes and independent products.
//!
//! The general helpers only need `PartialEq`, so grouping is a linear scan
//! per outcome. The `_hashed` variants do the same work in expected linear
//! time for `Eq + Hash` outcomes. Either way the order of first occurrence
//! is preserved, which keeps the cdf of a coalesced variable meaningful.

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::ValidationError;
use crate::space::check_weight;

/// Positions of the first repeated outcome, if any.
pub(crate) fn find_duplicate<T: PartialEq>(outcomes: &[T]) -> Option<(usize, usize)> {
    for (second, x) in outcomes.iter().enumerate() {
        if let Some(first) = outcomes[..second].iter().position(|y| y == x) {
            return Some((first, second));
        }
    }
    None
}

/// [`find_duplicate`] through a hash index.
pub(crate) fn find_duplicate_hashed<T: Eq + Hash>(outcomes: &[T]) -> Option<(usize, usize)> {
    let mut seen: HashMap<&T, usize> = HashMap::with_capacity(outcomes.len());
    for (second, x) in outcomes.iter().enumerate() {
        if let Some(&first) = seen.get(x) {
            return Some((first, second));
        }
        seen.insert(x, second);
    }
    None
}

/// Group equal outcomes and sum their weights, keeping first-occurrence order.
///
/// Each weight is checked before merging, so an error names the position of
/// the offending pair in the input.
pub(crate) fn coalesce<T, I>(pairs: I) -> Result<(Vec<T>, Vec<f64>), ValidationError>
where
    T: PartialEq,
    I: IntoIterator<Item = (T, f64)>,
{
    let mut outcomes: Vec<T> = Vec::new();
    let mut weights: Vec<f64> = Vec::new();
    for (index, (x, w)) in pairs.into_iter().enumerate() {
        check_weight(index, w)?;
        match outcomes.iter().position(|y| *y == x) {
            Some(i) => weights[i] += w,
            None => {
                outcomes.push(x);
                weights.push(w);
            }
        }
    }
    Ok((outcomes, weights))
}

/// [`coalesce`] through a hash index.
pub(crate) fn coalesce_hashed<T, I>(pairs: I) -> Result<(Vec<T>, Vec<f64>), ValidationError>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = (T, f64)>,
{
    let mut positions: HashMap<T, usize> = HashMap::new();
    let mut outcomes: Vec<T> = Vec::new();
    let mut weights: Vec<f64> = Vec::new();
    for (index, (x, w)) in pairs.into_iter().enumerate() {
        check_weight(index, w)?;
        match positions.get(&x) {
            Some(&i) => weights[i] += w,
            None => {
                positions.insert(x.clone(), outcomes.len());
                outcomes.push(x);
                weights.push(w);
            }
        }
    }
    Ok((outcomes, weights))
}

/// Joint outcomes of two independent variables under `operator`.
///
/// Pairs are visited left-major: every right outcome for `left[0]`, then for
/// `left[1]`, and so on. Weights multiply.
pub(crate) fn independent_product<T, U, V, F>(
    left: (&[T], &[f64]),
    right: (&[U], &[f64]),
    operator: F,
) -> Vec<(V, f64)>
where
    F: Fn(&T, &U) -> V,
{
    let (xs, ps) = left;
    let (ys, qs) = right;
    let mut joint = Vec::with_capacity(xs.len() * ys.len());
    for (x, &p) in xs.iter().zip(ps) {
        for (y, &q) in ys.iter().zip(qs) {
            joint.push((operator(x, y), p * q));
        }
    }
    joint
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_duplicate() {
        assert_eq!(find_duplicate(&[1, 2, 3]), None);
        assert_eq!(find_duplicate(&[1, 2, 1, 2]), Some((0, 2)));
        assert_eq!(find_duplicate::<i32>(&[]), None);
    }

    #[test]
    fn test_find_duplicate_hashed_agrees() {
        for outcomes in [vec![1, 2, 3], vec![1, 2, 1, 2], vec![5, 4, 4, 5], vec![]] {
            assert_eq!(find_duplicate_hashed(&outcomes), find_duplicate(&outcomes));
        }
    }

    #[test]
    fn test_coalesce_preserves_first_occurrence_order() {
        let pairs = vec![("b", 0.1), ("a", 0.2), ("b", 0.3), ("c", 0.4)];
        for (xs, ps) in [
            coalesce(pairs.clone()).unwrap(),
            coalesce_hashed(pairs).unwrap(),
        ] {
            assert_eq!(xs, vec!["b", "a", "c"]);
            assert!((ps[0] - 0.4).abs() < 1e-12);
            assert!((ps[1] - 0.2).abs() < 1e-12);
            assert!((ps[2] - 0.4).abs() < 1e-12);
        }
    }

    #[test]
    fn test_coalesce_reports_input_position() {
        let pairs = vec![('a', 1.0), ('b', 1.0), ('a', 1.0), ('b', -1.0)];
        let expected = Err(ValidationError::NegativeWeight {
            index: 3,
            value: -1.0,
        });
        assert_eq!(coalesce(pairs.clone()), expected);
        assert_eq!(coalesce_hashed(pairs), expected);

        let result = coalesce(vec![('a', 1.0), ('a', f64::NAN)]);
        assert!(matches!(
            result,
            Err(ValidationError::NonFiniteWeight { index: 1, .. })
        ));
    }

    #[test]
    fn test_independent_product() {
        let joint = independent_product(
            (&[0, 1][..], &[0.5, 0.5][..]),
            (&[10, 20][..], &[0.25, 0.75][..]),
            |a, b| a + b,
        );
        assert_eq!(
            joint,
            vec![(10, 0.125), (20, 0.375), (11, 0.125), (21, 0.375)]
        );
    }
}
