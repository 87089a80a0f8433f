//! Distance metrics for neighbor search.
//!
//! ## Purpose
//!
//! This module defines the metrics the neighbor oracle can rank points by.
//!
//! ## Design notes
//!
//! * **Rescaled powers**: Euclidean and Minkowski divide every coordinate
//!   difference by the largest one before raising it to `p`, then multiply the
//!   root back. Intermediate terms stay in `[0, 1]`, so any pair of finite
//!   points whose difference is representable yields a finite distance,
//!   whatever the coordinate scale or the exponent.
//!
//! ## Invariants
//!
//! * NaN differences propagate to the distance.
//! * Every metric is absolutely homogeneous: scaling both points by `s > 0`
//!   scales the distance by `s` (exactly, for powers of two).

// External dependencies
use num_traits::Float;

/// Distance metric used to rank neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DistanceMetric<T> {
    /// L2 distance.
    #[default]
    Euclidean,
    /// L1 distance.
    Manhattan,
    /// L-infinity distance.
    Chebyshev,
    /// Lp distance with `p >= 1`.
    Minkowski(T),
}

impl<T: Float> DistanceMetric<T> {
    /// Distance between `a` and `b`.
    #[inline]
    pub fn distance(&self, a: &[T], b: &[T]) -> T {
        match *self {
            DistanceMetric::Euclidean => scaled_norm(a, b, |r| r * r, |s| s.sqrt()),
            DistanceMetric::Manhattan => abs_diffs(a, b).fold(T::zero(), |acc, d| acc + d),
            DistanceMetric::Chebyshev => abs_diffs(a, b).fold(T::zero(), nan_max),
            DistanceMetric::Minkowski(p) => {
                scaled_norm(a, b, |r| r.powf(p), |s| s.powf(p.recip()))
            }
        }
    }

    /// Short lowercase name, used in log output.
    pub fn name(&self) -> &'static str {
        match self {
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::Manhattan => "manhattan",
            DistanceMetric::Chebyshev => "chebyshev",
            DistanceMetric::Minkowski(_) => "minkowski",
        }
    }
}

#[inline]
fn abs_diffs<'a, T: Float>(a: &'a [T], b: &'a [T]) -> impl Iterator<Item = T> + 'a {
    a.iter().zip(b.iter()).map(|(&x, &y)| (x - y).abs())
}

/// `max` that keeps NaN instead of skipping it.
#[inline]
fn nan_max<T: Float>(acc: T, d: T) -> T {
    if acc.is_nan() || d.is_nan() {
        T::nan()
    } else {
        acc.max(d)
    }
}

/// `scale * root(sum(pow(|a_i - b_i| / scale)))` with `scale` the largest difference.
#[inline]
fn scaled_norm<T, P, R>(a: &[T], b: &[T], pow: P, root: R) -> T
where
    T: Float,
    P: Fn(T) -> T,
    R: Fn(T) -> T,
{
    let scale = abs_diffs(a, b).fold(T::zero(), nan_max);
    if scale == T::zero() || !scale.is_finite() {
        return scale;
    }

    let sum = abs_diffs(a, b).fold(T::zero(), |acc, d| acc + pow(d / scale));
    scale * root(sum)
}
