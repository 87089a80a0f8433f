//! Median-derived distance cutoff.
//!
//! ## Purpose
//!
//! This module computes the single global threshold that prunes candidate
//! edges: `median(all candidate distances) × factor`. A regular grid yields a
//! tight cluster of nearest-neighbor distances, so the median tracks the
//! typical spacing, and neighbors on sparse or boundary regions fall above it.
//!
//! ## Key concepts
//!
//! * **Median**: For an even count, the mean of the two middle values.
//! * **Strict Mask**: A distance equal to the threshold is excluded.
//!
//! ## Invariants
//!
//! * The cutoff is computed once over the flattened `N·k` distances, never per point.
//! * Scaling every distance by `s > 0` scales the cutoff by `s`.

// External dependencies
use num_traits::Float;
use std::cmp::Ordering::Equal;

// Internal dependencies
use crate::primitives::errors::SpatialError;

/// Default slack applied to the median neighbor distance.
pub const DEFAULT_CUTOFF_FACTOR: f64 = 1.3;

/// Median of `values`, or `None` when empty.
pub fn median<T: Float>(values: &[T]) -> Option<T> {
    let n = values.len();
    if n == 0 {
        return None;
    }

    let mut scratch = values.to_vec();
    let mid = n / 2;
    let (lower, upper, _) =
        scratch.select_nth_unstable_by(mid, |a, b| a.partial_cmp(b).unwrap_or(Equal));
    let upper = *upper;

    if n % 2 == 1 {
        return Some(upper);
    }

    // Everything left of `mid` is <= upper, so its maximum is the other middle value.
    let lower = lower
        .iter()
        .copied()
        .fold(T::neg_infinity(), |acc, v| acc.max(v));
    let two = T::one() + T::one();
    Some((lower + upper) / two)
}

/// Global distance cutoff: `median(distances) * factor`.
pub fn distance_cutoff<T: Float>(distances: &[T], factor: T) -> Result<T, SpatialError> {
    median(distances).map(|m| m * factor).ok_or_else(|| {
        SpatialError::OracleError("no candidate distances to derive a cutoff from".to_string())
    })
}

/// Strict keep-mask: `distances[j] < threshold`.
pub fn edge_mask<T: Float>(distances: &[T], threshold: T) -> Vec<bool> {
    distances.iter().map(|&d| d < threshold).collect()
}
