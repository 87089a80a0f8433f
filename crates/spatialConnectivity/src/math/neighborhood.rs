//! Exact k-nearest-neighbor search using Rayon.
//!
//! ## Purpose
//!
//! This module defines the narrow oracle interface the connectivity builder
//! consumes, and ships one exact, brute-force implementation of it. The
//! per-point searches are independent and run in parallel when enabled.
//!
//! ## Design notes
//!
//! * **Oracle Trait**: `NeighborOracle` is the only seam between the builder
//!   and neighbor search, so approximate or tree-based backends can be
//!   substituted without touching the engine.
//! * **Bounded Buffer**: Each query keeps its `k` best candidates in a small
//!   sorted buffer, reused per thread via `map_init`-style initialisation.
//! * **Disjoint Output**: Threads write into disjoint `k`-wide chunks of the
//!   flat output arrays, so no synchronisation is needed.
//!
//! ## Key concepts
//!
//! * **Self-exclusion**: A point is never its own neighbor, even when another
//!   point shares its coordinates.
//! * **Tie-breaking**: Equal distances are ordered by ascending neighbor index.
//!
//! ## Invariants
//!
//! * Parallel search produces output identical to sequential search.
//! * Every row holds exactly `k` neighbors sorted by ascending distance.
//!
//! ## Non-goals
//!
//! * This module does not build spatial index structures.
//! * This module does not implement approximate search.

// Feature-gated imports
#[cfg(feature = "cpu")]
use rayon::prelude::*;

// External dependencies
use num_traits::Float;
use std::fmt::Debug;

// Internal dependencies
use crate::input::RowMajor;
use crate::math::distance::DistanceMetric;
use crate::primitives::errors::SpatialError;

// ============================================================================
// Neighbor Result
// ============================================================================

/// Flattened k-nearest-neighbor result.
///
/// Row `i` (entries `i*k .. (i+1)*k`) holds the neighbors of point `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborResult<T> {
    k: usize,
    indices: Vec<usize>,
    distances: Vec<T>,
}

impl<T: Float> NeighborResult<T> {
    /// Assemble a result from flat, parallel index and distance arrays.
    pub fn from_parts(
        k: usize,
        indices: Vec<usize>,
        distances: Vec<T>,
    ) -> Result<Self, SpatialError> {
        if k == 0 {
            return Err(SpatialError::OracleError(
                "neighbor result must have k >= 1".to_string(),
            ));
        }
        if indices.len() != distances.len() || indices.len() % k != 0 {
            return Err(SpatialError::OracleError(format!(
                "malformed neighbor result: {} indices, {} distances, k = {}",
                indices.len(),
                distances.len(),
                k
            )));
        }
        Ok(Self {
            k,
            indices,
            distances,
        })
    }

    /// Neighbors per point.
    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of query points.
    #[inline]
    pub fn n_points(&self) -> usize {
        self.indices.len() / self.k
    }

    /// Flat neighbor indices (the row endpoint of each candidate edge).
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Flat neighbor distances, parallel to `indices`.
    #[inline]
    pub fn distances(&self) -> &[T] {
        &self.distances
    }

    /// `(neighbor, distance)` pairs of point `i`.
    pub fn neighbors_of(&self, i: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let span = i * self.k..(i + 1) * self.k;
        self.indices[span.clone()]
            .iter()
            .copied()
            .zip(self.distances[span].iter().copied())
    }

    /// Candidate edges as `(row, col, distance)`, where `row` is the neighbor
    /// and `col` the querying point.
    pub fn candidate_edges(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        let k = self.k;
        self.indices
            .iter()
            .zip(self.distances.iter())
            .enumerate()
            .map(move |(j, (&row, &d))| (row, j / k, d))
    }

    /// Check the oracle contract against the query that produced this result.
    pub(crate) fn validate(&self, n_points: usize, k: usize) -> Result<(), SpatialError> {
        if self.k != k || self.n_points() != n_points {
            return Err(SpatialError::OracleError(format!(
                "expected {} neighbors for each of {} points, got {} for {}",
                k,
                n_points,
                self.k,
                self.n_points()
            )));
        }

        for (row, col, d) in self.candidate_edges() {
            if row >= n_points {
                return Err(SpatialError::OracleError(format!(
                    "neighbor index {} out of range for {} points",
                    row, n_points
                )));
            }
            if row == col {
                return Err(SpatialError::OracleError(format!(
                    "point {} listed as its own neighbor",
                    col
                )));
            }
            if !d.is_finite() || d < T::zero() {
                return Err(SpatialError::OracleError(format!(
                    "invalid distance between points {} and {}",
                    col, row
                )));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Oracle Interface
// ============================================================================

/// Exact k-nearest-neighbor service.
///
/// Implementations return, for every point, its `k` nearest *other* points
/// sorted by ascending distance. Callers guarantee `1 <= k < n_points`.
pub trait NeighborOracle<T: Float>: Debug + Send + Sync {
    /// Search `k` neighbors of every point under `metric`.
    fn knn(
        &self,
        points: &RowMajor<'_, T>,
        k: usize,
        metric: &DistanceMetric<T>,
    ) -> Result<NeighborResult<T>, SpatialError>;
}

// ============================================================================
// Exact Brute-Force Oracle
// ============================================================================

/// Exact brute-force neighbor search, parallel over query points.
#[derive(Debug, Clone, Copy)]
pub struct ExactNeighbors {
    parallel: bool,
}

impl Default for ExactNeighbors {
    fn default() -> Self {
        Self::new()
    }
}

impl ExactNeighbors {
    /// Parallel exact search.
    pub fn new() -> Self {
        Self { parallel: true }
    }

    /// Set parallel execution mode.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl<T: Float + Send + Sync> NeighborOracle<T> for ExactNeighbors {
    fn knn(
        &self,
        points: &RowMajor<'_, T>,
        k: usize,
        metric: &DistanceMetric<T>,
    ) -> Result<NeighborResult<T>, SpatialError> {
        let n = points.n_rows();
        if k == 0 || k >= n {
            return Err(SpatialError::OracleError(format!(
                "cannot return {} neighbors per point from {} points",
                k, n
            )));
        }

        if let Some(pos) = points.as_slice().iter().position(|v| !v.is_finite()) {
            return Err(SpatialError::OracleError(format!(
                "non-finite coordinate in point {}",
                pos / points.dims()
            )));
        }

        let mut indices = vec![0usize; n * k];
        let mut distances = vec![T::zero(); n * k];

        if self.parallel {
            search_parallel(points, k, metric, &mut indices, &mut distances)?;
        } else {
            search_sequential(points, k, metric, &mut indices, &mut distances)?;
        }

        NeighborResult::from_parts(k, indices, distances)
    }
}

/// Sorted buffer of the best `capacity` candidates seen so far.
struct NeighborBuffer<T> {
    capacity: usize,
    entries: Vec<(T, usize)>,
}

impl<T: Float> NeighborBuffer<T> {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity + 1),
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    /// Offer a candidate. Candidates arrive in ascending index order, so an
    /// equal distance never displaces an earlier entry.
    #[inline]
    fn push(&mut self, dist: T, index: usize) {
        let full = self.entries.len() == self.capacity;
        if full {
            if let Some(&(worst, _)) = self.entries.last() {
                if dist >= worst {
                    return;
                }
            }
        }

        let pos = self.entries.partition_point(|&(d, _)| d <= dist);
        if full {
            self.entries.pop();
        }
        self.entries.insert(pos, (dist, index));
    }
}

fn search_point<T: Float>(
    points: &RowMajor<'_, T>,
    i: usize,
    metric: &DistanceMetric<T>,
    buffer: &mut NeighborBuffer<T>,
    idx_out: &mut [usize],
    dist_out: &mut [T],
) -> Result<(), SpatialError> {
    buffer.clear();
    let query = points.row(i);

    for j in 0..points.n_rows() {
        if j == i {
            continue;
        }
        let d = metric.distance(query, points.row(j));
        if !d.is_finite() {
            // Finite coordinates whose difference exceeds the float range.
            return Err(SpatialError::OracleError(format!(
                "{} distance between points {} and {} is not representable",
                metric.name(),
                i,
                j
            )));
        }
        buffer.push(d, j);
    }

    for (slot, &(d, j)) in buffer.entries.iter().enumerate() {
        idx_out[slot] = j;
        dist_out[slot] = d;
    }

    Ok(())
}

fn search_sequential<T: Float>(
    points: &RowMajor<'_, T>,
    k: usize,
    metric: &DistanceMetric<T>,
    indices: &mut [usize],
    distances: &mut [T],
) -> Result<(), SpatialError> {
    let mut buffer = NeighborBuffer::new(k);
    indices
        .chunks_mut(k)
        .zip(distances.chunks_mut(k))
        .enumerate()
        .try_for_each(|(i, (idx_out, dist_out))| {
            search_point(points, i, metric, &mut buffer, idx_out, dist_out)
        })
}

#[cfg(feature = "cpu")]
fn search_parallel<T: Float + Send + Sync>(
    points: &RowMajor<'_, T>,
    k: usize,
    metric: &DistanceMetric<T>,
    indices: &mut [usize],
    distances: &mut [T],
) -> Result<(), SpatialError> {
    indices
        .par_chunks_mut(k)
        .zip(distances.par_chunks_mut(k))
        .enumerate()
        .try_for_each_init(
            || NeighborBuffer::new(k),
            |buffer, (i, (idx_out, dist_out))| {
                search_point(points, i, metric, buffer, idx_out, dist_out)
            },
        )
}

/// Fallback for non-CPU targets.
#[cfg(not(feature = "cpu"))]
fn search_parallel<T: Float + Send + Sync>(
    points: &RowMajor<'_, T>,
    k: usize,
    metric: &DistanceMetric<T>,
    indices: &mut [usize],
    distances: &mut [T],
) -> Result<(), SpatialError> {
    search_sequential(points, k, metric, indices, distances)
}
