//! Connectivity execution engine.
//!
//! ## Purpose
//!
//! This module runs the single pass that turns coordinates into a sparse
//! adjacency matrix: neighbor search, global cutoff, strict masking, and
//! sparse assembly.
//!
//! ## Design notes
//!
//! * **Oracle injection**: The neighbor search is passed in as a
//!   `NeighborOracle`, so the pass never depends on a concrete backend.
//! * **Contract checks**: Oracle output is validated before use; a malformed
//!   result surfaces as `OracleError` instead of a corrupt matrix.
//! * **Additive assembly**: Edges go through a triplet matrix, whose CSR
//!   conversion sums colliding coordinates.
//!
//! ## Key concepts
//!
//! * **Edge orientation**: Candidate edge `j` is `(neighbor, query point)`, so
//!   column `i` lists the retained neighbors of point `i`.
//! * **Effective k**: `min(n_neighbors, N - 1)`.
//!
//! ## Invariants
//!
//! * Output shape is `(N, N)` and the diagonal is empty.
//! * Either a fully assembled matrix is returned or an error, never both.
//!
//! ## Non-goals
//!
//! * This module does not parse or validate builder parameters (handled by the API layer).

// External dependencies
use log::{debug, trace};
use num_traits::Float;
use sprs::{CsMat, TriMat};
use std::collections::BTreeMap;
use std::fmt::Debug;

// Internal dependencies
use crate::input::RowMajor;
use crate::math::cutoff::{distance_cutoff, edge_mask};
use crate::math::distance::DistanceMetric;
use crate::math::neighborhood::NeighborOracle;
use crate::primitives::errors::SpatialError;

// ============================================================================
// Pass Configuration
// ============================================================================

/// Settings consumed by a single connectivity pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectivityParams<T> {
    /// Requested neighbors per point.
    pub n_neighbors: usize,
    /// Multiplier applied to the median candidate distance.
    pub cutoff_factor: T,
    /// Metric used for neighbor ranking and the cutoff.
    pub distance_metric: DistanceMetric<T>,
    /// Return `max(A, Aᵀ)` instead of the directed matrix.
    pub symmetrize: bool,
}

/// Neighbors actually requested from the oracle for `n_points` points.
#[inline]
pub fn effective_neighbors(n_points: usize, requested: usize) -> usize {
    requested.min(n_points.saturating_sub(1))
}

// ============================================================================
// Connectivity Pass
// ============================================================================

/// Build the `N × N` connectivity matrix for `points`.
pub fn connectivity_pass<T>(
    points: &RowMajor<'_, T>,
    params: &ConnectivityParams<T>,
    oracle: &dyn NeighborOracle<T>,
) -> Result<CsMat<T>, SpatialError>
where
    T: Float + Debug + Send + Sync,
{
    let n = points.n_rows();
    if n < 2 {
        return Err(SpatialError::InvalidInput(format!(
            "need at least 2 points, got {}",
            n
        )));
    }

    let k = effective_neighbors(n, params.n_neighbors);
    if k < params.n_neighbors {
        debug!(
            "Only {} points available: clamping n_neighbors {} -> {}",
            n, params.n_neighbors, k
        );
    }
    debug!(
        "Spatial connectivity: {} points x {} dims, k={}, metric={}",
        n,
        points.dims(),
        k,
        params.distance_metric.name()
    );

    // Step 1: candidate edges from the oracle
    let neighbors = oracle.knn(points, k, &params.distance_metric)?;
    neighbors.validate(n, k)?;

    // Step 2: global cutoff
    let threshold = distance_cutoff(neighbors.distances(), params.cutoff_factor)?;
    trace!("Distance cutoff {:?} (factor {:?})", threshold, params.cutoff_factor);

    // Step 3: strict mask
    let mask = edge_mask(neighbors.distances(), threshold);

    // Step 4: assembly
    let edges = neighbors
        .candidate_edges()
        .zip(mask.iter())
        .filter(|(_, keep)| **keep)
        .map(|((row, col, _), _)| (row, col));
    let adjacency = assemble_adjacency(n, edges);

    debug!(
        "Kept {} of {} candidate edges",
        adjacency.nnz(),
        neighbors.indices().len()
    );

    if params.symmetrize {
        let sym = symmetrize_max(&adjacency);
        debug!(
            "Symmetrized adjacency: {} -> {} stored entries",
            adjacency.nnz(),
            sym.nnz()
        );
        return Ok(sym);
    }

    Ok(adjacency)
}

// ============================================================================
// Sparse Assembly
// ============================================================================

/// Assemble an `n × n` CSR matrix with a `1` per `(row, col)` edge.
///
/// Repeated edges accumulate: an edge listed twice is stored as `2`.
pub fn assemble_adjacency<T, E>(n: usize, edges: E) -> CsMat<T>
where
    T: Float,
    E: IntoIterator<Item = (usize, usize)>,
{
    let mut tri = TriMat::new((n, n));
    for (row, col) in edges {
        tri.add_triplet(row, col, T::one());
    }
    tri.to_csr()
}

/// Elementwise `max(A, Aᵀ)` of a square matrix, returned in CSR form.
pub fn symmetrize_max<T: Float>(a: &CsMat<T>) -> CsMat<T> {
    let mut merged: BTreeMap<(usize, usize), T> = BTreeMap::new();
    for (&v, (row, col)) in a.iter() {
        for key in [(row, col), (col, row)] {
            merged
                .entry(key)
                .and_modify(|cur| *cur = cur.max(v))
                .or_insert(v);
        }
    }

    let mut tri = TriMat::with_capacity(a.shape(), merged.len());
    for ((row, col), v) in merged {
        tri.add_triplet(row, col, v);
    }
    tri.to_csr()
}
