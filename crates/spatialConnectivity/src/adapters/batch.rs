//! Batch adapter for spatial connectivity.
//!
//! ## Purpose
//!
//! This module provides the batch execution adapter. It handles complete point
//! sets in memory, either one at a time or many independent sets at once.
//!
//! ## Design notes
//!
//! * **Processing**: Each point set is processed in a single pass.
//! * **Delegation**: Delegates computation to the execution engine.
//! * **Parallelism**: The bundled oracle searches in parallel via `rayon`, and
//!   `fit_many` spreads independent point sets across the thread pool.
//! * **Generics**: Generic over `Float` types.
//!
//! ## Key concepts
//!
//! * **Batch Processing**: Validates, executes, and returns results.
//! * **Oracle Override**: A custom `NeighborOracle` replaces the exact search.
//!
//! ## Invariants
//!
//! * At least 2 points are required per set.
//! * Output order of `fit_many` matches input order.
//! * A processor holds no mutable state; `fit` may be called concurrently.
//!
//! ## Non-goals
//!
//! * This adapter does not cache results between calls.
//! * This adapter does not merge graphs across point sets.

// Feature-gated imports
#[cfg(feature = "cpu")]
use rayon::prelude::*;

// External dependencies
use num_traits::Float;
use sprs::CsMat;
use std::fmt::Debug;
use std::sync::Arc;

// Internal dependencies
use crate::api::ConnectivityBuilder;
use crate::engine::executor::{connectivity_pass, ConnectivityParams};
use crate::input::MatrixInput;
use crate::math::distance::DistanceMetric;
use crate::math::neighborhood::{ExactNeighbors, NeighborOracle};
use crate::primitives::errors::SpatialError;

// ============================================================================
// Batch Connectivity Builder
// ============================================================================

/// Builder for the batch connectivity processor.
#[derive(Debug, Clone)]
pub struct BatchConnectivityBuilder<T: Float> {
    /// Shared configuration
    pub base: ConnectivityBuilder<T>,
    /// Neighbor search backend; the exact oracle when unset
    pub oracle: Option<Arc<dyn NeighborOracle<T>>>,
}

impl<T: Float + Debug + Send + Sync + 'static> Default for BatchConnectivityBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float + Debug + Send + Sync + 'static> BatchConnectivityBuilder<T> {
    /// Create a new batch builder with default parameters.
    ///
    /// # Defaults
    ///
    /// * All base parameters from `ConnectivityBuilder`
    /// * parallel: true
    fn new() -> Self {
        Self::from_base(ConnectivityBuilder::new().parallel(true))
    }

    pub(crate) fn from_base(base: ConnectivityBuilder<T>) -> Self {
        Self { base, oracle: None }
    }

    /// Set parallel execution mode.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.base.parallel = Some(parallel);
        self
    }

    /// Replace the exact neighbor search with a custom backend.
    pub fn oracle<O: NeighborOracle<T> + 'static>(mut self, oracle: O) -> Self {
        let oracle: Arc<dyn NeighborOracle<T>> = Arc::new(oracle);
        self.oracle = Some(oracle);
        self
    }

    // ========================================================================
    // Shared Setters
    // ========================================================================

    /// Set the number of neighbors queried per point.
    pub fn n_neighbors(mut self, k: usize) -> Self {
        self.base.n_neighbors = k;
        self
    }

    /// Set the multiplier applied to the median neighbor distance.
    pub fn cutoff_factor(mut self, factor: T) -> Self {
        self.base.cutoff_factor = factor;
        self
    }

    /// Set the distance metric.
    pub fn distance_metric(mut self, metric: DistanceMetric<T>) -> Self {
        self.base.distance_metric = metric;
        self
    }

    /// Force an undirected result via `max(A, Aᵀ)`.
    pub fn symmetrize(mut self, enabled: bool) -> Self {
        self.base.symmetrize = enabled;
        self
    }

    // ========================================================================
    // Build Method
    // ========================================================================

    /// Build the batch processor.
    pub fn build(self) -> Result<BatchConnectivity<T>, SpatialError> {
        let params = self.base.validate()?;
        let parallel = self.base.parallel.unwrap_or(true);

        let oracle: Arc<dyn NeighborOracle<T>> = match self.oracle {
            Some(oracle) => oracle,
            None => Arc::new(ExactNeighbors::new().parallel(parallel)),
        };

        Ok(BatchConnectivity {
            params,
            parallel,
            oracle,
        })
    }
}

// ============================================================================
// Batch Connectivity Processor
// ============================================================================

/// Batch connectivity processor.
#[derive(Debug, Clone)]
pub struct BatchConnectivity<T: Float> {
    params: ConnectivityParams<T>,
    #[cfg_attr(not(feature = "cpu"), allow(dead_code))]
    parallel: bool,
    oracle: Arc<dyn NeighborOracle<T>>,
}

impl<T: Float + Debug + Send + Sync + 'static> BatchConnectivity<T> {
    /// Validated engine settings.
    pub fn params(&self) -> &ConnectivityParams<T> {
        &self.params
    }

    /// Build the `N × N` connectivity matrix of one point set.
    pub fn fit<I>(&self, coords: &I) -> Result<CsMat<T>, SpatialError>
    where
        I: MatrixInput<T> + ?Sized,
    {
        let points = coords.as_row_major()?;
        connectivity_pass(&points, &self.params, self.oracle.as_ref())
    }

    /// Build one connectivity matrix per point set, in input order.
    ///
    /// Stops at the first failing set.
    pub fn fit_many<I>(&self, sets: &[I]) -> Result<Vec<CsMat<T>>, SpatialError>
    where
        I: MatrixInput<T> + Sync,
    {
        #[cfg(feature = "cpu")]
        {
            if self.parallel {
                return sets.par_iter().map(|coords| self.fit(coords)).collect();
            }
        }

        sets.iter().map(|coords| self.fit(coords)).collect()
    }
}
