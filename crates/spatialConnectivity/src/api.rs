//! High-level API for spatial connectivity.
//!
//! ## Purpose
//!
//! This module provides the primary user-facing entry point. It implements a
//! fluent builder for the connectivity parameters and the selection of an
//! execution adapter.
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builder with defaults matching hexagonal spot grids
//!   (6 neighbors, 1.3 × median cutoff, Euclidean distance).
//! * **Polymorphic**: Marker types transition to specialized adapter builders.
//! * **Validated**: Parameters are checked when `.build()` is called.
//! * **Type-Safe**: Generic over `Float` types for flexible precision.
//!
//! ### Configuration Flow
//!
//! 1. Create a [`ConnectivityBuilder`](crate::api::ConnectivityBuilder) via `SpatialConnectivity::new()`.
//! 2. Chain configuration methods (`.n_neighbors()`, `.cutoff_factor()`, etc.).
//! 3. Select an adapter via `.adapter(Adapter::Batch)` to get an execution builder.
//! 4. Call `.build()` and then `.fit(&coords)`.

// External dependencies
use num_traits::Float;
use sprs::CsMat;
use std::fmt::Debug;

// Internal dependencies
use crate::adapters::batch::BatchConnectivityBuilder;
use crate::engine::executor::ConnectivityParams;
use crate::input::MatrixInput;
use crate::math::cutoff::DEFAULT_CUTOFF_FACTOR;

// Publicly re-exported types
pub use crate::math::distance::DistanceMetric;
pub use crate::primitives::errors::SpatialError;

/// Default number of neighbors queried per point.
pub const DEFAULT_N_NEIGHBORS: usize = 6;

// ============================================================================
// Base Builder
// ============================================================================

/// Adapter-independent connectivity configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectivityBuilder<T> {
    /// Neighbors requested per point.
    pub n_neighbors: usize,
    /// Multiplier applied to the median neighbor distance.
    pub cutoff_factor: T,
    /// Metric for neighbor ranking.
    pub distance_metric: DistanceMetric<T>,
    /// Whether to return `max(A, Aᵀ)`.
    pub symmetrize: bool,
    /// Parallel execution; `None` lets the adapter choose.
    pub parallel: Option<bool>,
}

impl<T: Float> Default for ConnectivityBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> ConnectivityBuilder<T> {
    /// Create a builder with default parameters.
    pub fn new() -> Self {
        Self {
            n_neighbors: DEFAULT_N_NEIGHBORS,
            cutoff_factor: T::from(DEFAULT_CUTOFF_FACTOR).unwrap_or(T::one()),
            distance_metric: DistanceMetric::Euclidean,
            symmetrize: false,
            parallel: None,
        }
    }

    /// Set the number of neighbors queried per point.
    pub fn n_neighbors(mut self, k: usize) -> Self {
        self.n_neighbors = k;
        self
    }

    /// Set the multiplier applied to the median neighbor distance.
    pub fn cutoff_factor(mut self, factor: T) -> Self {
        self.cutoff_factor = factor;
        self
    }

    /// Set the distance metric.
    pub fn distance_metric(mut self, metric: DistanceMetric<T>) -> Self {
        self.distance_metric = metric;
        self
    }

    /// Force an undirected result via `max(A, Aᵀ)`.
    pub fn symmetrize(mut self, enabled: bool) -> Self {
        self.symmetrize = enabled;
        self
    }

    /// Set parallel execution mode.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Select an execution adapter.
    pub fn adapter<A: ConnectivityAdapter<T>>(self, _adapter: A) -> A::Output {
        A::convert(self)
    }

    /// Check every parameter and produce the engine settings.
    pub fn validate(&self) -> Result<ConnectivityParams<T>, SpatialError> {
        if self.n_neighbors == 0 {
            return Err(SpatialError::InvalidParameter {
                param: "n_neighbors",
                value: self.n_neighbors.to_string(),
                constraint: ">= 1",
            });
        }

        if !self.cutoff_factor.is_finite() || self.cutoff_factor <= T::zero() {
            return Err(SpatialError::InvalidParameter {
                param: "cutoff_factor",
                value: format_float(self.cutoff_factor),
                constraint: "finite and > 0",
            });
        }

        if let DistanceMetric::Minkowski(p) = self.distance_metric {
            if !p.is_finite() || p < T::one() {
                return Err(SpatialError::InvalidParameter {
                    param: "distance_metric",
                    value: format!("minkowski(p = {})", format_float(p)),
                    constraint: "finite p >= 1",
                });
            }
        }

        Ok(ConnectivityParams {
            n_neighbors: self.n_neighbors,
            cutoff_factor: self.cutoff_factor,
            distance_metric: self.distance_metric,
            symmetrize: self.symmetrize,
        })
    }
}

fn format_float<T: Float>(v: T) -> String {
    match v.to_f64() {
        Some(x) => x.to_string(),
        None => "NaN".to_string(),
    }
}

// ============================================================================
// Adapter Selection
// ============================================================================

/// Conversion from the base builder into an adapter-specific builder.
pub trait ConnectivityAdapter<T> {
    /// Adapter-specific builder.
    type Output;

    /// Wrap the base configuration.
    fn convert(builder: ConnectivityBuilder<T>) -> Self::Output;
}

/// Adapter selection namespace.
#[allow(non_snake_case)]
pub mod Adapter {
    pub use super::Batch;
}

/// Marker for in-memory batch processing of one or many point sets.
#[derive(Debug, Clone, Copy)]
pub struct Batch;

impl<T: Float + Debug + Send + Sync + 'static> ConnectivityAdapter<T> for Batch {
    type Output = BatchConnectivityBuilder<T>;

    fn convert(builder: ConnectivityBuilder<T>) -> Self::Output {
        // Batch defaults to parallel unless the user chose otherwise
        let mut base = builder;
        base.parallel = Some(base.parallel.unwrap_or(true));
        BatchConnectivityBuilder::from_base(base)
    }
}

// ============================================================================
// One-shot Entry Point
// ============================================================================

/// Build the connectivity matrix of `coords` with default parameters.
///
/// Equivalent to `SpatialConnectivity::new().adapter(Batch).build()?.fit(coords)`.
pub fn spatial_connectivity<T, I>(coords: &I) -> Result<CsMat<T>, SpatialError>
where
    T: Float + Debug + Send + Sync + 'static,
    I: MatrixInput<T> + ?Sized,
{
    ConnectivityBuilder::new().adapter(Batch).build()?.fit(coords)
}
