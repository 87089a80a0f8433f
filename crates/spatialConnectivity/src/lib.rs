//! # spatialConnectivity
//!
//! Spatial neighbor graphs over point coordinates, returned as sparse
//! adjacency matrices.
//!
//! Given `N` points in `D` dimensions (typically spot or well positions on a
//! spatial measurement grid), each point is linked to its `k` nearest other
//! points. Candidate edges longer than `median(all candidate distances) ×
//! 1.3` are pruned, which drops the long links that boundary and isolated
//! points would otherwise get. The result is an `N × N` CSR matrix with a `1`
//! at every surviving `(neighbor, point)` pair.
//!
//! ## Quick start
//!
//! ```
//! use spatialConnectivity::prelude::*;
//!
//! let coords = vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0], [9.0, 9.0]];
//!
//! let adjacency = SpatialConnectivity::new()
//!     .n_neighbors(2)
//!     .adapter(Batch)
//!     .build()?
//!     .fit(&coords)?;
//!
//! assert_eq!(adjacency.shape(), (5, 5));
//! assert_eq!(adjacency.nnz(), 8);
//! // The isolated point at (9, 9) is pruned away.
//! assert!(adjacency.outer_view(4).map_or(true, |row| row.nnz() == 0));
//! # Ok::<(), SpatialError>(())
//! ```
//!
//! ## Features
//!
//! * `cpu` (default): parallel neighbor search and batch fitting with `rayon`,
//!   and `ndarray` inputs.

#![allow(non_snake_case)]
#![warn(missing_docs)]

mod adapters;
mod api;
mod engine;
mod input;
mod math;
mod primitives;
mod stats;

/// Commonly used types and functions.
pub mod prelude {
    pub use crate::adapters::batch::{BatchConnectivity, BatchConnectivityBuilder};
    pub use crate::api::{
        spatial_connectivity, Adapter, Batch, ConnectivityBuilder as SpatialConnectivity,
        DistanceMetric, SpatialError, DEFAULT_N_NEIGHBORS,
    };
    pub use crate::engine::executor::symmetrize_max;
    pub use crate::input::{MatrixInput, RowMajor};
    pub use crate::math::cutoff::DEFAULT_CUTOFF_FACTOR;
    pub use crate::math::neighborhood::{ExactNeighbors, NeighborOracle, NeighborResult};
    pub use crate::stats::moments::{mean_var, sparse_mean_var, ColumnMoments};
}

/// Layer-by-layer access to the crate internals.
pub mod internals {
    /// Layer 6: builder and adapter selection.
    pub mod api {
        pub use crate::api::*;
    }

    /// Layer 5: execution adapters.
    pub mod adapters {
        pub use crate::adapters::*;
    }

    /// Layer 4: connectivity pass and sparse assembly.
    pub mod engine {
        pub use crate::engine::*;
    }

    /// Layer 3: column statistics.
    pub mod stats {
        pub use crate::stats::*;
    }

    /// Layer 2: distances, neighbor search, cutoff.
    pub mod math {
        pub use crate::math::*;
    }

    /// Layer 1: errors.
    pub mod primitives {
        pub use crate::primitives::*;
    }

    /// Input abstractions.
    pub mod input {
        pub use crate::input::*;
    }
}
