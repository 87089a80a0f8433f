//! Layer 2: Math
//!
//! ## Purpose
//!
//! This layer provides the numerical building blocks of connectivity
//! construction: distance metrics, the exact nearest-neighbor oracle, and the
//! median-derived distance cutoff.
//!
//! ## Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Adapters
//!   ↓
//! Layer 4: Engine
//!   ↓
//! Layer 3: Stats
//!   ↓
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```
//!

/// Distance metrics between points.
pub mod distance;

/// Exact k-nearest-neighbor search behind the `NeighborOracle` trait.
pub mod neighborhood;

/// Median and cutoff computation over candidate distances.
pub mod cutoff;
