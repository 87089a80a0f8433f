//! Layer 4: Engine
//!
//! ## Purpose
//!
//! This layer runs the connectivity pass: it drives the neighbor oracle,
//! derives the global cutoff, and assembles the sparse adjacency matrix.
//!
//! ## Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Adapters
//!   ↓
//! Layer 4: Engine ← You are here
//!   ↓
//! Layer 3: Stats
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Connectivity pass and sparse assembly.
pub mod executor;
