//! Layer 3: Stats
//!
//! ## Purpose
//!
//! This layer provides per-column summary statistics over dense and sparse
//! matrices. It is independent of connectivity construction and shares only
//! the input and error primitives.
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
//! Layer 3: Stats ← You are here
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Column mean and unbiased variance.
pub mod moments;
