//! Layer 1: Primitives
//!
//! ## Purpose
//!
//! This layer holds the building blocks shared by every other layer. At the
//! moment that is the error type returned by all fallible operations.
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
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Error types for connectivity construction.
pub mod errors;
