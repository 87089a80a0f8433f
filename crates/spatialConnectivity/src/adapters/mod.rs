//! Layer 5: Adapters
//!
//! ## Purpose
//!
//! This layer provides execution adapters that wrap the connectivity engine
//! with a configuration surface and input handling.
//!
//! ## Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Adapters ← You are here
//!   ↓
//! Layer 4: Engine
//!   ↓
//! Layer 3: Stats
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// In-memory batch processing of one or many point sets.
pub mod batch;
