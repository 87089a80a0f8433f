//! Error types for spatial connectivity construction.
//!
//! ## Purpose
//!
//! This module defines the single error enum returned by every fallible
//! operation in the crate.
//!
//! ## Key concepts
//!
//! * **InvalidInput**: The coordinate array is malformed. Raised before any
//!   computation starts.
//! * **OracleError**: The neighbor search could not complete. Propagated as-is,
//!   never retried.
//! * **InvalidParameter**: A builder setting violates its constraint. Raised by
//!   `build()`.
//!
//! ## Invariants
//!
//! * No operation returns a partially assembled matrix alongside an error.

/// Errors produced while building a spatial connectivity graph.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpatialError {
    /// Malformed coordinate array (wrong rank, too few points, ragged rows).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The nearest-neighbor search failed or returned a malformed result.
    #[error("Neighbor search failed: {0}")]
    OracleError(String),

    /// A configuration value is outside its allowed range.
    #[error("Invalid parameter: {param} = {value}, expected {constraint}")]
    InvalidParameter {
        /// Parameter name
        param: &'static str,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: &'static str,
    },
}

impl SpatialError {
    /// True when the error was caused by the caller's coordinates.
    #[inline]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
