//! Input abstractions for coordinate and data matrices.
//!
//! ## Purpose
//!
//! This module provides a unified abstraction for `N × D` numeric inputs,
//! allowing `fit` and the statistics helpers to accept several data formats
//! (fixed-size arrays, nested vectors, flat slices, ndarray) through a single
//! interface.
//!
//! ## Design notes
//!
//! * **Zero-copy where possible**: Contiguous inputs are borrowed, nested
//!   vectors are flattened once.
//! * **Fail-fast validation**: Rank and dimensionality are checked before any
//!   computation starts.
//!
//! ## Key concepts
//!
//! * **MatrixInput Trait**: Requires types to provide a row-major view.
//! * **RowMajor**: A flat buffer plus the number of columns per row.
//!
//! ## Invariants
//!
//! * `data.len()` is always a multiple of `dims`, and `dims >= 1`.
//! * Non-contiguous or ragged inputs return `SpatialError::InvalidInput`.
//!
//! ## Non-goals
//!
//! * This module does not perform data cleaning or imputation.
//! * This module does not check how many rows are present (callers decide).

// Feature-gated imports
#[cfg(feature = "cpu")]
use ndarray::{ArrayBase, Data, Ix2};

// External dependencies
use num_traits::Float;
use std::borrow::Cow;

// Internal dependencies
use crate::primitives::errors::SpatialError;

/// Row-major view of an `N × D` matrix.
#[derive(Debug, Clone)]
pub struct RowMajor<'a, T: Clone> {
    data: Cow<'a, [T]>,
    dims: usize,
}

impl<'a, T: Float> RowMajor<'a, T> {
    /// Wrap a flat row-major buffer holding `data.len() / dims` rows.
    pub fn new(data: &'a [T], dims: usize) -> Result<Self, SpatialError> {
        Self::from_cow(Cow::Borrowed(data), dims)
    }

    fn from_cow(data: Cow<'a, [T]>, dims: usize) -> Result<Self, SpatialError> {
        if dims == 0 {
            return Err(SpatialError::InvalidInput(
                "points must have at least one dimension".to_string(),
            ));
        }
        if data.len() % dims != 0 {
            return Err(SpatialError::InvalidInput(format!(
                "buffer of length {} is not a whole number of {}-dimensional rows",
                data.len(),
                dims
            )));
        }
        Ok(Self { data, dims })
    }

    /// Number of rows (points).
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.data.len() / self.dims
    }

    /// Number of columns (coordinate dimensions).
    #[inline]
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// The flat buffer.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Row `i` as a slice of length `dims`.
    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        &self.data[i * self.dims..(i + 1) * self.dims]
    }
}

/// Trait for types that can be used as an `N × D` matrix input.
pub trait MatrixInput<T: Float> {
    /// Convert the input to a validated row-major view.
    fn as_row_major(&self) -> Result<RowMajor<'_, T>, SpatialError>;
}

impl<T: Float> MatrixInput<T> for RowMajor<'_, T> {
    fn as_row_major(&self) -> Result<RowMajor<'_, T>, SpatialError> {
        Ok(RowMajor {
            data: Cow::Borrowed(self.as_slice()),
            dims: self.dims,
        })
    }
}

impl<T: Float, const D: usize> MatrixInput<T> for [[T; D]] {
    fn as_row_major(&self) -> Result<RowMajor<'_, T>, SpatialError> {
        RowMajor::from_cow(Cow::Borrowed(self.as_flattened()), D)
    }
}

impl<T: Float, const D: usize> MatrixInput<T> for Vec<[T; D]> {
    fn as_row_major(&self) -> Result<RowMajor<'_, T>, SpatialError> {
        self.as_slice().as_row_major()
    }
}

impl<T: Float> MatrixInput<T> for [Vec<T>] {
    fn as_row_major(&self) -> Result<RowMajor<'_, T>, SpatialError> {
        let dims = match self.first() {
            Some(first) => first.len(),
            None => {
                return Err(SpatialError::InvalidInput(
                    "matrix has no rows".to_string(),
                ))
            }
        };

        if let Some((i, row)) = self.iter().enumerate().find(|(_, r)| r.len() != dims) {
            return Err(SpatialError::InvalidInput(format!(
                "row {} has {} values, expected {} (inconsistent dimensionality)",
                i,
                row.len(),
                dims
            )));
        }

        let flat: Vec<T> = self.iter().flat_map(|r| r.iter().copied()).collect();
        RowMajor::from_cow(Cow::Owned(flat), dims)
    }
}

impl<T: Float> MatrixInput<T> for Vec<Vec<T>> {
    fn as_row_major(&self) -> Result<RowMajor<'_, T>, SpatialError> {
        self.as_slice().as_row_major()
    }
}

#[cfg(feature = "cpu")]
impl<T: Float, S> MatrixInput<T> for ArrayBase<S, Ix2>
where
    S: Data<Elem = T>,
{
    fn as_row_major(&self) -> Result<RowMajor<'_, T>, SpatialError> {
        let slice = self.as_slice().ok_or_else(|| {
            SpatialError::InvalidInput(
                "ndarray input must be contiguous in standard (row-major) layout".to_string(),
            )
        })?;
        RowMajor::from_cow(Cow::Borrowed(slice), self.ncols())
    }
}
