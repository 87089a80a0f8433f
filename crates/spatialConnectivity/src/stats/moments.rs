//! Column mean and variance for dense and sparse matrices.
//!
//! ## Purpose
//!
//! This module computes, for each column of an `n × m` matrix, the mean and
//! the bias-corrected (unbiased) variance.
//!
//! ## Design notes
//!
//! * **Precision**: All accumulation is done in `f64` regardless of the input
//!   element type.
//! * **Sparse input**: Implicit zeros count as observations. Only stored
//!   entries are visited; the zeros enter the variance in closed form.
//! * **Missing values**: NaN entries are skipped. Each column's mean and
//!   population variance are taken over its non-NaN values only, and a column
//!   with no such values gets NaN for both.
//!
//! ## Invariants
//!
//! * `var = population_var * n / (n - 1)` with `n` the total row count, so at
//!   least 2 rows are required.
//! * Dense and sparse paths agree on the same matrix.

// External dependencies
use num_traits::Float;
use sprs::CsMat;

// Internal dependencies
use crate::input::MatrixInput;
use crate::primitives::errors::SpatialError;

/// Per-column mean and unbiased variance.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMoments {
    /// Column means.
    pub mean: Vec<f64>,
    /// Column variances with the `n / (n - 1)` correction applied.
    pub var: Vec<f64>,
}

fn check_shape(rows: usize, cols: usize) -> Result<(), SpatialError> {
    if rows < 2 {
        return Err(SpatialError::InvalidInput(format!(
            "unbiased variance needs at least 2 rows, got {}",
            rows
        )));
    }
    if cols == 0 {
        return Err(SpatialError::InvalidInput(
            "matrix has no columns".to_string(),
        ));
    }
    Ok(())
}

#[inline]
fn as_f64<T: Float>(v: T) -> f64 {
    v.to_f64().unwrap_or(f64::NAN)
}

/// Finish one column: `sum_sq_dev / count`, scaled by `n / (n - 1)`.
#[inline]
fn corrected_var(sum_sq_dev: f64, count: usize, n: usize) -> f64 {
    if count == 0 {
        return f64::NAN;
    }
    let nf = n as f64;
    sum_sq_dev / count as f64 * (nf / (nf - 1.0))
}

#[inline]
fn column_mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Column mean and unbiased variance of a dense matrix.
pub fn mean_var<T, I>(x: &I) -> Result<ColumnMoments, SpatialError>
where
    T: Float,
    I: MatrixInput<T> + ?Sized,
{
    let view = x.as_row_major()?;
    let (n, m) = (view.n_rows(), view.dims());
    check_shape(n, m)?;

    let mut sums = vec![0.0f64; m];
    let mut counts = vec![0usize; m];
    for i in 0..n {
        for ((acc, cnt), &v) in sums.iter_mut().zip(counts.iter_mut()).zip(view.row(i)) {
            let v = as_f64(v);
            if !v.is_nan() {
                *acc += v;
                *cnt += 1;
            }
        }
    }
    let mean: Vec<f64> = sums
        .iter()
        .zip(counts.iter())
        .map(|(&s, &c)| column_mean(s, c))
        .collect();

    // Second pass on deviations to avoid cancellation.
    let mut sq_dev = vec![0.0f64; m];
    for i in 0..n {
        for ((acc, &v), &mu) in sq_dev.iter_mut().zip(view.row(i)).zip(mean.iter()) {
            let v = as_f64(v);
            if !v.is_nan() {
                let d = v - mu;
                *acc += d * d;
            }
        }
    }
    let var = sq_dev
        .iter()
        .zip(counts.iter())
        .map(|(&s, &c)| corrected_var(s, c, n))
        .collect();

    Ok(ColumnMoments { mean, var })
}

/// Column mean and unbiased variance of a sparse matrix (CSR or CSC).
pub fn sparse_mean_var<T: Float>(x: &CsMat<T>) -> Result<ColumnMoments, SpatialError> {
    let (n, m) = x.shape();
    check_shape(n, m)?;

    let mut sums = vec![0.0f64; m];
    let mut stored = vec![0usize; m];
    let mut missing = vec![0usize; m];
    for (&v, (_, col)) in x.iter() {
        let v = as_f64(v);
        stored[col] += 1;
        if v.is_nan() {
            missing[col] += 1;
        } else {
            sums[col] += v;
        }
    }

    // Implicit zeros are always observed.
    let counts: Vec<usize> = missing.iter().map(|&nan| n - nan).collect();
    let mean: Vec<f64> = sums
        .iter()
        .zip(counts.iter())
        .map(|(&s, &c)| column_mean(s, c))
        .collect();

    let mut sq_dev = vec![0.0f64; m];
    for (&v, (_, col)) in x.iter() {
        let v = as_f64(v);
        if !v.is_nan() {
            let d = v - mean[col];
            sq_dev[col] += d * d;
        }
    }

    let var = (0..m)
        .map(|j| {
            let implicit_zeros = n.saturating_sub(stored[j]) as f64;
            corrected_var(sq_dev[j] + implicit_zeros * mean[j] * mean[j], counts[j], n)
        })
        .collect();

    Ok(ColumnMoments { mean, var })
}
