//! Ordinary least squares through a singular value decomposition.
//!
//! The design matrices built by the regression forecaster contain one-hot
//! calendar blocks and lag columns that are exactly collinear on flat or
//! short series. Solving through the SVD with a relative rank cutoff returns
//! the minimum-norm solution in that case instead of failing.

use crate::error::{ForecastError, Result};
use nalgebra::{DMatrix, DVector};

/// Fitted least-squares coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct LeastSquaresFit {
    /// One coefficient per design column.
    pub coefficients: Vec<f64>,
    /// Numerical rank of the design matrix.
    pub rank: usize,
}

/// Dot product over the shorter of the two slices.
pub fn dot(coefficients: &[f64], row: &[f64]) -> f64 {
    coefficients.iter().zip(row.iter()).map(|(c, x)| c * x).sum()
}

/// Solve `min ||X b - y||` for `b`.
///
/// Singular values below `eps * max(rows, cols) * sigma_max` are treated as
/// zero, so rank-deficient designs yield the minimum-norm solution.
///
/// # Arguments
/// * `rows` - Design matrix, one slice per observation, all the same width
/// * `y` - Target values, one per row
pub fn least_squares<R: AsRef<[f64]>>(rows: &[R], y: &[f64]) -> Result<LeastSquaresFit> {
    let n = rows.len();
    if n == 0 {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    }
    if y.len() != n {
        return Err(ForecastError::DimensionMismatch {
            expected: n,
            got: y.len(),
        });
    }

    let k = rows[0].as_ref().len();
    if k == 0 {
        return Err(ForecastError::InvalidParameter(
            "design matrix has no columns".into(),
        ));
    }
    for row in rows {
        if row.as_ref().len() != k {
            return Err(ForecastError::DimensionMismatch {
                expected: k,
                got: row.as_ref().len(),
            });
        }
    }

    let x = DMatrix::from_fn(n, k, |i, j| rows[i].as_ref()[j]);
    let b = DVector::from_column_slice(y);

    let svd = x.svd(true, true);
    let sigma_max = svd.singular_values.max();
    let cutoff = f64::EPSILON * n.max(k) as f64 * sigma_max;
    let rank = svd
        .singular_values
        .iter()
        .filter(|&&s| s > cutoff)
        .count();

    let beta = svd
        .solve(&b, cutoff)
        .map_err(|e| ForecastError::ComputationError(format!("least squares failed: {e}")))?;

    let coefficients: Vec<f64> = beta.iter().copied().collect();
    if coefficients.iter().any(|c| !c.is_finite()) {
        return Err(ForecastError::ComputationError(
            "least squares produced non-finite coefficients".into(),
        ));
    }

    Ok(LeastSquaresFit { coefficients, rank })
}
