//! Elementwise and matrix arithmetic.
//!
//! The named functions return [`Result`] and report shape problems as
//! [`GridError::ShapeMismatch`]. The operator impls (`+`, `-`, `*`, and
//! the concatenation pair `|`, `&`) delegate to them and panic with the
//! error's display message, mirroring indexing.
//!
//! All of these run through the adaptive engine in automatic mode, so
//! large operands parallelize without any hint from the caller.

use std::ops::{Add, BitAnd, BitOr, Mul, Sub};

use gridq_kernel::{fill_grid, ExecMode};
use gridq_traits::Scalar;

use crate::matrix::ensure_same_shape;
use crate::{DenseMatrix, GridError, Result};

/// Elementwise sum of two equal-shaped matrices.
pub fn add<T: Scalar>(left: &DenseMatrix<T>, right: &DenseMatrix<T>) -> Result<DenseMatrix<T>> {
    zip_with(left, right, |a, b| a + b)
}

/// Elementwise difference of two equal-shaped matrices.
pub fn sub<T: Scalar>(left: &DenseMatrix<T>, right: &DenseMatrix<T>) -> Result<DenseMatrix<T>> {
    zip_with(left, right, |a, b| a - b)
}

fn zip_with<T: Scalar>(
    left: &DenseMatrix<T>,
    right: &DenseMatrix<T>,
    f: impl Fn(T, T) -> T + Send + Sync,
) -> Result<DenseMatrix<T>> {
    ensure_same_shape(left, right)?;
    let (rows, cols) = left.shape();
    let data = fill_grid(rows, cols, ExecMode::Auto, 1, |i, j| {
        f(left[(i, j)], right[(i, j)])
    });
    Ok(DenseMatrix::from_parts(data, rows, cols))
}

/// Scalar multiple: every cell times `factor`.
pub fn scale<T: Scalar>(matrix: &DenseMatrix<T>, factor: T) -> DenseMatrix<T> {
    let (rows, cols) = matrix.shape();
    let data = fill_grid(rows, cols, ExecMode::Auto, 1, |i, j| matrix[(i, j)] * factor);
    DenseMatrix::from_parts(data, rows, cols)
}

/// Matrix product. Inner dimensions must agree: `(n, k) * (k, m)` gives
/// `(n, m)`.
///
/// Each output cell folds a length-`k` dot product, so `k` feeds the
/// cost model and moderate shapes still cross the parallel threshold.
pub fn mul<T: Scalar>(left: &DenseMatrix<T>, right: &DenseMatrix<T>) -> Result<DenseMatrix<T>> {
    let (n, k) = left.shape();
    let (k2, m) = right.shape();
    if k != k2 {
        return Err(GridError::ShapeMismatch {
            left: (n, k),
            right: (k2, m),
        });
    }
    let data = fill_grid(n, m, ExecMode::Auto, k, |i, j| {
        (0..k).fold(T::zero(), |acc, p| acc + left[(i, p)] * right[(p, j)])
    });
    Ok(DenseMatrix::from_parts(data, n, m))
}

// ==== operators ====

impl<T: Scalar> Add for &DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn add(self, rhs: Self) -> DenseMatrix<T> {
        crate::ops::add(self, rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl<T: Scalar> Sub for &DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn sub(self, rhs: Self) -> DenseMatrix<T> {
        crate::ops::sub(self, rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl<T: Scalar> Mul for &DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn mul(self, rhs: Self) -> DenseMatrix<T> {
        crate::ops::mul(self, rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

/// Right scalar multiplication, `&m * factor`. The mirrored form cannot
/// be written for every scalar type, so only this orientation exists.
impl<T: Scalar> Mul<T> for &DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn mul(self, rhs: T) -> DenseMatrix<T> {
        scale(self, rhs)
    }
}

/// Vertical concatenation, `self` on top of `rhs`.
impl<T: Clone> BitOr for &DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn bitor(self, rhs: Self) -> DenseMatrix<T> {
        self.concat_vertical(rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

/// Horizontal concatenation, `self` to the left of `rhs`.
impl<T: Clone> BitAnd for &DenseMatrix<T> {
    type Output = DenseMatrix<T>;

    fn bitand(self, rhs: Self) -> DenseMatrix<T> {
        self.concat_horizontal(rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}
