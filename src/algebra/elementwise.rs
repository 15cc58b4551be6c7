//! Element-wise operations, diagonal construction and matrix scaling/sums.
//!
//! The same sparsity rule applies throughout: a result entry is stored only
//! when it is non-zero, and an entry that cancels to exactly zero is erased.

use std::ops::Mul;

use crate::algebra::vector::{accumulate, check_same_len, scale_in_place};
use crate::core::traits::MatShape;
use crate::error::{LaError, Result};
use crate::matrix::sparse::SparseMatrix;
use crate::matrix::sparse_vector::SparseVector;

/// Element-wise products and quotients shared by vectors and matrices.
pub trait ElementWise: Sized {
    /// Hadamard product `self ∘ other`.
    fn elementwise_mul(&self, other: &Self) -> Result<Self>;

    /// `numerator / x` for every element `x`.
    ///
    /// With `preserve_zero` set, zero elements (stored or implicit) are left
    /// untouched. Otherwise implicit zeros are materialized as
    /// `numerator / 0.0`.
    fn elementwise_div(&self, numerator: f64, preserve_zero: bool) -> Self;

    /// Element-wise reciprocal, `1 / x`.
    fn invert_elements(&self, preserve_zero: bool) -> Self {
        self.elementwise_div(1.0, preserve_zero)
    }
}

impl ElementWise for SparseVector {
    fn elementwise_mul(&self, other: &Self) -> Result<Self> {
        check_same_len(self, other, "element-wise product")?;
        let mut out = self.clone();
        out.retain(|i, value| {
            *value *= other.lookup(i).unwrap_or(0.0);
            *value != 0.0
        });
        Ok(out)
    }

    fn elementwise_div(&self, numerator: f64, preserve_zero: bool) -> Self {
        let mut out = SparseVector::with_orientation(self.len(), self.orientation());
        if preserve_zero {
            for (i, x) in self.iter().filter(|&(_, x)| x != 0.0) {
                out.set_unchecked(i, numerator / x);
            }
        } else {
            for i in 0..self.len() {
                out.set_unchecked(i, numerator / self.lookup(i).unwrap_or(0.0));
            }
        }
        out
    }
}

impl ElementWise for SparseMatrix {
    fn elementwise_mul(&self, other: &Self) -> Result<Self> {
        check_same_shape(self, other, "element-wise product")?;
        let mut out = SparseMatrix::new(self.nrows(), self.ncols());
        for (i, row) in self.iter() {
            if let Some(other_row) = other.stored_row(i) {
                let product = row.elementwise_mul(other_row)?;
                if product.nnz() > 0 {
                    out.insert_row(i, product);
                }
            }
        }
        Ok(out)
    }

    fn elementwise_div(&self, numerator: f64, preserve_zero: bool) -> Self {
        let mut out = SparseMatrix::new(self.nrows(), self.ncols());
        for i in 0..self.nrows() {
            let divided = match self.stored_row(i) {
                Some(row) => row.elementwise_div(numerator, preserve_zero),
                None if preserve_zero => continue,
                None => SparseVector::row(self.ncols()).elementwise_div(numerator, false),
            };
            if divided.nnz() > 0 {
                out.insert_row(i, divided);
            }
        }
        out
    }
}

/// Hadamard product of two vectors or two matrices.
pub fn elementwise_mul<T: ElementWise>(x: &T, y: &T) -> Result<T> {
    x.elementwise_mul(y)
}

/// `numerator / x` element-wise; see [`ElementWise::elementwise_div`].
pub fn elementwise_div<T: ElementWise>(numerator: f64, x: &T, preserve_zero: bool) -> T {
    x.elementwise_div(numerator, preserve_zero)
}

/// Square matrix of size `len + |offset|` with `u` along a diagonal band.
///
/// A positive `offset` places `u` below the main diagonal (`D[i + offset][i]`),
/// a negative one above it (`D[i][i - offset]`), matching
/// [`SparseMatrix::trace`].
pub fn vector_to_diagonal(u: &SparseVector, offset: isize) -> SparseMatrix {
    let shift = offset.unsigned_abs();
    let n = u.len() + shift;
    let mut d = SparseMatrix::new(n, n);
    for (i, value) in u.iter() {
        if value == 0.0 {
            continue;
        }
        let (row, col) = if offset > 0 { (i + shift, i) } else { (i, i + shift) };
        d.empty_row(row).set_unchecked(col, value);
    }
    d
}

pub(crate) fn check_same_shape<A: MatShape, B: MatShape>(a: &A, b: &B, op: &str) -> Result<()> {
    if a.nrows() != b.nrows() || a.ncols() != b.ncols() {
        return Err(LaError::DimensionMismatch(format!(
            "{}: {}x{} and {}x{} matrices",
            op,
            a.nrows(),
            a.ncols(),
            b.nrows(),
            b.ncols()
        )));
    }
    Ok(())
}

/// `A * m`.
pub fn scale_matrix(a: &SparseMatrix, m: f64) -> SparseMatrix {
    let mut out = a.clone();
    for (_, row) in out.rows_mut() {
        scale_in_place(row, m);
    }
    out.retain_rows(|row| row.nnz() > 0);
    out
}

/// `A + B`.
pub fn add_matrices(a: &SparseMatrix, b: &SparseMatrix) -> Result<SparseMatrix> {
    check_same_shape(a, b, "matrix sum")?;
    Ok(combine(a, b, 1.0))
}

/// `A - B`.
pub fn sub_matrices(a: &SparseMatrix, b: &SparseMatrix) -> Result<SparseMatrix> {
    check_same_shape(a, b, "matrix difference")?;
    Ok(combine(a, b, -1.0))
}

fn combine(a: &SparseMatrix, b: &SparseMatrix, sign: f64) -> SparseMatrix {
    let mut out = a.clone();
    for (i, row) in b.iter() {
        accumulate(out.empty_row(i), row, sign);
    }
    out.retain_rows(|row| row.nnz() > 0);
    out
}

impl Mul<f64> for &SparseMatrix {
    type Output = SparseMatrix;

    fn mul(self, m: f64) -> SparseMatrix {
        scale_matrix(self, m)
    }
}

impl Mul<&SparseMatrix> for f64 {
    type Output = SparseMatrix;

    fn mul(self, a: &SparseMatrix) -> SparseMatrix {
        scale_matrix(a, self)
    }
}
