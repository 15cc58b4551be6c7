//! Dense interop on top of Faer.
//!
//! Converts between the sparse types and `faer::Mat<f64>` / plain `f64`
//! slices, and provides `MatVec` so a `SparseMatrix` can be applied to a
//! dense vector. Zeros are dropped when converting to sparse and expanded
//! when converting back.

use faer::Mat;

use crate::core::traits::{MatShape, MatVec};
use crate::error::{LaError, Result};
use crate::matrix::sparse::SparseMatrix;
use crate::matrix::sparse_vector::{Orientation, SparseVector};

impl MatShape for Mat<f64> {
    fn nrows(&self) -> usize {
        self.nrows()
    }
    fn ncols(&self) -> usize {
        self.ncols()
    }
}

impl SparseVector {
    /// Sparse copy of `values`, skipping zeros.
    pub fn from_dense(values: &[f64], orientation: Orientation) -> Self {
        let mut v = SparseVector::with_orientation(values.len(), orientation);
        for (i, &value) in values.iter().enumerate() {
            v.set_unchecked(i, value);
        }
        v
    }

    /// Dense copy with implicit zeros expanded.
    pub fn to_dense(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.len()];
        for (i, value) in self.iter() {
            out[i] = value;
        }
        out
    }
}

impl SparseMatrix {
    /// Sparse copy of a dense matrix, skipping zeros.
    pub fn from_dense(dense: &Mat<f64>) -> Self {
        let mut m = SparseMatrix::new(dense.nrows(), dense.ncols());
        for i in 0..dense.nrows() {
            for j in 0..dense.ncols() {
                let value = dense[(i, j)];
                if value != 0.0 {
                    m.empty_row(i).set_unchecked(j, value);
                }
            }
        }
        m
    }

    /// Dense copy with implicit zeros expanded.
    pub fn to_dense(&self) -> Mat<f64> {
        let mut dense = Mat::<f64>::zeros(self.nrows(), self.ncols());
        for (i, row) in self.iter() {
            for (j, value) in row.iter() {
                dense[(i, j)] = value;
            }
        }
        dense
    }

    /// Column `j` as a dense vector.
    pub fn dense_column(&self, j: usize) -> Result<Vec<f64>> {
        Ok(self.column(j)?.to_dense())
    }

    /// Overwrite column `j` from a dense slice of length `nrows`.
    pub fn set_dense_column(&mut self, j: usize, values: &[f64]) -> Result<&mut Self> {
        if values.len() != self.nrows() {
            return Err(LaError::DimensionMismatch(format!(
                "column of length {} does not fit a matrix with {} rows",
                values.len(),
                self.nrows()
            )));
        }
        LaError::check_index(j, self.ncols())?;
        for (i, &value) in values.iter().enumerate() {
            if value != 0.0 {
                self.empty_row(i).set_unchecked(j, value);
            } else if let Some(row) = self.stored_row_mut(i) {
                row.set_unchecked(j, 0.0);
            }
        }
        Ok(self)
    }
}

/// Computes `y = A * x` for a dense `x`; every entry of `y` is overwritten.
impl MatVec<Vec<f64>> for SparseMatrix {
    fn matvec(&self, x: &Vec<f64>, y: &mut Vec<f64>) -> Result<()> {
        if x.len() != self.ncols() {
            return Err(LaError::DimensionMismatch(format!(
                "input vector has length {}, matrix has {} columns",
                x.len(),
                self.ncols()
            )));
        }
        if y.len() != self.nrows() {
            return Err(LaError::DimensionMismatch(format!(
                "output vector has length {}, matrix has {} rows",
                y.len(),
                self.nrows()
            )));
        }
        y.iter_mut().for_each(|yi| *yi = 0.0);
        for (i, row) in self.iter() {
            y[i] = row.iter().map(|(j, a)| a * x[j]).sum();
        }
        Ok(())
    }
}
