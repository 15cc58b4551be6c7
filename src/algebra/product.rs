//! Matrix-vector, vector-matrix and matrix-matrix products.

use crate::algebra::vector::dot_unchecked;
use crate::core::traits::MatVec;
use crate::error::{LaError, Result};
use crate::matrix::sparse::SparseMatrix;
use crate::matrix::sparse_vector::SparseVector;

pub(crate) fn check_mat_vec(a: &SparseMatrix, u: &SparseVector) -> Result<()> {
    if a.ncols() != u.len() {
        return Err(LaError::DimensionMismatch(format!(
            "matrix-vector product: {}x{} matrix and vector of length {}",
            a.nrows(),
            a.ncols(),
            u.len()
        )));
    }
    if !u.is_column() {
        return Err(LaError::InvalidArgument(
            "matrix-vector product: vector is not a column vector; transpose it first".into(),
        ));
    }
    Ok(())
}

pub(crate) fn check_mat_mat(a: &SparseMatrix, b: &SparseMatrix) -> Result<()> {
    if a.ncols() != b.nrows() {
        return Err(LaError::DimensionMismatch(format!(
            "matrix product: {}x{} and {}x{} matrices",
            a.nrows(),
            a.ncols(),
            b.nrows(),
            b.ncols()
        )));
    }
    Ok(())
}

/// `A * u` for an m×n `A` and a column vector of length n; yields a column
/// vector of length m.
pub fn mat_vec(a: &SparseMatrix, u: &SparseVector) -> Result<SparseVector> {
    check_mat_vec(a, u)?;
    let mut p = SparseVector::column(a.nrows());
    for (i, row) in a.iter() {
        p.set_unchecked(i, dot_unchecked(row, u));
    }
    Ok(p)
}

/// `u * A` for a row vector of length m and an m×n `A`; yields a row vector
/// of length n. Every column of `A` is synthesized, so this costs
/// O(n × stored rows).
pub fn vec_mat(u: &SparseVector, a: &SparseMatrix) -> Result<SparseVector> {
    if a.nrows() != u.len() {
        return Err(LaError::DimensionMismatch(format!(
            "vector-matrix product: vector of length {} and {}x{} matrix",
            u.len(),
            a.nrows(),
            a.ncols()
        )));
    }
    if u.is_column() {
        return Err(LaError::InvalidArgument(
            "vector-matrix product: vector is not a row vector; transpose it first".into(),
        ));
    }
    let mut p = SparseVector::row(a.ncols());
    for j in 0..a.ncols() {
        let column = a.column(j)?;
        p.set_unchecked(j, dot_unchecked(u, &column));
    }
    Ok(p)
}

/// `A * B` for m×n `A` and n×p `B`.
///
/// Each column of `B` is synthesized and multiplied by `A`; the non-zero
/// results are scattered into the matching column of the output.
pub fn mat_mat(a: &SparseMatrix, b: &SparseMatrix) -> Result<SparseMatrix> {
    check_mat_mat(a, b)?;
    let mut p = SparseMatrix::new(a.nrows(), b.ncols());
    for j in 0..b.ncols() {
        let column = b.column(j)?;
        let product = mat_vec(a, &column)?;
        for (i, value) in product.iter() {
            p.empty_row(i).set_unchecked(j, value);
        }
    }
    Ok(p)
}

/// Computes `y = A * x`, replacing `y` with a fresh column vector.
impl MatVec<SparseVector> for SparseMatrix {
    fn matvec(&self, x: &SparseVector, y: &mut SparseVector) -> Result<()> {
        *y = mat_vec(self, x)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::sparse_vector::Orientation;

    fn sample() -> SparseMatrix {
        // [[1, 0, 2], [0, 3, 0]]
        SparseMatrix::from_triplets(2, 3, [(0, 0, 1.0), (0, 2, 2.0), (1, 1, 3.0)]).unwrap()
    }

    #[test]
    fn matrix_vector() {
        let a = sample();
        let u = SparseVector::from_dense(&[1.0, 1.0, 1.0], Orientation::Column);
        let p = mat_vec(&a, &u).unwrap();
        assert!(p.is_column());
        assert_eq!(p.to_dense(), vec![3.0, 3.0]);
    }

    #[test]
    fn matrix_vector_requires_column() {
        let a = sample();
        let u = SparseVector::row(3);
        assert!(matches!(mat_vec(&a, &u), Err(LaError::InvalidArgument(_))));
        let w = SparseVector::column(2);
        assert!(matches!(mat_vec(&a, &w), Err(LaError::DimensionMismatch(_))));
    }

    #[test]
    fn vector_matrix() {
        let a = sample();
        let u = SparseVector::from_dense(&[2.0, 1.0], Orientation::Row);
        let p = vec_mat(&u, &a).unwrap();
        assert!(p.is_row());
        assert_eq!(p.to_dense(), vec![2.0, 3.0, 4.0]);
        assert!(matches!(vec_mat(&u.transpose(), &a), Err(LaError::InvalidArgument(_))));
    }

    #[test]
    fn matrix_matrix() {
        let a = sample();
        let at = a.transpose();
        let p = mat_mat(&a, &at).unwrap();
        // A Aᵗ = [[5, 0], [0, 9]]
        assert_eq!(p, SparseMatrix::from_triplets(2, 2, [(0, 0, 5.0), (1, 1, 9.0)]).unwrap());
        assert!(matches!(mat_mat(&a, &a), Err(LaError::DimensionMismatch(_))));
    }

    #[test]
    fn matvec_trait_replaces_output() {
        let a = sample();
        let x = SparseVector::from_dense(&[0.0, 1.0, 0.0], Orientation::Column);
        let mut y = SparseVector::row(7);
        a.matvec(&x, &mut y).unwrap();
        assert_eq!(y, SparseVector::from_dense(&[0.0, 3.0], Orientation::Column));
    }
}
